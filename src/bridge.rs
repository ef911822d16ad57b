//! 宿主桥接
//!
//! 把宿主框架、共享库（图表、时间、状态存储）、能力描述符发布到共享命名空间，并注册共享组件，
//! 让插件包无需自带这些实现。每个会话只应调用一次。

use crate::components::shared_components;
use crate::host::HostFramework;
use crate::namespace::{ModuleDescriptor, Namespace, NamespaceEntry};
use crate::types::*;
use std::sync::Arc;
use tracing::info;

/// 命名空间键
pub const HOST_KEY: &str = "Host";
pub const CHART_KEY: &str = "Chart";
pub const TIME_KEY: &str = "Time";
pub const STORE_KEY: &str = "Store";
pub const CAPABILITIES_KEY: &str = "premium";

/// 共享图表库
pub const CHART_MODULE: (&str, &str) = ("chart.js", "2.9.4");
/// 共享日期时间库
pub const TIME_MODULE: (&str, &str) = ("chrono", "0.4");
/// 共享状态存储库
pub const STORE_MODULE: (&str, &str) = ("vuex", "3.6.2");

/// 发布共享能力并注册共享组件
pub fn setup_premium(namespace: &Namespace, host: Arc<dyn HostFramework>, debug: Option<DebugSettings>) {
    namespace.set(HOST_KEY, NamespaceEntry::Host(host.clone()));
    namespace.set(CHART_KEY, NamespaceEntry::Module(ModuleDescriptor::new(CHART_MODULE.0, CHART_MODULE.1)));
    namespace.set(TIME_KEY, NamespaceEntry::Module(ModuleDescriptor::new(TIME_MODULE.0, TIME_MODULE.1)));
    namespace.set(STORE_KEY, NamespaceEntry::Module(ModuleDescriptor::new(STORE_MODULE.0, STORE_MODULE.1)));
    namespace.set(
        CAPABILITIES_KEY,
        NamespaceEntry::Capabilities(CapabilityDescriptor {
            use_host_components: true,
            version: CAPABILITY_VERSION,
            debug,
        }),
    );

    // 全局注册的组件同样提供给插件包
    let components = shared_components();
    for component in &components {
        host.register(component.name(), component.clone());
    }

    info!("Premium bridge published {} shared components", components.len());
}
