//! 核心数据类型
//!
//! 组件、能力描述符等宿主与插件包之间共享的类型

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 插件包组件名前缀
pub const ARTIFACT_PREFIX: &str = "PremiumComponents";

/// 当前宿主能力版本
pub const CAPABILITY_VERSION: u32 = 1;

/// 唯一标识符类型
pub type ArtifactName = String;
pub type ComponentName = String;

/// 可渲染的UI组件
///
/// 插件包导出的组件、宿主共享组件以及失败占位组件都实现此特征。
pub trait Component: Send + Sync {
    /// 组件名称
    fn name(&self) -> &str;

    /// 按给定属性渲染组件
    fn render(&self, props: &Value) -> String;
}

/// 组件构造引用
pub type ComponentRef = Arc<dyn Component>;

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name()).finish()
    }
}

/// 调试设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSettings {
    /// 是否记录状态变更
    pub store_logging: bool,
}

/// 能力描述符 - 发布给插件包的宿主能力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    /// 插件包可以使用宿主注册的共享组件
    pub use_host_components: bool,
    /// 能力版本
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugSettings>,
}

impl Default for CapabilityDescriptor {
    fn default() -> Self {
        Self {
            use_host_components: true,
            version: CAPABILITY_VERSION,
            debug: None,
        }
    }
}
