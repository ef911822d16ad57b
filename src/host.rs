//! 宿主框架接口
//!
//! 加载器只通过注册和安装两个能力使用宿主UI框架。

use crate::plugins::library::PremiumLibrary;
use crate::types::*;
use crate::Result;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// 宿主UI框架能力
#[cfg_attr(test, mockall::automock)]
pub trait HostFramework: Send + Sync {
    /// 注册全局组件
    fn register(&self, name: &str, component: ComponentRef);

    /// 安装插件包组件库
    fn install(&self, library: &PremiumLibrary) -> Result<()>;
}

/// 进程内的全局组件注册表
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: DashMap<ComponentName, ComponentRef>,
    install_count: AtomicU64,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查找已注册组件
    pub fn get(&self, name: &str) -> Option<ComponentRef> {
        self.components.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// 已注册组件名称（排序后）
    pub fn component_names(&self) -> Vec<ComponentName> {
        let mut names: Vec<ComponentName> = self.components.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// 组件库安装次数
    pub fn install_count(&self) -> u64 {
        self.install_count.load(Ordering::Acquire)
    }
}

impl HostFramework for ComponentRegistry {
    fn register(&self, name: &str, component: ComponentRef) {
        debug!("Registering global component '{}'", name);
        self.components.insert(name.to_string(), component);
    }

    fn install(&self, library: &PremiumLibrary) -> Result<()> {
        for (name, component) in library.components() {
            self.components.insert(name.clone(), component.clone());
        }
        self.install_count.fetch_add(1, Ordering::AcqRel);
        info!("Installed library '{}' ({} components)", library.name(), library.component_names().len());
        Ok(())
    }
}
