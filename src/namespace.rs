//! 共享命名空间
//!
//! 进程范围内的键值表面。宿主桥接在启动时写入共享库和能力描述符，
//! 插件包执行时写入自己的组件库。键按插入顺序枚举。

use crate::host::HostFramework;
use crate::plugins::library::PremiumLibrary;
use crate::types::*;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 共享库描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// 库名称
    pub name: String,
    /// 库版本
    pub version: String,
}

impl ModuleDescriptor {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// 命名空间条目
#[derive(Clone)]
pub enum NamespaceEntry {
    /// 宿主UI框架根
    Host(Arc<dyn HostFramework>),
    /// 共享库
    Module(ModuleDescriptor),
    /// 能力描述符
    Capabilities(CapabilityDescriptor),
    /// 插件包组件库
    Library(Arc<PremiumLibrary>),
    /// 任意值
    Value(serde_json::Value),
}

impl fmt::Debug for NamespaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceEntry::Host(_) => f.write_str("Host(..)"),
            NamespaceEntry::Module(module) => f.debug_tuple("Module").field(module).finish(),
            NamespaceEntry::Capabilities(caps) => f.debug_tuple("Capabilities").field(caps).finish(),
            NamespaceEntry::Library(library) => f.debug_tuple("Library").field(&library.name()).finish(),
            NamespaceEntry::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// 共享命名空间
#[derive(Debug, Default)]
pub struct Namespace {
    entries: RwLock<Vec<(String, NamespaceEntry)>>,
}

impl Namespace {
    /// 创建空命名空间
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入条目；已存在的键保持原有位置
    pub fn set(&self, key: &str, entry: NamespaceEntry) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = entry,
            None => entries.push((key.to_string(), entry)),
        }
    }

    /// 读取条目
    pub fn get(&self, key: &str) -> Option<NamespaceEntry> {
        self.entries
            .read()
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, entry)| entry.clone())
    }

    /// 是否包含键
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().iter().any(|(name, _)| name == key)
    }

    /// 按插入顺序列出所有键
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 插件包注册组件库的入口
    pub fn register_artifact(&self, name: &str, library: Arc<PremiumLibrary>) {
        debug!("Registering artifact '{}' with {} components", name, library.component_names().len());
        self.set(name, NamespaceEntry::Library(library));
    }

    /// 读取组件库
    pub fn library(&self, name: &str) -> Option<Arc<PremiumLibrary>> {
        match self.get(name)? {
            NamespaceEntry::Library(library) => Some(library),
            _ => None,
        }
    }

    /// 读取已发布的能力描述符
    pub fn capabilities(&self, key: &str) -> Option<CapabilityDescriptor> {
        match self.get(key)? {
            NamespaceEntry::Capabilities(caps) => Some(caps),
            _ => None,
        }
    }
}
