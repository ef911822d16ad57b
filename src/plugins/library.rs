//! 组件库句柄与组件库解析器
//!
//! 组件库由插件包创建，由宿主负责一次性安装。

use super::loader::BundleLoader;
use crate::host::HostFramework;
use crate::namespace::Namespace;
use crate::types::*;
use crate::{PremiumError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 插件包组件库句柄
pub struct PremiumLibrary {
    /// 在命名空间中的名称
    name: ArtifactName,
    /// 导出的组件构造
    components: HashMap<ComponentName, ComponentRef>,
    /// 是否已安装到宿主框架
    installed: AtomicBool,
    /// 安装互斥门
    install_gate: Mutex<()>,
    /// 创建时间
    created_at: DateTime<Utc>,
}

impl PremiumLibrary {
    /// 创建未安装的组件库
    pub fn new(name: &str, components: HashMap<ComponentName, ComponentRef>) -> Self {
        Self {
            name: name.to_string(),
            components,
            installed: AtomicBool::new(false),
            install_gate: Mutex::new(()),
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按名称查找组件
    pub fn get(&self, name: &str) -> Option<ComponentRef> {
        self.components.get(name).cloned()
    }

    pub fn components(&self) -> &HashMap<ComponentName, ComponentRef> {
        &self.components
    }

    /// 组件名称（排序后）
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 安装到宿主框架，最多执行一次
    ///
    /// 返回 `true` 表示本次调用完成了安装。安装失败时标志保持未安装。
    pub async fn ensure_installed(&self, host: &dyn HostFramework) -> Result<bool> {
        if self.is_installed() {
            return Ok(false);
        }

        let _guard = self.install_gate.lock().await;
        if self.is_installed() {
            debug!("Library '{}' was installed while waiting", self.name);
            return Ok(false);
        }

        host.install(self)?;
        self.installed.store(true, Ordering::Release);
        info!("Library '{}' installed", self.name);
        Ok(true)
    }
}

impl fmt::Debug for PremiumLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PremiumLibrary")
            .field("name", &self.name)
            .field("components", &self.component_names())
            .field("installed", &self.is_installed())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// 组件库解析器
pub struct LibraryResolver {
    loader: Arc<BundleLoader>,
    namespace: Arc<Namespace>,
    host: Arc<dyn HostFramework>,
}

impl LibraryResolver {
    pub fn new(loader: Arc<BundleLoader>, namespace: Arc<Namespace>, host: Arc<dyn HostFramework>) -> Self {
        Self { loader, namespace, host }
    }

    /// 加载插件包并返回已安装的第一个组件库
    pub async fn load_library(&self) -> Result<Arc<PremiumLibrary>> {
        let components = self.loader.load_components().await?;
        let first = components
            .first()
            .ok_or_else(|| PremiumError::load("There was no component loaded"))?;

        let library = self.namespace.library(first).ok_or_else(|| PremiumError::Load {
            message: format!("Artifact '{}' is not a component library", first),
        })?;

        library.ensure_installed(self.host.as_ref()).await?;
        Ok(library)
    }
}
