//! 高级组件访问入口
//!
//! `PremiumLoader` 组合命名空间、宿主框架、插件包加载器和组件解析器。
//! 每个已知的高级组件都有一个固定的访问函数，新增组件时在此处追加。

use crate::bridge::setup_premium;
use crate::config::{BundleSourceKind, PremiumConfig};
use crate::host::HostFramework;
use crate::namespace::Namespace;
use crate::plugins::*;
use crate::types::*;
use crate::{PremiumError, Result};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

/// 已知高级组件名称
pub const PREMIUM_STATISTICS: &str = "PremiumStatistics";
pub const DSR_MOVEMENT_HISTORY: &str = "DsrMovementHistory";
pub const VAULT_EVENTS_LIST: &str = "VaultEventsList";
pub const LENDING_HISTORY: &str = "LendingHistory";

pub const PREMIUM_COMPONENT_NAMES: [&str; 4] = [
    PREMIUM_STATISTICS,
    DSR_MOVEMENT_HISTORY,
    VAULT_EVENTS_LIST,
    LENDING_HISTORY,
];

/// 高级组件加载器
pub struct PremiumLoader {
    namespace: Arc<Namespace>,
    host: Arc<dyn HostFramework>,
    loader: Arc<BundleLoader>,
    resolver: ComponentResolver,
    debug: Option<DebugSettings>,
    bridge: OnceCell<()>,
}

impl PremiumLoader {
    /// 用给定的协作者创建加载器
    pub fn new(
        config: &PremiumConfig,
        namespace: Arc<Namespace>,
        host: Arc<dyn HostFramework>,
        source: Arc<dyn BundleSource>,
        evaluator: Arc<dyn BundleEvaluator>,
    ) -> Self {
        let loader = Arc::new(BundleLoader::new(
            namespace.clone(),
            source,
            evaluator,
            &config.bundle.artifact_prefix,
        ));
        let resolver = ComponentResolver::new(LibraryResolver::new(loader.clone(), namespace.clone(), host.clone()));

        Self {
            namespace,
            host,
            loader,
            resolver,
            debug: config.capabilities.debug.clone(),
            bridge: OnceCell::new(),
        }
    }

    /// 按配置创建加载器，插件包来源和执行器使用内置实现
    pub fn from_config(config: &PremiumConfig, host: Arc<dyn HostFramework>) -> Result<Self> {
        let source: Arc<dyn BundleSource> = match &config.bundle.source {
            BundleSourceKind::Http => Arc::new(HttpBundleSource::new(&config.api.base_url, config.api.timeout())?),
            BundleSourceKind::File(path) => Arc::new(FileBundleSource::new(path.clone())),
        };

        Ok(Self::new(
            config,
            Arc::new(Namespace::new()),
            host,
            source,
            Arc::new(JsonBundleEvaluator::new()),
        ))
    }

    /// 运行宿主桥接，重复调用无效果
    pub fn setup(&self) {
        self.bridge.get_or_init(|| {
            setup_premium(&self.namespace, self.host.clone(), self.debug.clone());
        });
    }

    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    pub fn host(&self) -> &Arc<dyn HostFramework> {
        &self.host
    }

    /// 获取加载器统计信息
    pub fn get_statistics(&self) -> LoaderStatistics {
        self.loader.get_statistics()
    }

    /// 按名称解析高级组件
    pub async fn load(&self, name: &str) -> Result<ComponentRef> {
        self.resolver.load(name).await
    }

    pub async fn premium_statistics(&self) -> Result<ComponentRef> {
        self.load(PREMIUM_STATISTICS).await
    }

    pub async fn dsr_movement_history(&self) -> Result<ComponentRef> {
        self.load(DSR_MOVEMENT_HISTORY).await
    }

    pub async fn vault_events_list(&self) -> Result<ComponentRef> {
        self.load(VAULT_EVENTS_LIST).await
    }

    pub async fn lending_history(&self) -> Result<ComponentRef> {
        self.load(LENDING_HISTORY).await
    }
}

static GLOBAL_LOADER: OnceCell<Arc<PremiumLoader>> = OnceCell::new();

/// 设置进程范围的默认加载器，只能设置一次
pub fn set_global_loader(loader: Arc<PremiumLoader>) -> Result<()> {
    GLOBAL_LOADER
        .set(loader)
        .map_err(|_| PremiumError::config("Global premium loader is already set"))?;
    info!("Global premium loader installed");
    Ok(())
}

/// 获取进程范围的默认加载器
pub fn global_loader() -> Result<Arc<PremiumLoader>> {
    GLOBAL_LOADER
        .get()
        .cloned()
        .ok_or_else(|| PremiumError::config("Global premium loader is not initialised"))
}

pub async fn premium_statistics() -> Result<ComponentRef> {
    global_loader()?.premium_statistics().await
}

pub async fn dsr_movement_history() -> Result<ComponentRef> {
    global_loader()?.dsr_movement_history().await
}

pub async fn vault_events_list() -> Result<ComponentRef> {
    global_loader()?.vault_events_list().await
}

pub async fn lending_history() -> Result<ComponentRef> {
    global_loader()?.lending_history().await
}
