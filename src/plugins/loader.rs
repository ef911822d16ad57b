//! 插件包加载器
//!
//! 插件包在一次会话中最多获取一次：命名空间中已有组件库时直接返回，
//! 否则获取源码、执行并重新扫描。并发请求共享同一次加载。

use super::evaluator::BundleEvaluator;
use super::locator::BundleLocator;
use super::source::BundleSource;
use crate::namespace::Namespace;
use crate::types::*;
use crate::{PremiumError, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 进行中的加载，所有并发请求等待同一个结果
type LoadAttempt = Shared<BoxFuture<'static, Result<Vec<ArtifactName>>>>;

/// 插件包加载器
pub struct BundleLoader {
    namespace: Arc<Namespace>,
    locator: BundleLocator,
    source: Arc<dyn BundleSource>,
    evaluator: Arc<dyn BundleEvaluator>,
    /// 进行中的加载，结束后清空
    in_flight: Mutex<Option<LoadAttempt>>,
    stats: Arc<LoaderCounters>,
}

#[derive(Debug, Default)]
struct LoaderCounters {
    fetch_attempts: AtomicU64,
    cache_hits: AtomicU64,
    deduplicated: AtomicU64,
    failures: AtomicU64,
}

/// 加载器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderStatistics {
    /// 获取插件包的次数
    pub fetch_attempts: u64,
    /// 命名空间中已有组件库的次数
    pub cache_hits: u64,
    /// 等待其他请求完成加载的次数
    pub deduplicated: u64,
    /// 失败次数
    pub failures: u64,
}

/// 一次获取、执行、重新扫描
struct LoadTask {
    namespace: Arc<Namespace>,
    locator: BundleLocator,
    source: Arc<dyn BundleSource>,
    evaluator: Arc<dyn BundleEvaluator>,
    stats: Arc<LoaderCounters>,
}

impl LoadTask {
    async fn run(self) -> Result<Vec<ArtifactName>> {
        self.stats.fetch_attempts.fetch_add(1, Ordering::Relaxed);
        match self.fetch_and_evaluate().await {
            Ok(components) => Ok(components),
            Err(e) => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                error!("Failed to load premium components: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch_and_evaluate(&self) -> Result<Vec<ArtifactName>> {
        info!("Fetching premium bundle from {}", self.source.describe());

        let source = self.source.fetch_bundle().await?;
        self.evaluator.evaluate(&source, &self.namespace)?;

        let components = self.locator.find_components();
        if components.is_empty() {
            warn!("Bundle evaluated but defined no '{}' artifacts", self.locator.prefix());
            return Err(PremiumError::load("There was no component loaded"));
        }

        info!("Loaded premium components: {:?}", components);
        Ok(components)
    }
}

impl BundleLoader {
    pub fn new(
        namespace: Arc<Namespace>,
        source: Arc<dyn BundleSource>,
        evaluator: Arc<dyn BundleEvaluator>,
        prefix: &str,
    ) -> Self {
        Self {
            locator: BundleLocator::new(namespace.clone(), prefix),
            namespace,
            source,
            evaluator,
            in_flight: Mutex::new(None),
            stats: Arc::new(LoaderCounters::default()),
        }
    }

    pub fn locator(&self) -> &BundleLocator {
        &self.locator
    }

    /// 返回已加载的组件库名称，必要时获取并执行插件包
    ///
    /// 加载进行中到达的请求等待同一次加载，成功和失败都共享；
    /// 加载结束后的新请求在没有组件库时重新加载。
    pub async fn load_components(&self) -> Result<Vec<ArtifactName>> {
        let components = self.locator.find_components();
        if !components.is_empty() {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!("Premium components already loaded: {:?}", components);
            return Ok(components);
        }

        let attempt = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.as_ref() {
                Some(attempt) => {
                    self.stats.deduplicated.fetch_add(1, Ordering::Relaxed);
                    debug!("Joining in-flight premium bundle load");
                    attempt.clone()
                }
                None => {
                    // 上一次加载可能在扫描之后刚刚完成
                    let components = self.locator.find_components();
                    if !components.is_empty() {
                        self.stats.deduplicated.fetch_add(1, Ordering::Relaxed);
                        debug!("Premium components loaded by a concurrent request");
                        return Ok(components);
                    }
                    let attempt = self.start_attempt();
                    *in_flight = Some(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        let mut in_flight = self.in_flight.lock();
        if in_flight.as_ref().map_or(false, |current| current.ptr_eq(&attempt)) {
            *in_flight = None;
        }
        result
    }

    fn start_attempt(&self) -> LoadAttempt {
        LoadTask {
            namespace: self.namespace.clone(),
            locator: self.locator.clone(),
            source: self.source.clone(),
            evaluator: self.evaluator.clone(),
            stats: self.stats.clone(),
        }
        .run()
        .boxed()
        .shared()
    }

    /// 获取加载器统计信息
    pub fn get_statistics(&self) -> LoaderStatistics {
        LoaderStatistics {
            fetch_attempts: self.stats.fetch_attempts.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            deduplicated: self.stats.deduplicated.load(Ordering::Relaxed),
            failures: self.stats.failures.load(Ordering::Relaxed),
        }
    }
}
