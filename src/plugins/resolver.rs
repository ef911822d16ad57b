//! 组件解析器

use super::library::LibraryResolver;
use crate::components::fallback_component;
use crate::types::*;
use crate::Result;
use tracing::{debug, warn};

/// 按名称解析插件包组件，缺失时返回失败占位组件
pub struct ComponentResolver {
    libraries: LibraryResolver,
}

impl ComponentResolver {
    pub fn new(libraries: LibraryResolver) -> Self {
        Self { libraries }
    }

    /// 解析组件；加载失败会向上传播，组件缺失不是错误
    pub async fn load(&self, name: &str) -> Result<ComponentRef> {
        let library = self.libraries.load_library().await?;

        match library.get(name) {
            Some(component) => {
                debug!("Resolved premium component '{}' from '{}'", name, library.name());
                Ok(component)
            }
            None => {
                warn!("Premium component '{}' not found in '{}', using fallback", name, library.name());
                Ok(fallback_component())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{TemplateComponent, PREMIUM_LOADING_FAILED};
    use crate::host::ComponentRegistry;
    use crate::namespace::Namespace;
    use crate::plugins::evaluator::JsonBundleEvaluator;
    use crate::plugins::library::PremiumLibrary;
    use crate::plugins::loader::BundleLoader;
    use crate::plugins::source::MockBundleSource;
    use crate::PremiumError;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn resolver_over(namespace: Arc<Namespace>, source: MockBundleSource) -> ComponentResolver {
        let loader = Arc::new(BundleLoader::new(
            namespace.clone(),
            Arc::new(source),
            Arc::new(JsonBundleEvaluator::new()),
            ARTIFACT_PREFIX,
        ));
        ComponentResolver::new(LibraryResolver::new(loader, namespace, Arc::new(ComponentRegistry::new())))
    }

    #[tokio::test]
    async fn test_present_component_is_returned_exactly() {
        let statistics: ComponentRef = Arc::new(TemplateComponent::new("PremiumStatistics", "<div/>"));
        let mut components = HashMap::new();
        components.insert("PremiumStatistics".to_string(), statistics.clone());

        let namespace = Arc::new(Namespace::new());
        namespace.register_artifact("PremiumComponentsXYZ", Arc::new(PremiumLibrary::new("PremiumComponentsXYZ", components)));

        let mut source = MockBundleSource::new();
        source.expect_fetch_bundle().never();
        let resolver = resolver_over(namespace, source);

        let resolved = resolver.load("PremiumStatistics").await.unwrap();
        assert!(Arc::ptr_eq(&resolved, &statistics));

        let missing = resolver.load("VaultEventsList").await.unwrap();
        assert_eq!(missing.name(), PREMIUM_LOADING_FAILED);
    }

    #[tokio::test]
    async fn test_load_failure_is_not_swallowed() {
        let mut source = MockBundleSource::new();
        source.expect_describe().returning(|| "mock".to_string());
        source
            .expect_fetch_bundle()
            .returning(|| Err(PremiumError::network("Renderer returned no bundle")));
        let resolver = resolver_over(Arc::new(Namespace::new()), source);

        let err = resolver.load("PremiumStatistics").await.unwrap_err();
        assert!(matches!(err, PremiumError::Network { .. }));
    }
}
