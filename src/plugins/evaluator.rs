//! 插件包执行器
//!
//! 执行器接收插件包源码和共享命名空间，插件包通过
//! [`Namespace::register_artifact`] 注册自己的组件库。

use super::library::PremiumLibrary;
use crate::components::TemplateComponent;
use crate::namespace::Namespace;
use crate::types::*;
use crate::{PremiumError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 插件包执行接口
pub trait BundleEvaluator: Send + Sync {
    /// 执行插件包，失败时返回 `ScriptEvaluation` 错误
    fn evaluate(&self, source: &str, namespace: &Namespace) -> Result<()>;
}

/// 插件包对宿主能力的要求
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleRequirements {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    host_components: bool,
}

#[derive(Debug, Deserialize)]
struct ComponentDefinition {
    template: String,
}

#[derive(Debug, Default, Deserialize)]
struct ArtifactDefinition {
    #[serde(default)]
    components: HashMap<ComponentName, ComponentDefinition>,
}

/// JSON插件包文档
#[derive(Debug)]
struct BundleDocument {
    requires: BundleRequirements,
    artifacts: Vec<(ArtifactName, ArtifactDefinition)>,
}

/// JSON插件包执行器
#[derive(Debug, Clone)]
pub struct JsonBundleEvaluator {
    capabilities_key: String,
}

impl Default for JsonBundleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonBundleEvaluator {
    /// 能力描述符在命名空间中的默认键
    pub const CAPABILITIES_KEY: &'static str = crate::bridge::CAPABILITIES_KEY;

    pub fn new() -> Self {
        Self::with_capabilities_key(Self::CAPABILITIES_KEY)
    }

    pub fn with_capabilities_key(key: &str) -> Self {
        Self {
            capabilities_key: key.to_string(),
        }
    }

    fn parse(source: &str) -> Result<BundleDocument> {
        let raw: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| PremiumError::script_evaluation(&format!("Malformed bundle: {}", e)))?;

        let requires = match raw.get("requires") {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| PremiumError::script_evaluation(&format!("Invalid bundle requirements: {}", e)))?,
            None => BundleRequirements::default(),
        };

        // artifacts 按文档顺序注册
        let artifacts = match raw.get("artifacts") {
            Some(serde_json::Value::Object(map)) => map
                .iter()
                .map(|(name, value)| {
                    serde_json::from_value::<ArtifactDefinition>(value.clone())
                        .map(|definition| (name.clone(), definition))
                        .map_err(|e| PremiumError::ScriptEvaluation {
                            message: format!("Invalid artifact '{}': {}", name, e),
                        })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(serde_json::Value::Null) | None => Vec::new(),
            Some(_) => return Err(PremiumError::script_evaluation("Bundle artifacts must be an object")),
        };

        Ok(BundleDocument { requires, artifacts })
    }

    fn check_requirements(&self, requires: &BundleRequirements, namespace: &Namespace) -> Result<()> {
        let capabilities = namespace.capabilities(&self.capabilities_key);

        if let Some(required) = requires.version {
            let available = capabilities.as_ref().map(|caps| caps.version).unwrap_or(0);
            if required > available {
                return Err(PremiumError::ScriptEvaluation {
                    message: format!("Bundle requires host version {}, host provides {}", required, available),
                });
            }
        }

        if requires.host_components && !capabilities.map(|caps| caps.use_host_components).unwrap_or(false) {
            return Err(PremiumError::script_evaluation("Bundle requires host components but none are provided"));
        }

        Ok(())
    }
}

impl BundleEvaluator for JsonBundleEvaluator {
    fn evaluate(&self, source: &str, namespace: &Namespace) -> Result<()> {
        let document = Self::parse(source)?;
        self.check_requirements(&document.requires, namespace)?;

        for (artifact_name, definition) in document.artifacts {
            let components: HashMap<ComponentName, ComponentRef> = definition
                .components
                .into_iter()
                .map(|(name, component)| {
                    let constructor: ComponentRef = Arc::new(TemplateComponent::new(&name, &component.template));
                    (name, constructor)
                })
                .collect();

            debug!("Bundle defines artifact '{}'", artifact_name);
            namespace.register_artifact(&artifact_name, Arc::new(PremiumLibrary::new(&artifact_name, components)));
        }

        info!("Premium bundle evaluated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::NamespaceEntry;
    use serde_json::json;

    fn namespace_with_capabilities() -> Namespace {
        let namespace = Namespace::new();
        namespace.set(
            JsonBundleEvaluator::CAPABILITIES_KEY,
            NamespaceEntry::Capabilities(CapabilityDescriptor::default()),
        );
        namespace
    }

    #[test]
    fn test_evaluate_registers_artifacts_in_document_order() {
        let namespace = namespace_with_capabilities();
        let bundle = r#"{
            "requires": {"version": 1, "hostComponents": true},
            "artifacts": {
                "PremiumComponentsXYZ": {
                    "components": {"PremiumStatistics": {"template": "<div>{{ title }}</div>"}}
                },
                "PremiumComponentsABC": {"components": {}}
            }
        }"#;

        JsonBundleEvaluator::new().evaluate(bundle, &namespace).unwrap();

        assert_eq!(namespace.keys(), vec!["premium", "PremiumComponentsXYZ", "PremiumComponentsABC"]);
        let library = namespace.library("PremiumComponentsXYZ").unwrap();
        assert!(!library.is_installed());
        let statistics = library.get("PremiumStatistics").unwrap();
        assert_eq!(statistics.render(&json!({"title": "Net value"})), "<div>Net value</div>");
    }

    #[test]
    fn test_malformed_bundle() {
        let namespace = namespace_with_capabilities();
        let err = JsonBundleEvaluator::new().evaluate("window.PremiumComponents = {", &namespace).unwrap_err();
        assert!(matches!(err, PremiumError::ScriptEvaluation { .. }));
        assert_eq!(namespace.len(), 1);
    }

    #[test]
    fn test_version_requirement() {
        let namespace = namespace_with_capabilities();
        let bundle = r#"{"requires": {"version": 2}, "artifacts": {"PremiumComponentsX": {}}}"#;

        let err = JsonBundleEvaluator::new().evaluate(bundle, &namespace).unwrap_err();
        assert!(err.to_string().contains("requires host version 2"));
        assert!(!namespace.contains("PremiumComponentsX"));
    }

    #[test]
    fn test_host_components_requirement_without_bridge() {
        let namespace = Namespace::new();
        let bundle = r#"{"requires": {"hostComponents": true}, "artifacts": {}}"#;

        let err = JsonBundleEvaluator::new().evaluate(bundle, &namespace).unwrap_err();
        assert!(matches!(err, PremiumError::ScriptEvaluation { .. }));
    }

    #[test]
    fn test_bundle_without_requirements_or_artifacts() {
        let namespace = Namespace::new();
        JsonBundleEvaluator::new().evaluate(r#"{"SomethingElse": {}}"#, &namespace).unwrap();
        assert!(namespace.is_empty());
    }

    #[test]
    fn test_invalid_artifact_definition() {
        let namespace = namespace_with_capabilities();
        let bundle = r#"{"artifacts": {"PremiumComponentsX": {"components": {"A": {"tpl": ""}}}}}"#;

        let err = JsonBundleEvaluator::new().evaluate(bundle, &namespace).unwrap_err();
        assert!(err.to_string().contains("PremiumComponentsX"));
    }
}
