//! 插件包组件定位

use crate::namespace::Namespace;
use crate::types::*;
use std::sync::Arc;

/// 按名称前缀扫描命名空间中的插件包组件库
#[derive(Debug, Clone)]
pub struct BundleLocator {
    namespace: Arc<Namespace>,
    prefix: String,
}

impl BundleLocator {
    pub fn new(namespace: Arc<Namespace>, prefix: &str) -> Self {
        Self {
            namespace,
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 以命名空间枚举顺序返回匹配的组件库名称，空结果表示尚未加载
    pub fn find_components(&self) -> Vec<ArtifactName> {
        self.namespace
            .keys()
            .into_iter()
            .filter(|name| name.starts_with(&self.prefix))
            .collect()
    }
}
