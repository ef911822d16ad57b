//! 插件包来源
//!
//! 获取插件包源码的网络客户端能力，以及文件和内存实现。

use crate::{PremiumError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// 插件包源码获取接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BundleSource: Send + Sync {
    /// 获取插件包源码
    async fn fetch_bundle(&self) -> Result<String>;

    /// 来源描述
    fn describe(&self) -> String;
}

/// 宿主API响应信封
#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: Option<String>,
    #[serde(default)]
    message: String,
}

/// 通过宿主REST API获取插件包
#[derive(Debug, Clone)]
pub struct HttpBundleSource {
    client: Client,
    base_url: String,
}

impl HttpBundleSource {
    /// 插件包渲染器接口路径
    pub const RENDERER_PATH: &'static str = "/api/1/statistics/renderer";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PremiumError::network(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, Self::RENDERER_PATH)
    }
}

#[async_trait]
impl BundleSource for HttpBundleSource {
    async fn fetch_bundle(&self) -> Result<String> {
        let url = self.url();
        debug!("Fetching premium bundle from {}", url);

        let response = self.client.get(&url).send().await
            .map_err(|e| PremiumError::network(&format!("Failed to fetch premium bundle: {}", e)))?;

        let status = response.status();
        let text = response.text().await
            .map_err(|e| PremiumError::network(&format!("Failed to read renderer response ({}): {}", status, e)))?;

        if !status.is_success() {
            warn!("Renderer request failed with status {}", status);
            // 错误响应不一定是信封格式
            let message = serde_json::from_str::<ApiResponse>(&text)
                .map(|body| body.message)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(PremiumError::Network {
                message: format!("Renderer request failed ({}): {}", status, message),
            });
        }

        let body: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| PremiumError::network(&format!("Failed to parse renderer response: {}", e)))?;

        body.result.ok_or_else(|| PremiumError::Network {
            message: format!("Renderer returned no bundle: {}", body.message),
        })
    }

    fn describe(&self) -> String {
        self.url()
    }
}

/// 从本地文件读取插件包
#[derive(Debug, Clone)]
pub struct FileBundleSource {
    path: PathBuf,
}

impl FileBundleSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BundleSource for FileBundleSource {
    async fn fetch_bundle(&self) -> Result<String> {
        debug!("Reading premium bundle from {:?}", self.path);
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内存中的插件包
#[derive(Debug, Clone)]
pub struct StaticBundleSource {
    source: String,
}

impl StaticBundleSource {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }
}

#[async_trait]
impl BundleSource for StaticBundleSource {
    async fn fetch_bundle(&self) -> Result<String> {
        Ok(self.source.clone())
    }

    fn describe(&self) -> String {
        "static bundle".to_string()
    }
}
