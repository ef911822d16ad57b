//! 加载器配置管理
//!
//! 支持YAML和TOML配置文件

use crate::types::*;
use crate::{PremiumError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 加载器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PremiumConfig {
    /// 宿主API配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 插件包配置
    #[serde(default)]
    pub bundle: BundleConfig,
    /// 发布给插件包的能力配置
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 宿主API配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API根地址
    pub base_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:4242".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 插件包来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleSourceKind {
    /// 通过宿主API获取
    Http,
    /// 本地文件
    File(PathBuf),
}

/// 插件包配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// 插件包来源
    pub source: BundleSourceKind,
    /// 组件库名称前缀
    pub artifact_prefix: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            source: BundleSourceKind::Http,
            artifact_prefix: ARTIFACT_PREFIX.to_string(),
        }
    }
}

/// 能力配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    /// 调试设置
    #[serde(default)]
    pub debug: Option<DebugSettings>,
}

/// 日志配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
}

/// 日志级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// 配置文件格式，按扩展名判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: PremiumConfig,
}

impl ConfigManager {
    /// 从文件加载配置
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await
            .map_err(|e| PremiumError::config(&format!("Failed to read config file: {}", e)))?;

        let config: PremiumConfig = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)
                .map_err(|e| PremiumError::config(&format!("Failed to parse config file: {}", e)))?,
            ConfigFormat::Toml => toml::from_str(&content)
                .map_err(|e| PremiumError::config(&format!("Failed to parse config file: {}", e)))?,
        };

        Ok(Self { config })
    }

    /// 创建默认配置
    pub fn new_default() -> Self {
        Self {
            config: PremiumConfig::default(),
        }
    }

    pub fn from_config(config: PremiumConfig) -> Self {
        Self { config }
    }

    /// 保存配置到文件
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Yaml => serde_yaml::to_string(&self.config)
                .map_err(|e| PremiumError::config(&format!("Failed to serialize config: {}", e)))?,
            ConfigFormat::Toml => toml::to_string_pretty(&self.config)
                .map_err(|e| PremiumError::config(&format!("Failed to serialize config: {}", e)))?,
        };

        tokio::fs::write(path, content).await
            .map_err(|e| PremiumError::config(&format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// 获取配置
    pub fn get_config(&self) -> &PremiumConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut PremiumConfig {
        &mut self.config
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.config.bundle.artifact_prefix.is_empty() {
            return Err(PremiumError::config("Artifact prefix cannot be empty"));
        }

        if self.config.bundle.source == BundleSourceKind::Http {
            let base_url = &self.config.api.base_url;
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(PremiumError::Config {
                    message: format!("API base url must be http(s): {}", base_url),
                });
            }
        }

        if self.config.api.timeout_secs == 0 {
            return Err(PremiumError::config("API timeout must be positive"));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

/// 生成默认配置文件
pub async fn generate_default_config_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let config_manager = ConfigManager::new_default();
    config_manager.save_to_file(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_manager_default() {
        let config_manager = ConfigManager::new_default();
        let config = config_manager.get_config();

        assert_eq!(config.bundle.artifact_prefix, "PremiumComponents");
        assert_eq!(config.bundle.source, BundleSourceKind::Http);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.capabilities.debug.is_none());
        assert!(config_manager.validate().is_ok());
    }

    #[tokio::test]
    async fn test_config_save_and_load_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("premium.yaml");

        let mut config_manager = ConfigManager::new_default();
        config_manager.get_config_mut().capabilities.debug = Some(DebugSettings { store_logging: true });
        config_manager.save_to_file(&path).await.unwrap();

        let loaded = ConfigManager::load_from_file(&path).await.unwrap();
        assert_eq!(loaded.get_config().capabilities.debug, Some(DebugSettings { store_logging: true }));
        assert_eq!(loaded.get_config().api.base_url, "http://127.0.0.1:4242");
    }

    #[tokio::test]
    async fn test_config_save_and_load_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("premium.toml");

        let mut config_manager = ConfigManager::new_default();
        config_manager.get_config_mut().logging.level = LogLevel::Debug;
        config_manager.save_to_file(&path).await.unwrap();

        let loaded = ConfigManager::load_from_file(&path).await.unwrap();
        assert_eq!(loaded.get_config().logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "bundle:\n  source: !File bundle.json\n  artifact_prefix: PremiumComponents\n";
        let config: PremiumConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.bundle.source, BundleSourceKind::File(PathBuf::from("bundle.json")));
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = PremiumConfig::default();
        config.bundle.artifact_prefix.clear();
        assert!(ConfigManager::from_config(config).validate().is_err());

        let mut config = PremiumConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(ConfigManager::from_config(config.clone()).validate().is_err());

        // 文件来源不检查API地址
        config.bundle.source = BundleSourceKind::File(PathBuf::from("bundle.json"));
        assert!(ConfigManager::from_config(config).validate().is_ok());

        let mut config = PremiumConfig::default();
        config.api.timeout_secs = 0;
        assert!(ConfigManager::from_config(config).validate().is_err());
    }

    #[tokio::test]
    async fn test_generate_default_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("generated.yaml");

        generate_default_config_file(&path).await.unwrap();
        let loaded = ConfigManager::load_from_file(&path).await.unwrap();
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
        assert_eq!(tracing::Level::from(LogLevel::default()), tracing::Level::INFO);
    }
}
