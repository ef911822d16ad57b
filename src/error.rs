//! 高级组件加载错误处理
//!
//! 统一的错误类型，覆盖插件包获取、执行、安装和配置各阶段

use thiserror::Error;

/// 加载器统一错误类型
#[derive(Error, Debug)]
pub enum PremiumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 插件包执行后命名空间中仍没有任何组件
    #[error("Load error: {message}")]
    Load { message: String },

    /// 插件包执行失败
    #[error("Script evaluation error: {message}")]
    ScriptEvaluation { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Install error: {message}")]
    Install { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PremiumError {
    /// 创建加载错误
    pub fn load(message: &str) -> Self {
        Self::Load {
            message: message.to_string(),
        }
    }

    /// 创建插件包执行错误
    pub fn script_evaluation(message: &str) -> Self {
        Self::ScriptEvaluation {
            message: message.to_string(),
        }
    }

    /// 创建网络相关错误
    pub fn network(message: &str) -> Self {
        Self::Network {
            message: message.to_string(),
        }
    }

    /// 创建安装错误
    pub fn install(message: &str) -> Self {
        Self::Install {
            message: message.to_string(),
        }
    }

    /// 创建配置相关错误
    pub fn config(message: &str) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }
}

/// 并发请求共享同一次加载结果，错误需要可复制
impl Clone for PremiumError {
    fn clone(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Serialization(e) => Self::Serialization(<serde_json::Error as serde::de::Error>::custom(e.to_string())),
            Self::Load { message } => Self::Load { message: message.clone() },
            Self::ScriptEvaluation { message } => Self::ScriptEvaluation { message: message.clone() },
            Self::Network { message } => Self::Network { message: message.clone() },
            Self::Install { message } => Self::Install { message: message.clone() },
            Self::Config { message } => Self::Config { message: message.clone() },
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PremiumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = PremiumError::load("There was no component loaded");
        assert!(matches!(error, PremiumError::Load { .. }));
        assert_eq!(error.to_string(), "Load error: There was no component loaded");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let premium_error = PremiumError::from(io_error);
        assert!(matches!(premium_error, PremiumError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let premium_error = PremiumError::from(json_error);
        assert!(matches!(premium_error, PremiumError::Serialization(_)));
    }

    #[test]
    fn test_clone_keeps_variant_and_message() {
        let network = PremiumError::network("Renderer request failed (503)");
        let cloned = network.clone();
        assert!(matches!(cloned, PremiumError::Network { .. }));
        assert_eq!(cloned.to_string(), network.to_string());

        let io = PremiumError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "bundle.json"));
        match io.clone() {
            PremiumError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected variant: {:?}", other),
        }

        let json = PremiumError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(matches!(json.clone(), PremiumError::Serialization(_)));
    }

    #[test]
    fn test_result_type() {
        let success: Result<i32> = Ok(42);
        let failure: Result<i32> = Err(PremiumError::network("Connection refused"));

        assert!(success.is_ok());
        assert!(failure.is_err());
    }
}
