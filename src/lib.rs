//! premium_loader - 高级组件插件包加载器
//!
//! 在运行中的宿主里按需加载可选的高级组件插件包，向插件包共享宿主组件和库，
//! 并按名称解析插件包导出的组件，不可用时回退到加载失败占位组件。
//!
//! # 架构分层
//!
//! - **宿主桥接**: 启动时发布共享库、能力描述符和共享组件
//! - **插件包定位**: 按前缀扫描共享命名空间
//! - **插件包加载**: 获取并执行插件包，最多一次，并发请求共享同一次加载
//! - **组件库解析**: 一次性安装到宿主框架
//! - **组件解析**: 按名称返回组件或占位组件

pub mod error;
pub mod types;
pub mod config;
pub mod namespace;
pub mod host;
pub mod components;
pub mod bridge;
pub mod plugins;
pub mod premium;

// 重新导出核心类型
pub use types::*;
pub use error::*;
pub use plugins::*;
pub use premium::*;

use config::LoggingConfig;

/// 加载器信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const LOADER_NAME: &str = "premium_loader";

/// 初始化日志系统，重复初始化不会报错
pub fn initialize(logging: &LoggingConfig) -> Result<()> {
    let level: tracing::Level = logging.level.into();
    if tracing_subscriber::fmt().with_max_level(level).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }

    tracing::info!("Initializing {} v{}", LOADER_NAME, VERSION);
    Ok(())
}
