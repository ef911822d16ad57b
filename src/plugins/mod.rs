//! 高级组件插件包
//!
//! 定位、加载、安装和解析插件包组件

pub mod locator;
pub mod source;
pub mod evaluator;
pub mod loader;
pub mod library;
pub mod resolver;

// 重新导出核心组件
pub use locator::*;
pub use source::*;
pub use evaluator::*;
pub use loader::*;
pub use library::*;
pub use resolver::*;
