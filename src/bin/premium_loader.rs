//! premium_loader 命令行 - 配置驱动的插件包检查
//!
//! 加载配置，运行宿主桥接，解析所有已知高级组件并报告结果

use premium_loader::{
    config::{generate_default_config_file, ConfigManager},
    host::ComponentRegistry,
    initialize, PremiumLoader, Result, PREMIUM_COMPONENT_NAMES,
};
use std::env;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CONFIG_PATH: &str = "premium_loader.yaml";

/// 程序入口点
#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(_) => {}
        Err(e) => {
            tracing::error!("❌ 程序运行失败: {}", e);
            eprintln!("premium_loader: {}", e);
            std::process::exit(1);
        }
    }
}

/// 主要逻辑函数
async fn run_main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => run_with_config(ConfigManager::new_default()).await,
        2 => match args[1].as_str() {
            "init" => generate_config_file().await,
            "-h" | "--help" => {
                print_usage();
                Ok(())
            }
            path => {
                if !Path::new(path).exists() {
                    print_usage();
                    return Err(premium_loader::PremiumError::Config {
                        message: format!("Config file does not exist: {}", path),
                    });
                }
                run_with_config(ConfigManager::load_from_file(path).await?).await
            }
        },
        _ => {
            print_usage();
            Ok(())
        }
    }
}

/// 解析所有已知高级组件
async fn run_with_config(config_manager: ConfigManager) -> Result<()> {
    config_manager.validate()?;
    let config = config_manager.get_config();
    initialize(&config.logging)?;

    tracing::info!("🚀 Bundle source: {:?}", config.bundle.source);

    let host = Arc::new(ComponentRegistry::new());
    let loader = PremiumLoader::from_config(config, host.clone())?;
    loader.setup();

    for name in PREMIUM_COMPONENT_NAMES {
        match loader.load(name).await {
            Ok(component) if component.name() == name => {
                println!("{:<20} resolved", name);
            }
            Ok(component) => {
                println!("{:<20} fallback ({})", name, component.name());
            }
            Err(e) => {
                println!("{:<20} failed: {}", name, e);
            }
        }
    }

    let stats = loader.get_statistics();
    tracing::info!(
        "📊 fetch_attempts={}, cache_hits={}, failures={}, installs={}",
        stats.fetch_attempts,
        stats.cache_hits,
        stats.failures,
        host.install_count()
    );
    Ok(())
}

/// 生成默认配置文件
async fn generate_config_file() -> Result<()> {
    generate_default_config_file(DEFAULT_CONFIG_PATH).await?;
    println!("Generated {}", DEFAULT_CONFIG_PATH);
    Ok(())
}

/// 打印使用说明
fn print_usage() {
    println!("premium_loader {}", premium_loader::VERSION);
    println!();
    println!("用法:");
    println!("  premium_loader                 # 使用默认配置运行");
    println!("  premium_loader init            # 生成默认配置文件");
    println!("  premium_loader <config_file>   # 使用指定配置文件运行 (YAML 或 TOML)");
}
