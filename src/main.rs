use anyhow::{Context, Result};
use exam_paper_pipeline::utils::logging;
use exam_paper_pipeline::{App, Config};
use std::path::Path;

/// 默认配置文件，存在时优先读取
const CONFIG_FILE: &str = "exam_pipeline.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config_path = std::env::var("EXAM_PIPELINE_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).with_context(|| format!("加载配置失败: {}", config_path))?
    } else {
        Config::from_env().context("读取环境变量配置失败")?
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
