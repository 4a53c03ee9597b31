mod config;
mod error;
mod package;
mod package_manager;
mod tui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lian-pkgview", version, about = "Arch Linux 包浏览器")]
struct Cli {
    /// 不进入界面，直接以 JSON 输出匹配的包（可选过滤正则）
    #[arg(long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "")]
    json: Option<String>,

    /// 指定配置文件
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load_or_default()?,
    };

    match cli.json {
        Some(pattern) => dump_json(&config, &pattern),
        None => tui::run(config).await,
    }
}

fn dump_json(config: &config::Config, pattern: &str) -> Result<()> {
    let pm = package_manager::PackageManager::new(config.pacman.clone());
    let mut packages = pm.load_catalog(config.show_foreign)?;

    if !pattern.is_empty() {
        let re = package::search_regex(pattern)?;
        packages.retain(|p| p.matches(&re, &config.filter_attributes));
    }
    packages.sort_by(|a, b| a.cmp_by(b, config.sort_by));

    log::info!("输出 {} 个包", packages.len());
    println!("{}", serde_json::to_string_pretty(&packages)?);
    Ok(())
}
