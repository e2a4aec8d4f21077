// apps/rv_cli/src/main.rs

//! RivusHydro 命令行界面
//!
//! 提供明渠水面线计算的命令行工具。
//!
//! # 架构层级
//!
//! 本模块属于应用层，只接触 [`rv_hydraulics::engine::Engine`] 门面：
//! 参数从场景文件或命令行标志装配，结果写为 CSV 或打印到终端。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// RivusHydro 明渠水面线计算命令行工具
#[derive(Parser)]
#[command(name = "rv_cli")]
#[command(author = "RivusHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "RivusHydro open-channel water surface profile solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 计算水面线并输出 CSV
    Run(commands::run::RunArgs),
    /// 显示渠道特征水深与坡度分类
    Info(commands::info::InfoArgs),
    /// 验证场景文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
