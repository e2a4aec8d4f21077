// apps/rv_cli/src/commands/validate.rs

//! 场景验证命令
//!
//! 验证场景文件的格式与参数取值，打印错误与警告清单。
//! 存在错误时以非零状态退出（严格模式下警告也视为错误）。

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 场景文件路径 (JSON)
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,

    /// 以 JSON 输出验证报告
    #[arg(long)]
    pub json: bool,
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== RivusHydro 场景验证 ===");
    println!("检查场景文件: {}", args.scenario.display());

    let params = super::load_scenario(&args.scenario)?;
    println!("  ✓ 场景文件格式有效");

    let report = params.validate();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        if report.is_valid() && !(args.strict && report.has_warnings()) {
            return Ok(());
        }
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            report.errors.len(),
            report.warnings.len()
        );
    }

    if !report.errors.is_empty() {
        println!("\n错误 ({}):", report.errors.len());
        for err in &report.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !report.warnings.is_empty() {
        println!("\n警告 ({}):", report.warnings.len());
        for warning in &report.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if args.strict {
        report.is_valid() && !report.has_warnings()
    } else {
        report.is_valid()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            report.errors.len(),
            report.warnings.len()
        )
    }
}
