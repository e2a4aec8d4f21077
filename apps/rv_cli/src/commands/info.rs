// apps/rv_cli/src/commands/info.rs

//! 渠道信息命令
//!
//! 显示给定渠道的特征水深、坡度分类与均匀流流态，
//! 不推进整条水面线。

use anyhow::Result;
use clap::Args;
use rv_hydraulics::engine::Engine;
use rv_hydraulics::flow::{classify_regime, flow_state};
use rv_hydraulics::slope::classify_slope;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 场景文件路径 (JSON)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// 断面形状 (rectangular, trapezoidal, triangular, circular)
    #[arg(long, default_value = "rectangular")]
    pub shape: String,

    /// 底宽 [m]
    #[arg(long)]
    pub bottom_width: Option<f64>,

    /// 边坡系数 m（水平:垂直）
    #[arg(long)]
    pub side_slope: Option<f64>,

    /// 圆管直径 [m]
    #[arg(long)]
    pub diameter: Option<f64>,

    /// 流量 Q [m³/s]
    #[arg(short = 'q', long, default_value = "10.0")]
    pub discharge: f64,

    /// Manning 糙率系数 n
    #[arg(short = 'n', long, default_value = "0.013")]
    pub manning_n: f64,

    /// 纵向底坡 S₀
    #[arg(long, default_value = "0.001")]
    pub bed_slope: f64,

    /// 渠道长度 [m]
    #[arg(short = 'L', long, default_value = "1000.0")]
    pub length: f64,

    /// 使用英制单位 (ft, ft³/s)
    #[arg(long)]
    pub imperial: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== RivusHydro 渠道信息 ===");

    let params = match &args.scenario {
        Some(path) => super::load_scenario(path)?,
        None => super::build_inline_params(
            &args.shape,
            args.bottom_width.or(Some(5.0)),
            args.side_slope,
            args.diameter,
            args.discharge,
            args.manning_n,
            args.bed_slope,
            args.length,
            args.imperial,
            None,
            None,
        )?,
    };

    let engine = Engine::new();
    let yc = engine.compute_critical_depth(&params)?;
    let yn = engine.compute_normal_depth(&params)?;
    let slope_class = classify_slope(yn, yc);
    let uniform = flow_state(&params, yn);
    let regime = classify_regime(uniform.froude);

    println!("=== 渠道特征 ===");
    println!("断面形状: {}", params.shape.name());
    println!("流量 Q: {} m³/s", params.discharge);
    println!("糙率 n: {}", params.manning_n);
    println!("底坡 S₀: {}", params.bed_slope);
    println!();
    println!("临界水深 yc: {:.4} m", yc);
    println!("正常水深 yn: {:.4} m", yn);
    println!("坡度分类: {:?}", slope_class);
    println!();
    println!("均匀流状态 (y = yn):");
    println!("  流速 V: {:.4} m/s", uniform.velocity);
    println!("  弗劳德数 Fr: {:.4}", uniform.froude);
    println!("  比能 E: {:.4} m", uniform.specific_energy);
    println!("  流态: {:?}", regime);

    Ok(())
}
