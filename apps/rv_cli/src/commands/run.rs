// apps/rv_cli/src/commands/run.rs

//! 水面线计算命令
//!
//! 从场景文件或内联标志装配参数，调用引擎计算水面线，
//! 将逐站结果写为 CSV。水跃与壅塞在日志中报告。

use anyhow::{Context, Result};
use clap::Args;
use rv_hydraulics::engine::{ComputeOptions, Engine};
use rv_hydraulics::types::{HydraulicJump, ProfileResult};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// 水面线计算参数
#[derive(Args)]
pub struct RunArgs {
    /// 场景文件路径 (JSON)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// 输出 CSV 路径
    #[arg(short, long, default_value = "profile.csv")]
    pub output: PathBuf,

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

    /// 上游边界水深 [m]
    #[arg(long)]
    pub upstream_depth: Option<f64>,

    /// 下游边界水深 [m]
    #[arg(long)]
    pub downstream_depth: Option<f64>,

    /// 站步数（分辨率）
    #[arg(long, default_value = "100")]
    pub steps: usize,

    /// 双向推进（急流/缓流两支在动量平衡站合并）
    #[arg(long)]
    pub bidirectional: bool,

    /// 关闭水跃检测
    #[arg(long)]
    pub no_jumps: bool,
}

/// 执行计算命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== RivusHydro 水面线计算 ===");

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
            args.upstream_depth,
            args.downstream_depth,
        )?,
    };

    info!(
        "断面: {}, Q={} m³/s, n={}, S₀={}, L={} m",
        params.shape.name(),
        params.discharge,
        params.manning_n,
        params.bed_slope,
        params.length
    );

    let engine = Engine::new();
    let options = ComputeOptions {
        resolution: args.steps,
        bidirectional: args.bidirectional,
        detect_jumps: !args.no_jumps,
        use_cache: false,
        progress: None,
    };

    let start = Instant::now();
    let profile = engine
        .compute_profile(&params, options)
        .context("水面线计算失败")?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    report_profile(&profile);
    write_csv(&args.output, &profile)?;

    info!("=== 计算完成 ===");
    info!("站点数: {}", profile.points.len());
    info!("计算时间: {:.3} ms", elapsed_ms);
    info!("输出: {}", args.output.display());

    Ok(())
}

fn report_profile(profile: &ProfileResult) {
    info!(
        "坡度分类: {:?}, 水面线类型: {:?}",
        profile.slope_class, profile.profile_type
    );
    info!(
        "临界水深 yc={:.4} m, 正常水深 yn={:.4} m",
        profile.critical_depth, profile.normal_depth
    );

    if let Some(HydraulicJump::Occurs {
        station,
        upstream_depth,
        downstream_depth,
        energy_loss,
        upstream_froude,
        length,
        class,
    }) = &profile.jump
    {
        info!(
            "水跃: 站号 {:.2} m, y1={:.4} m → y2={:.4} m, Fr1={:.3}, ΔE={:.4} m, 跃长≈{:.1} m, 类型 {:?}",
            station, upstream_depth, downstream_depth, upstream_froude, energy_loss, length, class
        );
    }

    if profile.choking {
        warn!("壅塞: 给定边界条件无法满足，水面线在中途终止");
    }
    if !profile.critical_converged || !profile.normal_converged {
        warn!(
            "水深求解未完全收敛 (yc: {}, yn: {})，结果为最优估计",
            profile.critical_converged, profile.normal_converged
        );
    }
}

/// 逐站结果写为 CSV
fn write_csv(path: &std::path::Path, profile: &ProfileResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("无法创建输出文件: {}", path.display()))?;

    writer.write_record([
        "station_m",
        "depth_m",
        "velocity_mps",
        "froude",
        "specific_energy_m",
        "critical_depth_m",
        "normal_depth_m",
    ])?;

    for p in &profile.points {
        writer.write_record([
            format!("{:.4}", p.station),
            format!("{:.6}", p.depth),
            format!("{:.6}", p.velocity),
            format!("{:.6}", p.froude),
            format!("{:.6}", p.specific_energy),
            format!("{:.6}", p.critical_depth),
            format!("{:.6}", p.normal_depth),
        ])?;
    }

    writer.flush().context("CSV 写入失败")?;
    Ok(())
}
