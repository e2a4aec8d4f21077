// apps/rv_cli/src/commands/mod.rs

//! 命令实现模块

pub mod info;
pub mod run;
pub mod validate;

use anyhow::{bail, Context, Result};
use rv_hydraulics::params::{ChannelParams, ChannelShape, UnitSystem};
use std::path::Path;

/// 从场景 JSON 文件装配渠道参数
pub fn load_scenario(path: &Path) -> Result<ChannelParams> {
    let params = ChannelParams::from_file(path)
        .with_context(|| format!("无法加载场景文件: {}", path.display()))?;
    Ok(params)
}

/// 从内联标志装配渠道参数
///
/// `shape` 取值 rectangular / trapezoidal / triangular / circular，
/// 各形状所需几何字段缺失时报错。
#[allow(clippy::too_many_arguments)]
pub fn build_inline_params(
    shape: &str,
    bottom_width: Option<f64>,
    side_slope: Option<f64>,
    diameter: Option<f64>,
    discharge: f64,
    manning_n: f64,
    bed_slope: f64,
    length: f64,
    imperial: bool,
    upstream_depth: Option<f64>,
    downstream_depth: Option<f64>,
) -> Result<ChannelParams> {
    let shape = match shape.to_lowercase().as_str() {
        "rectangular" | "rect" => ChannelShape::Rectangular {
            bottom_width: bottom_width.context("矩形断面需要 --bottom-width")?,
        },
        "trapezoidal" | "trap" => ChannelShape::Trapezoidal {
            bottom_width: bottom_width.context("梯形断面需要 --bottom-width")?,
            side_slope: side_slope.context("梯形断面需要 --side-slope")?,
        },
        "triangular" | "tri" => ChannelShape::Triangular {
            side_slope: side_slope.context("三角形断面需要 --side-slope")?,
        },
        "circular" | "circ" => ChannelShape::Circular {
            diameter: diameter.context("圆形断面需要 --diameter")?,
        },
        other => bail!("未知断面形状: {}", other),
    };

    Ok(ChannelParams {
        shape,
        discharge,
        manning_n,
        bed_slope,
        length,
        unit_system: if imperial {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        },
        upstream_depth,
        downstream_depth,
    })
}
