// crates/rv_hydraulics/src/flow.rs

//! 水流参数计算
//!
//! 基于断面几何计算流速、弗劳德数、比能、摩阻坡度（Manning）、
//! 床面剪应力与比力（动量函数）。
//!
//! # 流态判别
//!
//! 弗劳德数判别带死区，吸收 Fr≈1 附近的浮点噪声：
//!
//! - Fr < 0.95: 缓流（subcritical）
//! - Fr > 1.05: 急流（supercritical）
//! - 其余:      临界流（critical）
//!
//! 死区阈值必须与水跃检测保持一致，不可改动。

use crate::geometry::{section_properties, SectionProps};
use crate::params::ChannelParams;
use rv_foundation::float::{safe_div, safe_sqrt};
use serde::{Deserialize, Serialize};

/// 流态判别死区下界
pub const SUBCRITICAL_BAND: f64 = 0.95;
/// 流态判别死区上界
pub const SUPERCRITICAL_BAND: f64 = 1.05;

/// 流态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowRegime {
    /// 缓流 Fr < 0.95
    Subcritical,
    /// 临界流 0.95 ≤ Fr ≤ 1.05
    Critical,
    /// 急流 Fr > 1.05
    Supercritical,
}

/// 由弗劳德数判别流态（带死区）
#[inline]
pub fn classify_regime(froude: f64) -> FlowRegime {
    if froude < SUBCRITICAL_BAND {
        FlowRegime::Subcritical
    } else if froude > SUPERCRITICAL_BAND {
        FlowRegime::Supercritical
    } else {
        FlowRegime::Critical
    }
}

/// 断面平均流速 V = Q/A（面积为 0 时返回 0）
#[inline]
pub fn velocity(discharge: f64, props: &SectionProps) -> f64 {
    safe_div(discharge, props.area)
}

/// 弗劳德数 Fr = V / √(g·D)
#[inline]
pub fn froude_number(discharge: f64, props: &SectionProps, gravity: f64) -> f64 {
    let v = velocity(discharge, props);
    let celerity = safe_sqrt(gravity * props.hydraulic_depth);
    safe_div(v, celerity)
}

/// 比能 E = y + V²/(2g)
#[inline]
pub fn specific_energy(depth: f64, discharge: f64, props: &SectionProps, gravity: f64) -> f64 {
    let v = velocity(discharge, props);
    depth + v * v / (2.0 * gravity)
}

/// Manning 摩阻坡度 Sf = (n·V / (k·R^(2/3)))²
///
/// 水力半径为 0（干断面）时返回 0。
#[inline]
pub fn friction_slope(discharge: f64, props: &SectionProps, manning_n: f64, manning_k: f64) -> f64 {
    if props.hydraulic_radius <= 0.0 {
        return 0.0;
    }
    let v = velocity(discharge, props);
    let s = safe_div(manning_n * v, manning_k * props.hydraulic_radius.powf(2.0 / 3.0));
    s * s
}

/// 床面剪应力 τ = γ·R·Sf
#[inline]
pub fn shear_stress(props: &SectionProps, friction_slope: f64, unit_weight: f64) -> f64 {
    unit_weight * props.hydraulic_radius * friction_slope
}

/// 比力（动量函数）M(y) = A²/T + Q²/(g·A)
///
/// 水跃共轭水深满足上下游比力相等。
#[inline]
pub fn momentum_function(discharge: f64, props: &SectionProps, gravity: f64) -> f64 {
    safe_div(props.area * props.area, props.top_width)
        + safe_div(discharge * discharge, gravity * props.area)
}

/// 一次性计算某水深下的全部水流参数
#[derive(Debug, Clone, Copy)]
pub struct FlowState {
    /// 水深 [m]
    pub depth: f64,
    /// 流速 [m/s]
    pub velocity: f64,
    /// 弗劳德数
    pub froude: f64,
    /// 比能 [m]
    pub specific_energy: f64,
    /// 摩阻坡度
    pub friction_slope: f64,
    /// 流态
    pub regime: FlowRegime,
}

/// 计算给定水深下的水流状态
pub fn flow_state(params: &ChannelParams, depth: f64) -> FlowState {
    let props = section_properties(&params.shape, depth);
    let g = params.gravity();
    let v = velocity(params.discharge, &props);
    let fr = froude_number(params.discharge, &props, g);
    FlowState {
        depth,
        velocity: v,
        froude: fr,
        specific_energy: specific_energy(depth, params.discharge, &props, g),
        friction_slope: friction_slope(params.discharge, &props, params.manning_n, params.manning_k()),
        regime: classify_regime(fr),
    }
}
