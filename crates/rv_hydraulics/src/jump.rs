// crates/rv_hydraulics/src/jump.rs

//! 水跃检测与计算
//!
//! 在按站号排序的水面线点序列中寻找弗劳德数 >1 → <1 的跨越区间，
//! 计算共轭水深、能量损失、跃长与强度分类。
//!
//! # 共轭水深
//!
//! 矩形断面闭式解：
//!
//! ```text
//! y₂ = (y₁/2)·(√(1 + 8·Fr₁²) − 1)
//! ```
//!
//! 其他形状在动量函数上二分求解：M(y₂) = M(y₁)，
//! M(y) = A²/T + Q²/(g·A)。
//!
//! # 跃址细化
//!
//! 在夹住 Fr = 1 的两点之间线性插值，取得更精确的跃址站号。

use crate::flow::{momentum_function, SUPERCRITICAL_BAND};
use crate::geometry::section_properties;
use crate::params::{ChannelParams, ChannelShape};
use crate::solvers::critical::open_channel_depth_bound;
use crate::types::{FlowDepthPoint, HydraulicJump, JumpClass};
use rv_foundation::float::MIN_BRACKET_DEPTH;
use tracing::debug;

/// 二分求共轭水深的容差与预算（与其余求根器一致）
const TOLERANCE: f64 = 1e-4;
const MAX_ITERATIONS: usize = 50;

/// 在点序列中寻找首个水跃跨越区间（相邻两点 Fr: >1 → <1）
///
/// 返回区间左端点下标。序列须已按站号升序排列。
pub fn find_jump_interval(points: &[FlowDepthPoint]) -> Option<usize> {
    points
        .windows(2)
        .position(|w| w[0].froude > 1.0 && w[1].froude < 1.0)
}

/// 寻找全部水跃跨越区间（多跃变体）
pub fn find_all_jump_intervals(points: &[FlowDepthPoint]) -> Vec<usize> {
    points
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].froude > 1.0 && w[1].froude < 1.0)
        .map(|(i, _)| i)
        .collect()
}

/// 共轭水深：给定跃前水深与弗劳德数，求跃后水深
///
/// 矩形为闭式解；其他形状在 `[跃前水深, y_max]` 上二分
/// 动量函数差。不夹根时返回区间中点（最优估计）。
pub fn sequent_depth(params: &ChannelParams, upstream_depth: f64, upstream_froude: f64) -> f64 {
    match params.shape {
        ChannelShape::Rectangular { .. } => {
            let fr2 = upstream_froude * upstream_froude;
            0.5 * upstream_depth * ((1.0 + 8.0 * fr2).sqrt() - 1.0)
        }
        _ => sequent_depth_momentum(params, upstream_depth),
    }
}

/// 非矩形断面：二分求动量函数相等的共轭水深
fn sequent_depth_momentum(params: &ChannelParams, upstream_depth: f64) -> f64 {
    let g = params.gravity();
    let m_upstream = {
        let props = section_properties(&params.shape, upstream_depth);
        momentum_function(params.discharge, &props, g)
    };
    let residual = |y: f64| {
        let props = section_properties(&params.shape, y);
        momentum_function(params.discharge, &props, g) - m_upstream
    };

    // 共轭水深在跃前水深之上
    let mut lo = upstream_depth * (1.0 + 1e-6);
    let mut hi = match params.shape {
        ChannelShape::Circular { diameter } => diameter,
        _ => open_channel_depth_bound(params.discharge, g),
    };
    if hi <= lo {
        hi = lo * 2.0;
    }

    let f_lo = residual(lo);
    let f_hi = residual(hi);
    if f_lo * f_hi > 0.0 {
        debug!(upstream_depth, "共轭水深区间不夹根，返回中点");
        return 0.5 * (lo + hi);
    }

    let mut mid = 0.5 * (lo + hi);
    for _ in 0..MAX_ITERATIONS {
        mid = 0.5 * (lo + hi);
        let f_mid = residual(mid);
        if f_mid.abs() < TOLERANCE || 0.5 * (hi - lo) < TOLERANCE {
            break;
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    mid.max(MIN_BRACKET_DEPTH)
}

/// 跃长经验公式：跃长 = 系数 × 跃后水深，系数按弗劳德数分档
fn jump_length(upstream_froude: f64, downstream_depth: f64) -> f64 {
    let multiplier = match JumpClass::from_froude(upstream_froude) {
        JumpClass::Undular => 5.0,
        JumpClass::Weak => 5.5,
        JumpClass::Oscillating => 6.0,
        JumpClass::Steady => 6.0,
        JumpClass::Strong => 7.0,
    };
    multiplier * downstream_depth
}

/// 能量损失 ΔE = (y₂ − y₁)³ / (4·y₁·y₂)
fn energy_loss(upstream_depth: f64, downstream_depth: f64) -> f64 {
    let dy = downstream_depth - upstream_depth;
    (dy * dy * dy) / (4.0 * upstream_depth * downstream_depth)
}

/// 在 Fr=1 跨越区间内线性插值跃址站号
fn refine_station(before: &FlowDepthPoint, after: &FlowDepthPoint) -> f64 {
    let dfr = before.froude - after.froude;
    if dfr.abs() < 1e-12 {
        return 0.5 * (before.station + after.station);
    }
    let t = (before.froude - 1.0) / dfr;
    before.station + t.clamp(0.0, 1.0) * (after.station - before.station)
}

/// 由跨越区间计算水跃
///
/// 跃前流态须为急流（弗劳德数超出 1.05 死区），否则判为不发生。
pub fn compute_jump(
    params: &ChannelParams,
    before: &FlowDepthPoint,
    after: &FlowDepthPoint,
) -> HydraulicJump {
    let fr1 = before.froude;
    // 可行性：跃前必须是急流
    if fr1 <= SUPERCRITICAL_BAND {
        return HydraulicJump::None;
    }

    let y1 = before.depth;
    let y2 = sequent_depth(params, y1, fr1);
    if y2 <= y1 {
        return HydraulicJump::None;
    }

    let station = refine_station(before, after);
    let jump = HydraulicJump::Occurs {
        station,
        upstream_depth: y1,
        downstream_depth: y2,
        energy_loss: energy_loss(y1, y2),
        upstream_froude: fr1,
        length: jump_length(fr1, y2),
        class: JumpClass::from_froude(fr1),
    };
    debug!(station, y1, y2, fr1, "检测到水跃");
    jump
}

/// 扫描点序列，计算首个水跃
pub fn detect_jump(params: &ChannelParams, points: &[FlowDepthPoint]) -> HydraulicJump {
    match find_jump_interval(points) {
        Some(i) => compute_jump(params, &points[i], &points[i + 1]),
        None => HydraulicJump::None,
    }
}

/// 扫描点序列，计算全部水跃（多跃变体）
pub fn detect_all_jumps(params: &ChannelParams, points: &[FlowDepthPoint]) -> Vec<HydraulicJump> {
    find_all_jump_intervals(points)
        .into_iter()
        .map(|i| compute_jump(params, &points[i], &points[i + 1]))
        .filter(|j| j.occurs())
        .collect()
}
