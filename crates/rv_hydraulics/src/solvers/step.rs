// crates/rv_hydraulics/src/solvers/step.rs

//! 标准步单站隐式求解
//!
//! 已知当前站的水深，求下一站水深，使能量平衡残差为零：
//!
//! ```text
//! R(y) = E(y) − [E(cur) + S₀·Δx − S̄f(y)·Δx]
//! S̄f(y) = (Sf(cur) + Sf(y)) / 2
//! ```
//!
//! 其中 Δx 为带符号的站距（向下游推进为正，向上游为负），
//! 床面高差与摩阻损失因此自动取得正确符号。
//!
//! # 求解方法
//!
//! 主方法为阻尼 Newton-Raphson，导数用中心差分估计。
//! 以下任一情形切换为二分法：
//!
//! 1. 导数接近零
//! 2. 残差连续 3 次迭代增大或振荡
//! 3. 迭代预算耗尽（50 次，容差 1e-4）
//!
//! 水深在迭代中保持为正；圆形断面另受直径上限约束。
//! 二分区间也不夹根时视为求解失败（`valid == false`），
//! 由积分器升级为壅塞（choking）。

use super::critical::open_channel_depth_bound;
use super::{MAX_ITERATIONS, TOLERANCE};
use crate::flow::{friction_slope, specific_energy};
use crate::geometry::{max_depth, section_properties};
use crate::params::ChannelParams;
use rv_foundation::float::MIN_BRACKET_DEPTH;
use tracing::debug;

/// 推进方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 向上游推进（站号减小）
    Upstream,
    /// 向下游推进（站号增大）
    Downstream,
}

impl Direction {
    /// 站距符号：下游 +1，上游 −1
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Downstream => 1.0,
            Self::Upstream => -1.0,
        }
    }
}

/// 单站求解输入
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    /// 渠道参数
    pub params: &'a ChannelParams,
    /// 当前站水深
    pub current_depth: f64,
    /// 站距大小（正值）
    pub dx: f64,
    /// 推进方向
    pub direction: Direction,
    /// 正常水深（用于初值启发式）
    pub normal_depth: f64,
}

/// 单站求解结果
#[derive(Debug, Clone, Copy)]
pub struct StepResult {
    /// 下一站水深
    pub depth: f64,
    /// 是否在容差内收敛
    pub converged: bool,
    /// 是否动用了二分回退
    pub fallback: bool,
    /// 迭代次数（Newton 与二分合计）
    pub iterations: usize,
    /// 解是否物理有效（false 时积分器应判定壅塞）
    pub valid: bool,
}

/// 残差连续增大/振荡的容忍次数
const DIVERGENCE_STREAK: usize = 3;
/// 导数下限，低于此值视为退化
const DERIVATIVE_FLOOR: f64 = 1e-10;

/// 求解下一站水深
pub fn solve_step(input: &StepInput) -> StepResult {
    let params = input.params;
    let dx_signed = input.direction.sign() * input.dx;

    let cur_props = section_properties(&params.shape, input.current_depth);
    let g = params.gravity();
    let e_current = specific_energy(input.current_depth, params.discharge, &cur_props, g);
    let sf_current = friction_slope(
        params.discharge,
        &cur_props,
        params.manning_n,
        params.manning_k(),
    );

    let y_ceiling = depth_ceiling(params);
    let clamp = |y: f64| y.clamp(MIN_BRACKET_DEPTH, y_ceiling);

    // R(y) = E(y) − E(cur) − (S₀ − S̄f(y))·Δx
    let residual = |y: f64| {
        let props = section_properties(&params.shape, y);
        let e = specific_energy(y, params.discharge, &props, g);
        let sf = friction_slope(params.discharge, &props, params.manning_n, params.manning_k());
        let sf_avg = 0.5 * (sf_current + sf);
        e - e_current - (params.bed_slope - sf_avg) * dx_signed
    };

    // 初值启发式：沿推进方向朝正常水深靠拢 ±5%
    let mut y = clamp(initial_guess(input));
    let mut prev_error = f64::INFINITY;
    let mut divergence_streak = 0usize;

    for iter in 0..MAX_ITERATIONS {
        let r = residual(y);
        let error = r.abs();
        if error < TOLERANCE {
            return StepResult {
                depth: y,
                converged: true,
                fallback: false,
                iterations: iter,
                valid: true,
            };
        }

        // 残差增大或振荡计数
        if error >= prev_error {
            divergence_streak += 1;
        } else {
            divergence_streak = 0;
        }
        prev_error = error;

        if divergence_streak >= DIVERGENCE_STREAK {
            debug!(iter, error, "Newton 振荡，切换二分法");
            return bisection_fallback(&residual, input.current_depth, y_ceiling, iter);
        }

        // 中心差分导数
        let eps = (1e-4 * y).max(1e-6);
        let derivative = (residual(y + eps) - residual(y - eps)) / (2.0 * eps);
        if derivative.abs() < DERIVATIVE_FLOOR {
            debug!(iter, derivative, "导数退化，切换二分法");
            return bisection_fallback(&residual, input.current_depth, y_ceiling, iter);
        }

        // 阻尼更新：单步修正不超过当前水深的一半
        let mut delta = -r / derivative;
        let limit = 0.5 * y;
        if delta.abs() > limit {
            delta = limit * delta.signum();
        }
        y = clamp(y + delta);
    }

    debug!("Newton 预算耗尽，切换二分法");
    bisection_fallback(&residual, input.current_depth, y_ceiling, MAX_ITERATIONS)
}

/// 圆形断面水深上限为直径，开敞断面取经验上界
fn depth_ceiling(params: &ChannelParams) -> f64 {
    let shape_max = max_depth(&params.shape);
    if shape_max.is_finite() {
        shape_max
    } else {
        open_channel_depth_bound(params.discharge, params.gravity()) * 2.0
    }
}

/// 初值启发式：±5% 朝正常水深靠拢
///
/// 壅水（当前水深低于正常水深一侧）水深沿程抬升，反之回落；
/// 方向与坡度已体现在带符号站距中。
fn initial_guess(input: &StepInput) -> f64 {
    if input.current_depth > input.normal_depth {
        input.current_depth * 0.95
    } else {
        input.current_depth * 1.05
    }
}

/// 二分回退：在 [下限, 上限] 内搜根
///
/// 先以当前水深为中心展开搜索异号区间；完全不夹根时
/// 标记解无效，交由积分器判定壅塞。
fn bisection_fallback<F: Fn(f64) -> f64>(
    residual: &F,
    current_depth: f64,
    y_ceiling: f64,
    spent_iterations: usize,
) -> StepResult {
    // 上界先取经验倍数，最后受断面水深上限约束（圆形为管径）
    let lo = MIN_BRACKET_DEPTH;
    let hi = (current_depth * 8.0).min(y_ceiling);

    let mut a = lo;
    let mut b = hi;
    let mut f_a = residual(a);
    let f_b = residual(b);

    if f_a * f_b > 0.0 {
        // 区间不夹根：能量方程在给定边界条件下无解
        return StepResult {
            depth: current_depth,
            converged: false,
            fallback: true,
            iterations: spent_iterations,
            valid: false,
        };
    }

    let mut mid = 0.5 * (a + b);
    for iter in 1..=MAX_ITERATIONS {
        mid = 0.5 * (a + b);
        let f_mid = residual(mid);
        if f_mid.abs() < TOLERANCE || 0.5 * (b - a) < TOLERANCE {
            return StepResult {
                depth: mid,
                converged: true,
                fallback: true,
                iterations: spent_iterations + iter,
                valid: true,
            };
        }
        if f_a * f_mid < 0.0 {
            b = mid;
        } else {
            a = mid;
            f_a = f_mid;
        }
    }

    // 预算耗尽：按契约返回中点，解仍视为可用
    StepResult {
        depth: mid,
        converged: false,
        fallback: true,
        iterations: spent_iterations + MAX_ITERATIONS,
        valid: true,
    }
}
