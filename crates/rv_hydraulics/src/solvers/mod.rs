// crates/rv_hydraulics/src/solvers/mod.rs

//! 迭代求根器
//!
//! 临界水深、正常水深与逐站能量平衡（标准步推算）的非线性求解。
//!
//! # 不收敛策略
//!
//! 所有求根器在迭代预算耗尽时**不报错**，返回当前最优估计
//! （二分法为区间中点），并在 [`RootSolve::converged`] 上置 false。
//! 这是文档化的契约：调用方据此区分精确解与近似解。

pub mod critical;
pub mod normal;
pub mod step;

pub use critical::critical_depth;
pub use normal::{normal_depth, NormalStrategy};
pub use step::{solve_step, Direction, StepInput};

use rv_foundation::float::{SOLVER_MAX_ITERATIONS, SOLVER_TOLERANCE};

/// 求根结果
///
/// `converged == false` 表示迭代预算耗尽，`value` 是最优估计而非保证的根。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolve {
    /// 根（或最优估计）
    pub value: f64,
    /// 是否在容差内收敛
    pub converged: bool,
    /// 实际迭代次数
    pub iterations: usize,
}

impl RootSolve {
    /// 收敛解
    pub fn converged(value: f64, iterations: usize) -> Self {
        Self {
            value,
            converged: true,
            iterations,
        }
    }

    /// 未收敛的最优估计
    pub fn best_effort(value: f64, iterations: usize) -> Self {
        Self {
            value,
            converged: false,
            iterations,
        }
    }
}

/// 通用二分法求根
///
/// 在 `[lo, hi]` 上求 `f` 的零点。区间端点不要求异号：
/// 若同号则直接返回中点且不收敛（调用方自行选择的经验区间
/// 可能不含根）。容差判据为区间宽度之半。
pub(crate) fn bisect<F: Fn(f64) -> f64>(
    f: F,
    mut lo: f64,
    mut hi: f64,
    tolerance: f64,
    max_iterations: usize,
) -> RootSolve {
    let f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo == 0.0 {
        return RootSolve::converged(lo, 0);
    }
    if f_hi == 0.0 {
        return RootSolve::converged(hi, 0);
    }
    if f_lo * f_hi > 0.0 {
        // 区间不夹根，按契约返回中点
        return RootSolve::best_effort(0.5 * (lo + hi), 0);
    }

    let mut mid = 0.5 * (lo + hi);
    for iter in 1..=max_iterations {
        mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || 0.5 * (hi - lo) < tolerance {
            return RootSolve::converged(mid, iter);
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    RootSolve::best_effort(mid, max_iterations)
}

/// 求解器默认容差（1e-4）
pub const TOLERANCE: f64 = SOLVER_TOLERANCE;
/// 求解器默认迭代预算（50）
pub const MAX_ITERATIONS: usize = SOLVER_MAX_ITERATIONS;
