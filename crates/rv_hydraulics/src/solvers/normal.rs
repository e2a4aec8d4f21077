// crates/rv_hydraulics/src/solvers/normal.rs

//! 正常水深求解
//!
//! 正常水深 yn 满足 Manning 均匀流方程：
//!
//! ```text
//! Q = (k/n)·A·R^(2/3)·S^(1/2)
//! ```
//!
//! 求 F(y) = Q − (k/n)·A(y)·R(y)^(2/3)·√S 的零点。
//! 默认二分法；可选割线法（[`NormalStrategy::Secant`]）。
//! 容差、迭代预算与不收敛策略同临界水深求解。

use super::critical::open_channel_depth_bound;
use super::{bisect, RootSolve, MAX_ITERATIONS, TOLERANCE};
use crate::geometry::section_properties;
use crate::params::{ChannelParams, ChannelShape};
use rv_foundation::float::MIN_BRACKET_DEPTH;

/// 正常水深求解策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalStrategy {
    /// 二分法（默认，稳健）
    #[default]
    Bisection,
    /// 割线法（收敛更快，初值敏感）
    Secant,
}

/// Manning 均匀流残差 F(y) = Q − (k/n)·A·R^(2/3)·√S
fn residual(params: &ChannelParams, y: f64) -> f64 {
    let props = section_properties(&params.shape, y);
    if props.area <= 0.0 {
        return params.discharge;
    }
    let conveyance = (params.manning_k() / params.manning_n)
        * props.area
        * props.hydraulic_radius.powf(2.0 / 3.0);
    params.discharge - conveyance * params.bed_slope.sqrt()
}

/// 计算正常水深
pub fn normal_depth(params: &ChannelParams, strategy: NormalStrategy) -> RootSolve {
    let y_max = match params.shape {
        ChannelShape::Circular { diameter } => diameter,
        _ => open_channel_depth_bound(params.discharge, params.gravity()),
    };

    match strategy {
        NormalStrategy::Bisection => bisect(
            |y| residual(params, y),
            MIN_BRACKET_DEPTH,
            y_max,
            TOLERANCE,
            MAX_ITERATIONS,
        ),
        NormalStrategy::Secant => secant(params, MIN_BRACKET_DEPTH, y_max),
    }
}

/// 割线法：以区间端点为前两个迭代点，失败时回退二分
fn secant(params: &ChannelParams, lo: f64, hi: f64) -> RootSolve {
    let mut x0 = lo;
    let mut x1 = hi;
    let mut f0 = residual(params, x0);
    let mut f1 = residual(params, x1);

    for iter in 1..=MAX_ITERATIONS {
        let denom = f1 - f0;
        if denom.abs() < 1e-14 {
            // 割线退化，回退二分
            return bisect(|y| residual(params, y), lo, hi, TOLERANCE, MAX_ITERATIONS);
        }
        let x2 = x1 - f1 * (x1 - x0) / denom;
        // 越出物理区间同样回退二分
        if !x2.is_finite() || x2 <= 0.0 || x2 > hi * 2.0 {
            return bisect(|y| residual(params, y), lo, hi, TOLERANCE, MAX_ITERATIONS);
        }
        if (x2 - x1).abs() < TOLERANCE {
            return RootSolve::converged(x2, iter);
        }
        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = residual(params, x2);
    }
    RootSolve::best_effort(x1, MAX_ITERATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::UnitSystem;

    fn rect_params() -> ChannelParams {
        ChannelParams {
            shape: ChannelShape::Rectangular { bottom_width: 5.0 },
            discharge: 10.0,
            manning_n: 0.013,
            bed_slope: 0.001,
            length: 1000.0,
            unit_system: UnitSystem::Metric,
            upstream_depth: None,
            downstream_depth: None,
        }
    }

    #[test]
    fn test_normal_depth_satisfies_manning() {
        let params = rect_params();
        let yn = normal_depth(&params, NormalStrategy::Bisection);
        assert!(yn.converged);
        // 回代：残差应在容差内
        assert!(residual(&params, yn.value).abs() < 0.05);
    }

    #[test]
    fn test_bisection_and_secant_agree() {
        let params = rect_params();
        let bis = normal_depth(&params, NormalStrategy::Bisection);
        let sec = normal_depth(&params, NormalStrategy::Secant);
        assert!(
            (bis.value - sec.value).abs() < 1e-2,
            "bisection={:.5} secant={:.5}",
            bis.value,
            sec.value
        );
    }

    #[test]
    fn test_mild_slope_normal_exceeds_critical() {
        // 经典算例：b=5, Q=10, S=0.001, n=0.013 ⇒ 缓坡，yn > yc
        let params = rect_params();
        let yn = normal_depth(&params, NormalStrategy::Bisection).value;
        let yc = super::super::critical_depth(&params).value;
        assert!(yn > yc, "yn={:.4} yc={:.4}", yn, yc);
    }

    #[test]
    fn test_steeper_slope_reduces_normal_depth() {
        let mild = rect_params();
        let mut steep = rect_params();
        steep.bed_slope = 0.05;
        let yn_mild = normal_depth(&mild, NormalStrategy::Bisection).value;
        let yn_steep = normal_depth(&steep, NormalStrategy::Bisection).value;
        assert!(yn_steep < yn_mild);
    }

    #[test]
    fn test_circular_normal_within_diameter() {
        let params = ChannelParams {
            shape: ChannelShape::Circular { diameter: 2.0 },
            discharge: 2.0,
            manning_n: 0.013,
            bed_slope: 0.002,
            length: 500.0,
            unit_system: UnitSystem::Metric,
            upstream_depth: None,
            downstream_depth: None,
        };
        let yn = normal_depth(&params, NormalStrategy::Bisection);
        assert!(yn.value > 0.0);
        assert!(yn.value <= 2.0);
    }

    #[test]
    fn test_trapezoidal_normal_depth() {
        let params = ChannelParams {
            shape: ChannelShape::Trapezoidal {
                bottom_width: 3.0,
                side_slope: 2.0,
            },
            discharge: 15.0,
            manning_n: 0.025,
            bed_slope: 0.0015,
            length: 800.0,
            unit_system: UnitSystem::Metric,
            upstream_depth: None,
            downstream_depth: None,
        };
        let yn = normal_depth(&params, NormalStrategy::Bisection);
        assert!(yn.converged);
        assert!(residual(&params, yn.value).abs() < 0.1);
    }
}
