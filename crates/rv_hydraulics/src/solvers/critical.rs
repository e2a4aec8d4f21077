// crates/rv_hydraulics/src/solvers/critical.rs

//! 临界水深求解
//!
//! 临界水深 yc 满足 Fr = 1，即 Q²·T/(g·A³) = 1。
//!
//! # 策略
//!
//! - 矩形: 闭式解 yc = (q²/g)^(1/3)，q = Q/b
//! - 三角形: 闭式解 yc = (2Q²/(g·m²))^(1/5)
//! - 梯形/圆形: 在 [0.001, y_max] 上二分求 F(y) = Q²·T/(g·A³) − 1 的零点
//!
//! 圆形的 y_max 取直径；开敞断面取经验上界 max(5, 3·(Q²/g)^(1/3))。

use super::{bisect, RootSolve, MAX_ITERATIONS, TOLERANCE};
use crate::geometry::section_properties;
use crate::params::{ChannelParams, ChannelShape};
use rv_foundation::float::MIN_BRACKET_DEPTH;

/// 开敞断面二分区间的经验上界
pub(crate) fn open_channel_depth_bound(discharge: f64, gravity: f64) -> f64 {
    (3.0 * (discharge * discharge / gravity).cbrt()).max(5.0)
}

/// 计算临界水深
///
/// 矩形与三角形为闭式解（总是收敛）；梯形与圆形为二分迭代，
/// 不收敛时按契约返回区间中点（`converged == false`）。
pub fn critical_depth(params: &ChannelParams) -> RootSolve {
    let g = params.gravity();
    let q_total = params.discharge;

    match params.shape {
        ChannelShape::Rectangular { bottom_width } => {
            let q = q_total / bottom_width;
            RootSolve::converged((q * q / g).cbrt(), 0)
        }
        ChannelShape::Triangular { side_slope } => {
            let m2 = side_slope * side_slope;
            RootSolve::converged((2.0 * q_total * q_total / (g * m2)).powf(0.2), 0)
        }
        ChannelShape::Trapezoidal { .. } => {
            let y_max = open_channel_depth_bound(q_total, g);
            bisect_critical(params, y_max)
        }
        ChannelShape::Circular { diameter } => bisect_critical(params, diameter),
    }
}

fn bisect_critical(params: &ChannelParams, y_max: f64) -> RootSolve {
    let g = params.gravity();
    let q2 = params.discharge * params.discharge;
    // F(y) = Q²·T/(g·A³) − 1，水深增大时单调递减
    let residual = |y: f64| {
        let props = section_properties(&params.shape, y);
        if props.area <= 0.0 {
            // 干断面，F → +∞
            return 1e12;
        }
        q2 * props.top_width / (g * props.area.powi(3)) - 1.0
    };
    bisect(residual, MIN_BRACKET_DEPTH, y_max, TOLERANCE, MAX_ITERATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::froude_number;
    use crate::params::UnitSystem;

    fn params_with(shape: ChannelShape, discharge: f64) -> ChannelParams {
        ChannelParams {
            shape,
            discharge,
            manning_n: 0.013,
            bed_slope: 0.001,
            length: 1000.0,
            unit_system: UnitSystem::Metric,
            upstream_depth: None,
            downstream_depth: None,
        }
    }

    #[test]
    fn test_rectangular_closed_form() {
        let params = params_with(ChannelShape::Rectangular { bottom_width: 5.0 }, 10.0);
        let result = critical_depth(&params);
        assert!(result.converged);
        // q = 2, yc = (4/9.81)^(1/3) ≈ 0.7415
        let expected = (4.0_f64 / 9.81).cbrt();
        assert!((result.value - expected).abs() < 1e-10);
    }

    #[test]
    fn test_triangular_closed_form() {
        let params = params_with(ChannelShape::Triangular { side_slope: 2.0 }, 10.0);
        let result = critical_depth(&params);
        assert!(result.converged);
        let expected = (2.0_f64 * 100.0 / (9.81 * 4.0)).powf(0.2);
        assert!((result.value - expected).abs() < 1e-10);
    }

    #[test]
    fn test_froude_unity_at_critical_depth_all_shapes() {
        // 临界水深处 Fr 应接近 1（与水流参数模块往返一致）
        let shapes = [
            ChannelShape::Rectangular { bottom_width: 5.0 },
            ChannelShape::Trapezoidal {
                bottom_width: 3.0,
                side_slope: 2.0,
            },
            ChannelShape::Triangular { side_slope: 1.5 },
            ChannelShape::Circular { diameter: 2.0 },
        ];
        for shape in shapes {
            let params = params_with(shape, 4.0);
            let yc = critical_depth(&params).value;
            let props = section_properties(&params.shape, yc);
            let fr = froude_number(params.discharge, &props, params.gravity());
            assert!(
                (fr - 1.0).abs() < 0.05,
                "{}: Fr(yc={:.4}) = {:.4}",
                params.shape.name(),
                yc,
                fr
            );
        }
    }

    #[test]
    fn test_circular_critical_below_diameter() {
        let params = params_with(ChannelShape::Circular { diameter: 2.0 }, 3.0);
        let result = critical_depth(&params);
        assert!(result.value > 0.0);
        assert!(result.value < 2.0);
    }

    #[test]
    fn test_imperial_units() {
        let mut params = params_with(ChannelShape::Rectangular { bottom_width: 16.4 }, 353.0);
        params.unit_system = UnitSystem::Imperial;
        let result = critical_depth(&params);
        let q = 353.0 / 16.4;
        let expected = (q * q / 32.2_f64).cbrt();
        assert!((result.value - expected).abs() < 1e-10);
    }

    #[test]
    fn test_depth_bound_scales_with_discharge() {
        assert!(open_channel_depth_bound(1000.0, 9.81) > open_channel_depth_bound(10.0, 9.81));
        assert!(open_channel_depth_bound(0.001, 9.81) >= 5.0);
    }
}
