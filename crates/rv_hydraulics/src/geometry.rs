// crates/rv_hydraulics/src/geometry.rs

//! 断面几何计算
//!
//! 给定水深 y，计算过水断面的面积、湿周、水面宽、水力半径与水力深度。
//! 纯函数，无状态。
//!
//! # 公式
//!
//! 矩形:   A = b·y,          P = b + 2y,           T = b
//! 梯形:   A = (b + m·y)·y,  P = b + 2y·√(1+m²),   T = b + 2m·y
//! 三角形: A = m·y²,         P = 2y·√(1+m²),       T = 2m·y
//! 圆形:   θ = 2·acos(1 − 2y/D)
//!         A = D²/8·(θ − sinθ), P = θ·D/2, T = D·sin(θ/2)
//!
//! # 边界约定
//!
//! - y ≤ 0: 面积/湿周/水面宽全部为 0（不是错误）
//! - 圆形 y ≥ D: 饱和为满管值，水面宽为 0
//! - 湿周或水面宽为 0 时的除法受保护，返回 0 而非 NaN/Inf

use crate::params::ChannelShape;
use rv_foundation::float::safe_div;
use std::f64::consts::PI;

/// 断面水力要素
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionProps {
    /// 过水面积 A [m²]
    pub area: f64,
    /// 湿周 P [m]
    pub wetted_perimeter: f64,
    /// 水面宽 T [m]
    pub top_width: f64,
    /// 水力半径 R = A/P [m]
    pub hydraulic_radius: f64,
    /// 水力深度 D = A/T [m]
    pub hydraulic_depth: f64,
}

impl SectionProps {
    /// 全零要素（干断面）
    pub const ZERO: Self = Self {
        area: 0.0,
        wetted_perimeter: 0.0,
        top_width: 0.0,
        hydraulic_radius: 0.0,
        hydraulic_depth: 0.0,
    };
}

/// 计算给定水深下的断面水力要素
pub fn section_properties(shape: &ChannelShape, depth: f64) -> SectionProps {
    if depth <= 0.0 {
        return SectionProps::ZERO;
    }

    let (area, wetted_perimeter, top_width) = match *shape {
        ChannelShape::Rectangular { bottom_width } => {
            let a = bottom_width * depth;
            let p = bottom_width + 2.0 * depth;
            (a, p, bottom_width)
        }
        ChannelShape::Trapezoidal {
            bottom_width,
            side_slope,
        } => {
            let a = (bottom_width + side_slope * depth) * depth;
            let p = bottom_width + 2.0 * depth * (1.0 + side_slope * side_slope).sqrt();
            let t = bottom_width + 2.0 * side_slope * depth;
            (a, p, t)
        }
        ChannelShape::Triangular { side_slope } => {
            let a = side_slope * depth * depth;
            let p = 2.0 * depth * (1.0 + side_slope * side_slope).sqrt();
            let t = 2.0 * side_slope * depth;
            (a, p, t)
        }
        ChannelShape::Circular { diameter } => {
            if depth >= diameter {
                // 满管：水面宽为 0
                let r = diameter / 2.0;
                (PI * r * r, PI * diameter, 0.0)
            } else {
                let theta = 2.0 * (1.0 - 2.0 * depth / diameter).acos();
                let a = diameter * diameter / 8.0 * (theta - theta.sin());
                let p = theta * diameter / 2.0;
                let t = diameter * (theta / 2.0).sin();
                (a, p, t)
            }
        }
    };

    SectionProps {
        area,
        wetted_perimeter,
        top_width,
        hydraulic_radius: safe_div(area, wetted_perimeter),
        hydraulic_depth: safe_div(area, top_width),
    }
}

/// 形状的最大可能水深：圆形为直径，开敞断面无上界
pub fn max_depth(shape: &ChannelShape) -> f64 {
    match *shape {
        ChannelShape::Circular { diameter } => diameter,
        _ => f64::INFINITY,
    }
}
