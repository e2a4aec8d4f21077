// crates/rv_hydraulics/src/slope.rs

//! 渠道坡度分类
//!
//! 比较正常水深与临界水深：
//!
//! - yn > yc: 缓坡（mild）
//! - yn < yc: 陡坡（steep）
//! - |yn − yc|/yc ≤ 1e-6: 临界坡（critical）
//!
//! 相等判断采用相对容差带（1e-6），使临界坡分支可达；
//! 流态判别的 0.95/1.05 死区另行定义，互不影响。

use rv_foundation::float::approx_eq_rel;
use serde::{Deserialize, Serialize};

/// 坡度相等判断的相对容差带
pub const SLOPE_EQUALITY_BAND: f64 = 1e-6;

/// 坡度分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeClass {
    /// 缓坡：yn > yc
    Mild,
    /// 临界坡：yn ≈ yc
    Critical,
    /// 陡坡：yn < yc
    Steep,
}

/// 由正常水深与临界水深分类坡度
pub fn classify_slope(normal_depth: f64, critical_depth: f64) -> SlopeClass {
    if approx_eq_rel(normal_depth, critical_depth, SLOPE_EQUALITY_BAND) {
        SlopeClass::Critical
    } else if normal_depth > critical_depth {
        SlopeClass::Mild
    } else {
        SlopeClass::Steep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mild() {
        assert_eq!(classify_slope(2.0, 1.0), SlopeClass::Mild);
    }

    #[test]
    fn test_steep() {
        assert_eq!(classify_slope(0.5, 1.0), SlopeClass::Steep);
    }

    #[test]
    fn test_critical_band() {
        assert_eq!(classify_slope(1.0, 1.0), SlopeClass::Critical);
        // 容差带内视为临界坡
        assert_eq!(classify_slope(1.0 + 1e-8, 1.0), SlopeClass::Critical);
        // 容差带外按大小判别
        assert_eq!(classify_slope(1.0 + 1e-3, 1.0), SlopeClass::Mild);
    }
}
