// crates/rv_foundation/src/float.rs

//! 数值安全工具和常量
//!
//! 提供防止 NaN/Inf 扩散的安全运算，以及求解器相关的数值常量。
//!
//! # 设计目标
//!
//! 1. **数值安全**: 除零返回 0 而不是 NaN/Inf
//! 2. **统一容差**: 求解器迭代预算与收敛容差集中定义
//!
//! # 示例
//!
//! ```
//! use rv_foundation::float::{safe_div, safe_sqrt};
//!
//! assert_eq!(safe_div(1.0, 0.0), 0.0);
//! assert_eq!(safe_sqrt(-4.0), 0.0);
//! ```

// ============================================================================
// 数值常量
// ============================================================================

/// 安全除法的最小分母阈值
pub const SAFE_DIV_EPSILON: f64 = 1e-14;

/// 浮点数相等性比较的默认容差
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// 迭代求解器的默认收敛容差
pub const SOLVER_TOLERANCE: f64 = 1e-4;

/// 迭代求解器的默认最大迭代次数
pub const SOLVER_MAX_ITERATIONS: usize = 50;

/// 求根区间的最小水深下界 [m]
pub const MIN_BRACKET_DEPTH: f64 = 0.001;

// ============================================================================
// 安全运算
// ============================================================================

/// 安全除法：分母接近零时返回 0，不产生 NaN/Inf
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < SAFE_DIV_EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

/// 安全开方：负数返回 0
#[inline]
pub fn safe_sqrt(value: f64) -> f64 {
    if value <= 0.0 {
        0.0
    } else {
        value.sqrt()
    }
}

/// 容差相等性比较
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// 相对容差相等性比较（以 `b` 为基准，`b` 接近零时退化为绝对比较）
#[inline]
pub fn approx_eq_rel(a: f64, b: f64, rel: f64) -> bool {
    let scale = b.abs().max(1e-12);
    (a - b).abs() / scale <= rel
}

// ============================================================================
// 测试
// ============================================================================
