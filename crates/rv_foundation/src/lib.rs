// crates/rv_foundation/src/lib.rs

//! RivusHydro Foundation Layer
//!
//! 基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`float`]: 数值安全工具和常量
//! - [`validation`]: 运行时参数验证工具
//!
//! # 设计原则
//!
//! 1. **最少依赖**: 仅依赖 serde 和 thiserror
//! 2. **数值安全**: 除零、开负数根等均有保护，不产生 NaN/Inf
//! 3. **错误可追溯**: 错误携带字段名与上下文

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;
pub mod validation;

// 重导出常用类型
pub use error::{RvError, RvResult};
pub use float::{safe_div, safe_sqrt};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};

/// 条件不满足时提前返回错误
///
/// # 示例
///
/// ```
/// use rv_foundation::{ensure, RvError, RvResult};
///
/// fn check(q: f64) -> RvResult<()> {
///     ensure!(q > 0.0, RvError::invalid_parameter("discharge", "流量必须为正"));
///     Ok(())
/// }
/// assert!(check(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{RvError, RvResult};
    pub use crate::float::{approx_eq, safe_div, safe_sqrt};
    pub use crate::validation::{ValidationError, ValidationReport, ValidationWarning};
}
