// crates/rv_foundation/src/validation.rs

//! 运行时参数验证工具
//!
//! 提供验证报告和错误/警告类型，用于渠道参数验证。
//! 错误阻止计算；警告仅提示（如糙率取值异常偏大）。
//!
//! # 示例
//!
//! ```
//! use rv_foundation::validation::{ValidationReport, ValidationError};
//!
//! let discharge = -1.0f64;
//! let mut report = ValidationReport::new();
//! if discharge <= 0.0 {
//!     report.add_error(ValidationError::NonPositive {
//!         field: "discharge",
//!         value: discharge,
//!     });
//! }
//! assert!(!report.is_valid());
//! ```

use serde::Serialize;
use std::fmt;

/// 验证报告
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationError>,
    /// 警告列表
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// 创建空的验证报告
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加错误
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 错误数量
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// 警告数量
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 是否通过（无错误）
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// 合并另一个报告
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// 首条错误的描述（无错误时为 None）
    pub fn first_message(&self) -> Option<String> {
        self.errors.first().map(|e| e.to_string())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "验证报告:")?;
        writeln!(f, "  错误: {} 个", self.error_count())?;
        writeln!(f, "  警告: {} 个", self.warning_count())?;

        if self.has_errors() {
            writeln!(f, "\n错误详情:")?;
            for (i, err) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, err)?;
            }
        }

        if self.has_warnings() {
            writeln!(f, "\n警告详情:")?;
            for (i, warn) in self.warnings.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, warn)?;
            }
        }

        Ok(())
    }
}

/// 验证错误类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// 字段非正
    NonPositive {
        /// 字段名称
        field: &'static str,
        /// 实际值
        value: f64,
    },
    /// 非有限值
    NonFinite {
        /// 字段名称
        field: &'static str,
        /// 非有限的数值
        value: f64,
    },
    /// 缺少必需字段
    MissingField {
        /// 字段名称
        field: &'static str,
    },
    /// 数据超出范围
    OutOfRange {
        /// 字段名称
        field: &'static str,
        /// 实际值
        value: f64,
        /// 下界
        min: f64,
        /// 上界
        max: f64,
    },
    /// 自定义错误
    Custom {
        /// 自定义消息
        message: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "字段{}={} (必须为正)", field, value)
            }
            Self::NonFinite { field, value } => {
                write!(f, "字段{}={} (非有限值)", field, value)
            }
            Self::MissingField { field } => {
                write!(f, "缺少必需字段: {}", field)
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "字段{}={} 超出范围[{}, {}]", field, value, min, max)
            }
            Self::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 验证警告类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// 高数值
    HighValue {
        /// 字段名称
        field: &'static str,
        /// 实际值
        value: f64,
        /// 阈值
        threshold: f64,
    },
    /// 低数值
    LowValue {
        /// 字段名称
        field: &'static str,
        /// 实际值
        value: f64,
        /// 阈值
        threshold: f64,
    },
    /// 自定义警告
    Custom {
        /// 自定义消息
        message: String,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighValue {
                field,
                value,
                threshold,
            } => {
                write!(f, "字段{}={} 超过阈值{}", field, value, threshold)
            }
            Self::LowValue {
                field,
                value,
                threshold,
            } => {
                write!(f, "字段{}={} 低于阈值{}", field, value, threshold)
            }
            Self::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

// ============================================================================
// 验证辅助函数
// ============================================================================

/// 检查字段严格为正，否则记录错误
pub fn check_positive(report: &mut ValidationReport, field: &'static str, value: f64) -> bool {
    if !value.is_finite() {
        report.add_error(ValidationError::NonFinite { field, value });
        false
    } else if value <= 0.0 {
        report.add_error(ValidationError::NonPositive { field, value });
        false
    } else {
        true
    }
}

/// 检查值是否超过阈值并添加警告
pub fn warn_if_high(
    report: &mut ValidationReport,
    field: &'static str,
    value: f64,
    threshold: f64,
) -> bool {
    if value > threshold {
        report.add_warning(ValidationWarning::HighValue {
            field,
            value,
            threshold,
        });
        true
    } else {
        false
    }
}

/// 检查值是否低于阈值并添加警告
pub fn warn_if_low(
    report: &mut ValidationReport,
    field: &'static str,
    value: f64,
    threshold: f64,
) -> bool {
    if value < threshold {
        report.add_warning(ValidationWarning::LowValue {
            field,
            value,
            threshold,
        });
        true
    } else {
        false
    }
}

// ============================================================================
// 测试
// ============================================================================
