// crates/rv_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `RvError` 枚举和 `RvResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层定义核心错误，水力学求解细节通过结果标志暴露
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **分类清晰**: 参数错误、形状不支持、IO/解析错误互不混淆
//!
//! 求解器不收敛**不是**错误：按约定返回区间中点并携带收敛标志，
//! 参见 `rv_hydraulics::solvers::RootSolve`。

use std::path::PathBuf;
use thiserror::Error;

/// 统一结果类型
pub type RvResult<T> = Result<T, RvError>;

/// RivusHydro 错误类型
#[derive(Error, Debug)]
pub enum RvError {
    /// 无效参数（缺失或非正的必需字段）
    ///
    /// 在任何求解器执行之前同步返回，绝不在推进过程中抛出。
    #[error("无效参数: {field}: {message}")]
    InvalidParameter {
        /// 字段名
        field: &'static str,
        /// 说明无效原因
        message: String,
    },

    /// 形状不支持该操作（编程错误，应当尽早暴露）
    #[error("形状 {shape} 不支持操作 {operation}")]
    UnsupportedShape {
        /// 断面形状名
        shape: &'static str,
        /// 操作名
        operation: &'static str,
    },

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        /// 可选的底层 IO 错误
        #[source]
        source: Option<std::io::Error>,
    },

    /// 文件不存在
    #[error("文件不存在: {path}")]
    FileNotFound {
        /// 未找到的路径
        path: PathBuf,
    },

    /// 文件解析错误
    #[error("解析错误: {message}")]
    Parse {
        /// 错误信息
        message: String,
    },

    /// 验证失败（汇总多条参数错误）
    #[error("验证失败: {0}")]
    Validation(String),
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl RvError {
    /// 无效参数
    pub fn invalid_parameter(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            message: message.into(),
        }
    }

    /// 形状不支持该操作
    pub fn unsupported_shape(shape: &'static str, operation: &'static str) -> Self {
        Self::UnsupportedShape { shape, operation }
    }

    /// 文件不存在
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// 解析错误
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// 验证失败
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for RvError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 测试
// ========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = RvError::invalid_parameter("discharge", "必须为正");
        let s = err.to_string();
        assert!(s.contains("discharge"));
        assert!(s.contains("必须为正"));
    }

    #[test]
    fn test_unsupported_shape_display() {
        let err = RvError::unsupported_shape("circular", "normal_depth");
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn test_file_not_found_carries_path() {
        let err = RvError::file_not_found("/tmp/missing.json");
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let rv_err: RvError = io_err.into();
        assert!(matches!(rv_err, RvError::Io { .. }));
    }
}
