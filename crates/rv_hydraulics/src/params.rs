// crates/rv_hydraulics/src/params.rs

//! 渠道参数定义与验证
//!
//! 断面形状采用带标签的和类型（tagged union）：每种形状**恰好**携带
//! 它需要的几何字段，"必需字段缺失"在类型层面不可表达，
//! 无需运行时的字段存在性检查。
//!
//! # 单位制
//!
//! 重力加速度与 Manning 系数 k 由 [`UnitSystem`] 一次性选定，
//! 同一次计算内绝不混用：
//!
//! | 量 | 公制 | 英制 |
//! |----|------|------|
//! | g  | 9.81 m/s² | 32.2 ft/s² |
//! | k  | 1.0  | 1.49 |
//! | γ  | 9810 N/m³ | 62.4 lb/ft³ |

use rv_foundation::validation::{
    check_positive, warn_if_high, warn_if_low, ValidationError, ValidationReport,
};
use rv_foundation::{ensure, RvError, RvResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 单位制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// 公制 (m, m³/s)
    #[default]
    Metric,
    /// 英制 (ft, ft³/s)
    Imperial,
}

impl UnitSystem {
    /// 重力加速度
    #[inline]
    pub fn gravity(self) -> f64 {
        match self {
            Self::Metric => 9.81,
            Self::Imperial => 32.2,
        }
    }

    /// Manning 公式单位系数 k
    #[inline]
    pub fn manning_k(self) -> f64 {
        match self {
            Self::Metric => 1.0,
            Self::Imperial => 1.49,
        }
    }

    /// 水的容重 γ [N/m³ 或 lb/ft³]
    #[inline]
    pub fn unit_weight(self) -> f64 {
        match self {
            Self::Metric => 9810.0,
            Self::Imperial => 62.4,
        }
    }
}

/// 断面形状（带标签的和类型）
///
/// 每个变体仅携带该形状所需的几何字段。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelShape {
    /// 矩形断面
    Rectangular {
        /// 底宽 [m]
        bottom_width: f64,
    },
    /// 梯形断面
    Trapezoidal {
        /// 底宽 [m]
        bottom_width: f64,
        /// 边坡系数 m（水平:垂直）
        side_slope: f64,
    },
    /// 三角形断面
    Triangular {
        /// 边坡系数 m（水平:垂直）
        side_slope: f64,
    },
    /// 圆形断面（管道）
    Circular {
        /// 直径 [m]
        diameter: f64,
    },
}

impl ChannelShape {
    /// 形状名称（用于错误信息与缓存键）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangular { .. } => "rectangular",
            Self::Trapezoidal { .. } => "trapezoidal",
            Self::Triangular { .. } => "triangular",
            Self::Circular { .. } => "circular",
        }
    }

    /// 验证几何字段为正
    pub fn validate(&self, report: &mut ValidationReport) {
        match *self {
            Self::Rectangular { bottom_width } => {
                check_positive(report, "bottom_width", bottom_width);
            }
            Self::Trapezoidal {
                bottom_width,
                side_slope,
            } => {
                check_positive(report, "bottom_width", bottom_width);
                check_positive(report, "side_slope", side_slope);
            }
            Self::Triangular { side_slope } => {
                check_positive(report, "side_slope", side_slope);
            }
            Self::Circular { diameter } => {
                check_positive(report, "diameter", diameter);
            }
        }
    }
}

/// 渠道参数
///
/// 每次调用按值提供，引擎从不修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// 断面形状
    pub shape: ChannelShape,
    /// 流量 Q [m³/s]
    pub discharge: f64,
    /// Manning 糙率系数 n
    pub manning_n: f64,
    /// 纵向底坡 S₀
    pub bed_slope: f64,
    /// 渠道长度 [m]
    pub length: f64,
    /// 单位制
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// 上游边界水深（可选，显式指定时优先于控制水深）
    #[serde(default)]
    pub upstream_depth: Option<f64>,
    /// 下游边界水深（可选，显式指定时优先于控制水深）
    #[serde(default)]
    pub downstream_depth: Option<f64>,
}

impl ChannelParams {
    /// 重力加速度（由单位制决定）
    #[inline]
    pub fn gravity(&self) -> f64 {
        self.unit_system.gravity()
    }

    /// Manning 单位系数（由单位制决定）
    #[inline]
    pub fn manning_k(&self) -> f64 {
        self.unit_system.manning_k()
    }

    /// 是否指定了显式边界水深
    #[inline]
    pub fn has_explicit_boundary(&self) -> bool {
        self.upstream_depth.is_some() || self.downstream_depth.is_some()
    }

    /// 从 JSON 场景文件加载参数
    ///
    /// 文件缺失、读取失败、解析失败分别映射到
    /// [`RvError::FileNotFound`] / [`RvError::Io`] / [`RvError::Parse`]。
    pub fn from_file(path: impl AsRef<Path>) -> RvResult<Self> {
        let path = path.as_ref();
        ensure!(path.exists(), RvError::file_not_found(path));
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RvError::parse(format!("场景文件 {} 解析失败: {}", path.display(), e)))
    }

    /// 生成验证报告（错误阻止计算，警告仅提示）
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.shape.validate(&mut report);
        check_positive(&mut report, "discharge", self.discharge);
        check_positive(&mut report, "manning_n", self.manning_n);
        check_positive(&mut report, "bed_slope", self.bed_slope);
        check_positive(&mut report, "length", self.length);

        if let Some(d) = self.upstream_depth {
            if !(d > 0.0) || !d.is_finite() {
                report.add_error(ValidationError::NonPositive {
                    field: "upstream_depth",
                    value: d,
                });
            }
        }
        if let Some(d) = self.downstream_depth {
            if !(d > 0.0) || !d.is_finite() {
                report.add_error(ValidationError::NonPositive {
                    field: "downstream_depth",
                    value: d,
                });
            }
        }

        // 圆形断面的边界水深不得超过管径
        if let ChannelShape::Circular { diameter } = self.shape {
            let bounds = [
                ("upstream_depth", self.upstream_depth),
                ("downstream_depth", self.downstream_depth),
            ];
            for (field, depth) in bounds {
                if let Some(d) = depth {
                    if d.is_finite() && d > diameter {
                        report.add_error(ValidationError::OutOfRange {
                            field,
                            value: d,
                            min: 0.0,
                            max: diameter,
                        });
                    }
                }
            }
        }

        // 经验合理性警告，不阻止计算
        warn_if_high(&mut report, "manning_n", self.manning_n, 0.2);
        warn_if_low(&mut report, "manning_n", self.manning_n, 0.008);
        warn_if_high(&mut report, "bed_slope", self.bed_slope, 0.5);

        report
    }

    /// 快速失败检查：首条验证错误转为 [`RvError::InvalidParameter`]
    pub fn check(&self) -> RvResult<()> {
        let report = self.validate();
        if report.is_valid() {
            return Ok(());
        }
        let err = match report.errors.first() {
            Some(ValidationError::NonPositive { field, value }) => {
                RvError::invalid_parameter(*field, format!("必须为正, 实际为 {}", value))
            }
            Some(ValidationError::NonFinite { field, value }) => {
                RvError::invalid_parameter(*field, format!("非有限值 {}", value))
            }
            Some(ValidationError::MissingField { field }) => {
                RvError::invalid_parameter(*field, "缺少必需字段")
            }
            Some(ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            }) => RvError::invalid_parameter(
                *field,
                format!("{} 超出范围 [{}, {}]", value, min, max),
            ),
            _ => RvError::validation(report.first_message().unwrap_or_default()),
        };
        Err(err)
    }
}
