// crates/rv_hydraulics/src/types.rs

//! 计算结果数据类型
//!
//! 引擎输出的值类型：逐站水面线点、水跃、整体水面线结果。
//! 全部为调用方独占的值拷贝，产出后不可变；缓存返回的同样是
//! 独立拷贝，绝不与调用方结构共享。

use crate::slope::SlopeClass;
use serde::{Deserialize, Serialize};

/// 单站水面线点
///
/// 同一形状/流量组合下一致计算的全部量，产出后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowDepthPoint {
    /// 站号（沿渠道中心线距离）[m]
    pub station: f64,
    /// 水深 [m]
    pub depth: f64,
    /// 流速 [m/s]
    pub velocity: f64,
    /// 弗劳德数
    pub froude: f64,
    /// 比能 [m]
    pub specific_energy: f64,
    /// 临界水深 [m]
    pub critical_depth: f64,
    /// 正常水深 [m]
    pub normal_depth: f64,
}

/// 水跃强度分类
///
/// 仅由跃前弗劳德数按固定阈值 1.7 / 2.5 / 4.5 / 9.0 确定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JumpClass {
    /// 波状水跃 Fr < 1.7
    Undular,
    /// 弱水跃 1.7 ≤ Fr < 2.5
    Weak,
    /// 摆动水跃 2.5 ≤ Fr < 4.5
    Oscillating,
    /// 稳定水跃 4.5 ≤ Fr < 9.0
    Steady,
    /// 强水跃 Fr ≥ 9.0
    Strong,
}

impl JumpClass {
    /// 由跃前弗劳德数分类
    pub fn from_froude(froude: f64) -> Self {
        if froude < 1.7 {
            Self::Undular
        } else if froude < 2.5 {
            Self::Weak
        } else if froude < 4.5 {
            Self::Oscillating
        } else if froude < 9.0 {
            Self::Steady
        } else {
            Self::Strong
        }
    }
}

/// 水跃
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "occurs", rename_all = "lowercase")]
pub enum HydraulicJump {
    /// 不发生水跃
    None,
    /// 发生水跃
    Occurs {
        /// 跃址站号 [m]
        station: f64,
        /// 跃前（急流）水深 [m]
        upstream_depth: f64,
        /// 跃后（缓流、共轭）水深 [m]
        downstream_depth: f64,
        /// 能量损失 [m]
        energy_loss: f64,
        /// 跃前弗劳德数
        upstream_froude: f64,
        /// 近似跃长 [m]
        length: f64,
        /// 强度分类
        class: JumpClass,
    },
}

impl HydraulicJump {
    /// 是否发生
    pub fn occurs(&self) -> bool {
        matches!(self, Self::Occurs { .. })
    }
}

/// 水面线类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileType {
    /// 缓坡壅水线
    M1,
    /// 缓坡降水线
    M2,
    /// 缓坡急流线
    M3,
    /// 陡坡壅水线
    S1,
    /// 陡坡降水线
    S2,
    /// 陡坡急流线
    S3,
    /// 临界坡（y > yc）
    C1,
    /// 临界坡（y ≈ yc）
    C2,
    /// 临界坡（y < yc）
    C3,
    /// 混合（跨区，常见于含水跃的水面线）
    Mixed,
    /// 无法判别
    Unknown,
}

/// 整体水面线计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResult {
    /// 按站号升序排列的水面线点
    pub points: Vec<FlowDepthPoint>,
    /// 水面线类型
    pub profile_type: ProfileType,
    /// 坡度分类
    pub slope_class: SlopeClass,
    /// 临界水深 [m]
    pub critical_depth: f64,
    /// 正常水深 [m]
    pub normal_depth: f64,
    /// 壅塞标志：true 表示给定边界条件无法满足，水面线不完整
    pub choking: bool,
    /// 水跃（检测开启且发生时为 Occurs）
    pub jump: Option<HydraulicJump>,
    /// 临界水深求解是否收敛（false 为最优估计）
    pub critical_converged: bool,
    /// 正常水深求解是否收敛（false 为最优估计）
    pub normal_converged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_class_thresholds() {
        assert_eq!(JumpClass::from_froude(1.2), JumpClass::Undular);
        assert_eq!(JumpClass::from_froude(1.7), JumpClass::Weak);
        assert_eq!(JumpClass::from_froude(2.5), JumpClass::Oscillating);
        assert_eq!(JumpClass::from_froude(4.5), JumpClass::Steady);
        assert_eq!(JumpClass::from_froude(9.0), JumpClass::Strong);
        assert_eq!(JumpClass::from_froude(15.0), JumpClass::Strong);
    }

    #[test]
    fn test_jump_occurs() {
        assert!(!HydraulicJump::None.occurs());
        let jump = HydraulicJump::Occurs {
            station: 100.0,
            upstream_depth: 0.3,
            downstream_depth: 0.9,
            energy_loss: 0.2,
            upstream_froude: 2.1,
            length: 5.0,
            class: JumpClass::Weak,
        };
        assert!(jump.occurs());
    }

    #[test]
    fn test_jump_serde_tagged() {
        let json = serde_json::to_string(&HydraulicJump::None).unwrap();
        assert!(json.contains("\"occurs\":\"none\""));
    }
}
