// crates/rv_hydraulics/src/profile/classify.rs

//! 水面线类型分类
//!
//! 按水深相对正常水深/临界水深的分区，结合坡度分类，
//! 给出 M1..M3 / S1..S3 / C1..C3。
//!
//! 分区边界带相对容差：控制端恰好落在 yc 或渐近贴近 yn 的点
//! 归入中间分区，避免浮点噪声把整条水面线误判为 Mixed。
//!
//! 所有点同区 ⇒ 该类型；跨区（如含水跃）⇒ Mixed；空序列 ⇒ Unknown。

use crate::slope::SlopeClass;
use crate::types::{FlowDepthPoint, ProfileType};

/// 分区边界的相对容差带
const ZONE_BAND: f64 = 1e-3;
/// 临界坡 C2 分区的相对容差带
const C2_BAND: f64 = 1e-3;

/// 单点分区
pub fn classify_point(
    depth: f64,
    normal_depth: f64,
    critical_depth: f64,
    slope_class: SlopeClass,
) -> ProfileType {
    match slope_class {
        SlopeClass::Mild => {
            // 缓坡：yn > yc
            if depth > normal_depth * (1.0 + ZONE_BAND) {
                ProfileType::M1
            } else if depth >= critical_depth * (1.0 - ZONE_BAND) {
                ProfileType::M2
            } else {
                ProfileType::M3
            }
        }
        SlopeClass::Steep => {
            // 陡坡：yc > yn
            if depth > critical_depth * (1.0 + ZONE_BAND) {
                ProfileType::S1
            } else if depth >= normal_depth * (1.0 - ZONE_BAND) {
                ProfileType::S2
            } else {
                ProfileType::S3
            }
        }
        SlopeClass::Critical => {
            let band = critical_depth * C2_BAND;
            if depth > critical_depth + band {
                ProfileType::C1
            } else if depth < critical_depth - band {
                ProfileType::C3
            } else {
                ProfileType::C2
            }
        }
    }
}

/// 整条水面线分类
pub fn classify_profile(
    points: &[FlowDepthPoint],
    normal_depth: f64,
    critical_depth: f64,
    slope_class: SlopeClass,
) -> ProfileType {
    let mut iter = points.iter();
    let first = match iter.next() {
        Some(p) => classify_point(p.depth, normal_depth, critical_depth, slope_class),
        None => return ProfileType::Unknown,
    };
    for p in iter {
        if classify_point(p.depth, normal_depth, critical_depth, slope_class) != first {
            return ProfileType::Mixed;
        }
    }
    first
}
