// crates/rv_hydraulics/src/lib.rs

//! RivusHydro 水力计算引擎
//!
//! 明渠恒定渐变流水面线计算：标准步法逐站推进，支持矩形、
//! 梯形、三角形与圆形断面，计算临界/正常水深、坡度分类与水跃。
//!
//! # 模块概览
//!
//! - [`params`]: 渠道参数（断面形状为带标签的和类型）
//! - [`geometry`]: 断面几何要素
//! - [`flow`]: 水流参数（流速、弗劳德数、比能、摩阻坡度）
//! - [`solvers`]: 临界/正常水深与单站能量平衡求根器
//! - [`slope`]: 坡度分类
//! - [`jump`]: 水跃检测与共轭水深
//! - [`profile`]: 水面线积分（状态机编排）
//! - [`cache`]: 结果缓存（TTL + 容量逐出）
//! - [`engine`]: 对外门面
//!
//! # 示例
//!
//! ```
//! use rv_hydraulics::engine::{ComputeOptions, Engine};
//! use rv_hydraulics::params::{ChannelParams, ChannelShape, UnitSystem};
//!
//! let params = ChannelParams {
//!     shape: ChannelShape::Rectangular { bottom_width: 5.0 },
//!     discharge: 10.0,
//!     manning_n: 0.013,
//!     bed_slope: 0.001,
//!     length: 1000.0,
//!     unit_system: UnitSystem::Metric,
//!     upstream_depth: None,
//!     downstream_depth: None,
//! };
//!
//! let engine = Engine::new();
//! let profile = engine.compute_profile(&params, ComputeOptions::default()).unwrap();
//! assert!(!profile.points.is_empty());
//! assert!(!profile.choking);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod engine;
pub mod flow;
pub mod geometry;
pub mod jump;
pub mod params;
pub mod profile;
pub mod slope;
pub mod solvers;
pub mod types;

pub use engine::{ComputeOptions, Engine};
pub use params::{ChannelParams, ChannelShape, UnitSystem};
pub use slope::SlopeClass;
pub use types::{FlowDepthPoint, HydraulicJump, JumpClass, ProfileResult, ProfileType};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::cache::{CacheConfig, CacheStats, ResultCache};
    pub use crate::engine::{ComputeOptions, Engine};
    pub use crate::flow::FlowRegime;
    pub use crate::params::{ChannelParams, ChannelShape, UnitSystem};
    pub use crate::profile::{ProfileOptions, ProgressFn};
    pub use crate::slope::SlopeClass;
    pub use crate::types::{
        FlowDepthPoint, HydraulicJump, JumpClass, ProfileResult, ProfileType,
    };
}
