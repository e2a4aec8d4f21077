// crates/rv_hydraulics/src/engine.rs

//! 引擎门面
//!
//! 对外的统一入口：水面线计算、临界/正常水深、参数验证与缓存管理。
//! 引擎本身同步、单线程、除缓存外无状态；UI 响应性由调用方
//! 在隔离的执行上下文中运行引擎并以消息传递通信解决——
//! 引擎不提供内建的取消原语，取消即调用方丢弃计算结果。

use crate::cache::{profile_key, CacheConfig, CacheStats, ResultCache};
use crate::params::ChannelParams;
use crate::profile::{
    compute_profile as run_profile, compute_profile_bidirectional, ProfileOptions, ProgressFn,
    DEFAULT_NUM_STEPS,
};
use crate::solvers::{critical_depth, normal_depth, NormalStrategy};
use crate::types::ProfileResult;
use rv_foundation::validation::ValidationReport;
use rv_foundation::RvResult;
use tracing::debug;

/// 水面线计算选项（引擎层）
pub struct ComputeOptions {
    /// 站步数（分辨率）
    pub resolution: usize,
    /// 双向推进
    pub bidirectional: bool,
    /// 水跃检测开关
    pub detect_jumps: bool,
    /// 是否使用缓存
    pub use_cache: bool,
    /// 推进进度回调（0–100）
    pub progress: Option<ProgressFn>,
}

impl Default for ComputeOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_NUM_STEPS,
            bidirectional: false,
            detect_jumps: true,
            use_cache: true,
            progress: None,
        }
    }
}

impl std::fmt::Debug for ComputeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeOptions")
            .field("resolution", &self.resolution)
            .field("bidirectional", &self.bidirectional)
            .field("detect_jumps", &self.detect_jumps)
            .field("use_cache", &self.use_cache)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// 水力计算引擎
///
/// 持有一个可注入的结果缓存；其余全部无状态。
#[derive(Default)]
pub struct Engine {
    cache: ResultCache,
}

impl Engine {
    /// 以默认缓存配置创建引擎
    pub fn new() -> Self {
        Self::default()
    }

    /// 以指定缓存配置创建引擎
    pub fn with_cache_config(config: CacheConfig) -> Self {
        Self {
            cache: ResultCache::new(config),
        }
    }

    /// 计算水面线（主入口）
    ///
    /// 显式边界水深被视为低复用场景，不进入水面线缓存。
    pub fn compute_profile(
        &self,
        params: &ChannelParams,
        options: ComputeOptions,
    ) -> RvResult<ProfileResult> {
        params.check()?;

        let cacheable = options.use_cache && !params.has_explicit_boundary();
        let key = profile_key(
            params,
            options.resolution,
            options.bidirectional,
            options.detect_jumps,
        );
        if cacheable {
            if let Some(hit) = self.cache.get_profile(&key) {
                debug!(%key, "水面线缓存命中");
                return Ok(hit);
            }
        }

        let profile_options = ProfileOptions {
            num_steps: options.resolution,
            detect_jumps: options.detect_jumps,
            progress: options.progress,
        };
        let result = if options.bidirectional {
            compute_profile_bidirectional(params, &profile_options)?
        } else {
            run_profile(params, &profile_options)?
        };

        if cacheable {
            self.cache.put_profile(key, &result);
        }
        Ok(result)
    }

    /// 计算临界水深（缓存支持）
    pub fn compute_critical_depth(&self, params: &ChannelParams) -> RvResult<f64> {
        params.check()?;
        if let Some(hit) = self.cache.get_critical(params) {
            return Ok(hit);
        }
        let value = critical_depth(params).value;
        self.cache.put_critical(params, value);
        Ok(value)
    }

    /// 计算正常水深（缓存支持）
    pub fn compute_normal_depth(&self, params: &ChannelParams) -> RvResult<f64> {
        params.check()?;
        if let Some(hit) = self.cache.get_normal(params) {
            return Ok(hit);
        }
        let value = normal_depth(params, NormalStrategy::Bisection).value;
        self.cache.put_normal(params, value);
        Ok(value)
    }

    /// 参数验证（与 `compute_profile` 相同的错误分类，同步返回）
    pub fn validate(&self, params: &ChannelParams) -> ValidationReport {
        params.validate()
    }

    /// 清空缓存
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// 更新缓存配置
    pub fn configure_cache(&self, config: CacheConfig) {
        self.cache.configure(config);
    }

    /// 缓存统计
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ChannelShape, UnitSystem};
    use rv_foundation::RvError;

    fn rect_params() -> ChannelParams {
        ChannelParams {
            shape: ChannelShape::Rectangular { bottom_width: 5.0 },
            discharge: 10.0,
            manning_n: 0.013,
            bed_slope: 0.001,
            length: 1000.0,
            unit_system: UnitSystem::Metric,
            upstream_depth: None,
            downstream_depth: None,
        }
    }

    #[test]
    fn test_invalid_params_rejected_before_solvers() {
        let engine = Engine::new();
        let mut params = rect_params();
        params.discharge = -5.0;
        let err = engine.compute_profile(&params, ComputeOptions::default());
        assert!(matches!(err, Err(RvError::InvalidParameter { .. })));
        // 验证失败的参数没有进入任何缓存
        assert_eq!(engine.cache_stats().profile_entries, 0);
    }

    #[test]
    fn test_critical_depth_cached() {
        let engine = Engine::new();
        let params = rect_params();
        let first = engine.compute_critical_depth(&params).unwrap();
        assert_eq!(engine.cache_stats().critical_entries, 1);
        let second = engine.compute_critical_depth(&params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_profile_cache_identical_results() {
        let engine = Engine::new();
        let params = rect_params();
        let first = engine
            .compute_profile(&params, ComputeOptions::default())
            .unwrap();
        let second = engine
            .compute_profile(&params, ComputeOptions::default())
            .unwrap();
        // 缓存命中：结果逐位一致
        assert_eq!(first, second);
        assert_eq!(engine.cache_stats().profile_entries, 1);
    }

    #[test]
    fn test_explicit_boundary_bypasses_cache() {
        let engine = Engine::new();
        let mut params = rect_params();
        params.downstream_depth = Some(2.0);
        engine
            .compute_profile(&params, ComputeOptions::default())
            .unwrap();
        assert_eq!(engine.cache_stats().profile_entries, 0);
    }

    #[test]
    fn test_clear_cache() {
        let engine = Engine::new();
        let params = rect_params();
        engine.compute_critical_depth(&params).unwrap();
        engine.clear_cache();
        assert_eq!(engine.cache_stats().critical_entries, 0);
    }

    #[test]
    fn test_validate_surface() {
        let engine = Engine::new();
        let mut params = rect_params();
        params.manning_n = 0.0;
        let report = engine.validate(&params);
        assert!(!report.is_valid());
    }
}
