// crates/rv_hydraulics/tests/engine_cache.rs
//!
//! 引擎门面与结果缓存测试
//!
//! 验证缓存命中返回逐位一致的结果、缓存开关不改变数值、
//! 配置更新即时生效，以及单位制贯穿引擎入口。

use rv_hydraulics::cache::CacheConfig;
use rv_hydraulics::engine::{ComputeOptions, Engine};
use rv_hydraulics::geometry::section_properties;
use rv_hydraulics::params::{ChannelParams, ChannelShape, UnitSystem};
use std::time::Duration;

fn rect_channel() -> ChannelParams {
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

// ============================================================
// Test 1: Cache Hit Is Bit Identical
// ============================================================

#[test]
fn test_cache_hit_is_bit_identical() {
    // 验收标准：同参数第二次计算命中缓存，结果逐位一致

    let engine = Engine::new();
    let params = rect_channel();

    let first = engine
        .compute_profile(&params, ComputeOptions::default())
        .unwrap();
    assert_eq!(engine.cache_stats().profile_entries, 1);

    let second = engine
        .compute_profile(&params, ComputeOptions::default())
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.cache_stats().profile_entries, 1);
}

// ============================================================
// Test 2: Cache Does Not Change Numbers
// ============================================================

#[test]
fn test_cache_does_not_change_numbers() {
    // 验收标准：绕过缓存与走缓存的计算结果一致

    let engine = Engine::new();
    let params = rect_channel();

    let cached = engine
        .compute_profile(&params, ComputeOptions::default())
        .unwrap();
    let uncached = engine
        .compute_profile(
            &params,
            ComputeOptions {
                use_cache: false,
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(cached, uncached);
}

// ============================================================
// Test 3: Characteristic Depths Cached Separately
// ============================================================

#[test]
fn test_characteristic_depths_cached_separately() {
    let engine = Engine::new();
    let params = rect_channel();

    let yc = engine.compute_critical_depth(&params).unwrap();
    let yn = engine.compute_normal_depth(&params).unwrap();
    println!("yc = {:.4} m, yn = {:.4} m", yc, yn);

    let stats = engine.cache_stats();
    assert_eq!(stats.critical_entries, 1);
    assert_eq!(stats.normal_entries, 1);

    // 改变底坡：临界水深键不变，正常水深键变化
    let mut steeper = rect_channel();
    steeper.bed_slope = 0.002;
    engine.compute_critical_depth(&steeper).unwrap();
    engine.compute_normal_depth(&steeper).unwrap();

    let stats = engine.cache_stats();
    assert_eq!(stats.critical_entries, 1, "临界水深与底坡无关");
    assert_eq!(stats.normal_entries, 2);
}

// ============================================================
// Test 4: Configure And Clear Cache
// ============================================================

#[test]
fn test_configure_and_clear_cache() {
    let engine = Engine::with_cache_config(CacheConfig {
        ttl: Duration::from_secs(60),
        max_size: 8,
    });
    let params = rect_channel();

    engine.compute_critical_depth(&params).unwrap();
    assert_eq!(engine.cache_stats().critical_entries, 1);
    assert_eq!(engine.cache_stats().ttl, Duration::from_secs(60));
    assert_eq!(engine.cache_stats().max_size, 8);

    engine.configure_cache(CacheConfig {
        ttl: Duration::from_secs(1),
        max_size: 2,
    });
    assert_eq!(engine.cache_stats().max_size, 2);

    engine.clear_cache();
    let stats = engine.cache_stats();
    assert_eq!(stats.critical_entries, 0);
    assert_eq!(stats.normal_entries, 0);
    assert_eq!(stats.profile_entries, 0);
}

// ============================================================
// Test 5: Normal Depth Satisfies Manning Equation
// ============================================================

#[test]
fn test_normal_depth_satisfies_manning_equation() {
    // 验收标准：引擎返回的正常水深回代 Manning 公式，
    // 流量相对残差 < 1%（公制与英制各一例）

    let engine = Engine::new();

    let metric = rect_channel();
    let imperial = ChannelParams {
        shape: ChannelShape::Rectangular { bottom_width: 16.4 },
        discharge: 353.0,
        manning_n: 0.013,
        bed_slope: 0.001,
        length: 3280.0,
        unit_system: UnitSystem::Imperial,
        upstream_depth: None,
        downstream_depth: None,
    };

    for params in [metric, imperial] {
        let yn = engine.compute_normal_depth(&params).unwrap();
        let props = section_properties(&params.shape, yn);
        let conveyance = (params.manning_k() / params.manning_n)
            * props.area
            * props.hydraulic_radius.powf(2.0 / 3.0);
        let q_back = conveyance * params.bed_slope.sqrt();
        let residual = (q_back - params.discharge).abs() / params.discharge;
        println!(
            "{:?}: yn = {:.4}, Q 回代 = {:.3} (目标 {}), 残差 = {:.2e}",
            params.unit_system, yn, q_back, params.discharge, residual
        );
        assert!(residual < 0.01, "Manning 回代残差过大: {:.2e}", residual);
    }
}

// ============================================================
// Test 6: Critical Depth Hand Check Imperial
// ============================================================

#[test]
fn test_critical_depth_hand_check_imperial() {
    // q = 353/16.4 ≈ 21.52 ft²/s, yc = (q²/32.2)^(1/3)

    let engine = Engine::new();
    let params = ChannelParams {
        shape: ChannelShape::Rectangular { bottom_width: 16.4 },
        discharge: 353.0,
        manning_n: 0.013,
        bed_slope: 0.001,
        length: 3280.0,
        unit_system: UnitSystem::Imperial,
        upstream_depth: None,
        downstream_depth: None,
    };

    let yc = engine.compute_critical_depth(&params).unwrap();
    let q = 353.0 / 16.4;
    let expected = (q * q / 32.2_f64).cbrt();
    println!("yc = {:.4} ft (期望 {:.4} ft)", yc, expected);
    assert!((yc - expected).abs() < 1e-9);
}

// ============================================================
// Test 7: Invalid Parameters Never Reach Cache
// ============================================================

#[test]
fn test_invalid_parameters_never_reach_cache() {
    let engine = Engine::new();
    let mut params = rect_channel();
    params.manning_n = -0.013;

    assert!(engine
        .compute_profile(&params, ComputeOptions::default())
        .is_err());
    assert!(engine.compute_critical_depth(&params).is_err());
    assert!(engine.compute_normal_depth(&params).is_err());

    let stats = engine.cache_stats();
    assert_eq!(stats.critical_entries, 0);
    assert_eq!(stats.normal_entries, 0);
    assert_eq!(stats.profile_entries, 0);
}
