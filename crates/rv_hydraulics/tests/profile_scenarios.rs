// crates/rv_hydraulics/tests/profile_scenarios.rs
//!
//! 水面线推进场景测试
//!
//! 验证标准步推进在经典教科书场景下的整体行为：
//! M1/M2 缓坡线、S2 陡坡线、均匀流与壅塞终止。

use rv_hydraulics::params::{ChannelParams, ChannelShape, UnitSystem};
use rv_hydraulics::profile::{
    compute_profile, compute_profile_high_resolution, ProfileOptions,
};
use rv_hydraulics::slope::SlopeClass;
use rv_hydraulics::types::ProfileType;
use std::time::Instant;

fn rect_channel(bed_slope: f64) -> ChannelParams {
    ChannelParams {
        shape: ChannelShape::Rectangular { bottom_width: 5.0 },
        discharge: 10.0,
        manning_n: 0.013,
        bed_slope,
        length: 1000.0,
        unit_system: UnitSystem::Metric,
        upstream_depth: None,
        downstream_depth: None,
    }
}

// ============================================================
// Test 1: M2 Drawdown To Critical Control
// ============================================================

#[test]
fn test_m2_drawdown_to_critical_control() {
    // 验收标准：缓坡无边界水深时从下游临界控制向上游推进，
    // 水深单调抬升并向正常水深渐近，类型判别为 M2

    let params = rect_channel(0.001);
    let start = Instant::now();
    let profile = compute_profile(&params, &ProfileOptions::default()).unwrap();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let yc = profile.critical_depth;
    let yn = profile.normal_depth;
    println!("yc = {:.4} m, yn = {:.4} m", yc, yn);
    println!("points = {}, elapsed = {:.3} ms", profile.points.len(), elapsed_ms);

    assert_eq!(profile.slope_class, SlopeClass::Mild);
    assert!(yn > yc, "缓坡要求 yn > yc");
    assert!(!profile.choking);
    assert!(profile.jump.is_none());

    // 下游控制点为临界水深
    let last = profile.points.last().unwrap();
    assert!((last.station - 1000.0).abs() < 1e-9);
    assert!((last.depth - yc).abs() < 1e-9, "下游端应为 yc");

    // 站号升序，水深沿站号不增（向上游抬升）
    assert!(profile
        .points
        .windows(2)
        .all(|w| w[0].station < w[1].station));
    assert!(profile
        .points
        .windows(2)
        .all(|w| w[0].depth >= w[1].depth - 1e-9));

    // 全部点落在 M2 分区 [yc, yn]
    for p in &profile.points {
        assert!(p.depth >= yc * 0.999, "station {:.1}: depth {:.4}", p.station, p.depth);
        assert!(p.depth <= yn * 1.001, "station {:.1}: depth {:.4}", p.station, p.depth);
    }
    assert_eq!(profile.profile_type, ProfileType::M2);
}

// ============================================================
// Test 2: M1 Backwater From High Downstream Stage
// ============================================================

#[test]
fn test_m1_backwater_from_high_downstream_stage() {
    // 验收标准：显式下游水深高于正常水深时产生 M1 壅水线，
    // 水深向上游回落但始终高于正常水深

    let mut params = rect_channel(0.001);
    params.downstream_depth = Some(2.0);

    let profile = compute_profile(&params, &ProfileOptions::default()).unwrap();
    let yn = profile.normal_depth;

    let first = profile.points.first().unwrap();
    let last = profile.points.last().unwrap();
    println!(
        "上游端水深 {:.4} m, 下游端水深 {:.4} m, yn = {:.4} m",
        first.depth, last.depth, yn
    );

    assert!((last.depth - 2.0).abs() < 1e-9, "下游端应为显式边界水深");
    assert!(first.depth < last.depth, "壅水应向上游回落");
    assert!(first.depth > yn, "M1 全程高于正常水深");
    assert!(profile
        .points
        .windows(2)
        .all(|w| w[0].depth <= w[1].depth + 1e-9));
    assert_eq!(profile.profile_type, ProfileType::M1);
    assert!(!profile.choking);
}

// ============================================================
// Test 3: S2 Drawdown From Critical Entrance
// ============================================================

#[test]
fn test_s2_drawdown_from_critical_entrance() {
    // 验收标准：陡坡从上游临界入口向下游推进，水深回落向
    // 正常水深渐近，类型判别为 S2

    let mut params = rect_channel(0.03);
    // 入口处水流经临界水深进入陡坡
    let yc = (4.0_f64 / 9.81).cbrt();
    params.upstream_depth = Some(yc);

    let profile = compute_profile(&params, &ProfileOptions::default()).unwrap();
    let yn = profile.normal_depth;
    println!("yc = {:.4} m, yn = {:.4} m", profile.critical_depth, yn);

    assert_eq!(profile.slope_class, SlopeClass::Steep);
    assert!(yn < profile.critical_depth, "陡坡要求 yn < yc");

    let first = profile.points.first().unwrap();
    assert!((first.station - 0.0).abs() < 1e-9);
    assert!((first.depth - yc).abs() < 1e-9, "上游端应为入口水深");

    // 水深沿程回落
    assert!(profile
        .points
        .windows(2)
        .all(|w| w[0].depth >= w[1].depth - 1e-9));
    for p in &profile.points {
        assert!(p.depth >= yn * 0.99);
    }
    assert_eq!(profile.profile_type, ProfileType::S2);
    assert!(!profile.choking);
}

// ============================================================
// Test 4: Uniform Flow Stays At Normal Depth
// ============================================================

#[test]
fn test_uniform_flow_stays_at_normal_depth() {
    // 验收标准：陡坡无边界水深时从正常水深出发，
    // 全程水深偏差 < 2%（均匀流是推进的不动点）

    let params = rect_channel(0.03);
    let profile = compute_profile(&params, &ProfileOptions::default()).unwrap();
    let yn = profile.normal_depth;

    let max_deviation = profile
        .points
        .iter()
        .map(|p| (p.depth - yn).abs() / yn)
        .fold(0.0_f64, f64::max);
    println!("yn = {:.4} m, 最大相对偏差 = {:.2e}", yn, max_deviation);

    assert!(
        max_deviation < 0.02,
        "均匀流漂移过大: {:.2e}",
        max_deviation
    );
    assert!(!profile.choking);
}

// ============================================================
// Test 5: Choking Terminates March
// ============================================================

#[test]
fn test_choking_terminates_march() {
    // 验收标准：下游边界水深远低于临界水深时能量方程无解，
    // 推进以壅塞标志终止而不报错、不产出非物理水深

    let mut params = rect_channel(0.001);
    params.downstream_depth = Some(0.05);

    let profile = compute_profile(&params, &ProfileOptions::default()).unwrap();
    println!(
        "choking = {}, points = {}",
        profile.choking,
        profile.points.len()
    );

    assert!(profile.choking, "应判定壅塞");
    assert!(!profile.points.is_empty());
    for p in &profile.points {
        assert!(p.depth > 0.0);
        assert!(p.depth.is_finite());
    }
}

// ============================================================
// Test 6: High Resolution Agrees With Base March
// ============================================================

#[test]
fn test_high_resolution_agrees_with_base_march() {
    // 验收标准：四倍分辨率与基础分辨率在上游端水深一致（< 2 cm）

    let params = rect_channel(0.001);
    let options = ProfileOptions::default();
    let base = compute_profile(&params, &options).unwrap();
    let fine = compute_profile_high_resolution(&params, &options).unwrap();

    let base_upstream = base.points.first().unwrap().depth;
    let fine_upstream = fine.points.first().unwrap().depth;
    println!(
        "基础 {:.4} m vs 高分辨率 {:.4} m (Δ = {:.2e})",
        base_upstream,
        fine_upstream,
        (base_upstream - fine_upstream).abs()
    );

    assert!(fine.points.len() > base.points.len() * 3);
    assert!((base_upstream - fine_upstream).abs() < 0.02);
}
