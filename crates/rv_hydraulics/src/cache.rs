// crates/rv_hydraulics/src/cache.rs

//! 结果缓存
//!
//! 纯备忘录式缓存：键为与被缓存量相关的参数子集的
//! 规范化序列化（数值四舍五入到小数点后 4 位）：
//!
//! - 临界水深: 几何 + 流量 + 单位制
//! - 正常水深: 另加底坡 + 糙率
//! - 整条水面线: 全部参数 + 计算选项
//!
//! 条目带时间戳，按 TTL（默认 10 分钟）与最大容量
//! （最早插入先逐出）两条策略逐出。返回值一律为独立拷贝，
//! 绝不与调用方结构共享。
//!
//! 内部用 `parking_lot::Mutex` 串行化插入/逐出，
//! 同一实例可被多个调用方共享；缓存是建议性的，调用方可绕过。

use crate::params::{ChannelParams, ChannelShape};
use crate::types::ProfileResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 缓存配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// 条目存活时间
    pub ttl: Duration,
    /// 每个存储的最大条目数
    pub max_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_size: 128,
        }
    }
}

/// 缓存统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// 临界水深条目数
    pub critical_entries: usize,
    /// 正常水深条目数
    pub normal_entries: usize,
    /// 水面线条目数
    pub profile_entries: usize,
    /// 当前 TTL
    pub ttl: Duration,
    /// 当前最大容量
    pub max_size: usize,
}

struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

/// 单个键值存储：TTL + 最早插入先逐出
struct Store<T> {
    map: HashMap<String, Entry<T>>,
    insertion_order: VecDeque<String>,
}

impl<T: Clone> Store<T> {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            insertion_order: VecDeque::new(),
        }
    }

    fn get(&mut self, key: &str, ttl: Duration) -> Option<T> {
        let expired = match self.map.get(key) {
            Some(entry) => entry.inserted_at.elapsed() > ttl,
            None => return None,
        };
        if expired {
            self.map.remove(key);
            self.insertion_order.retain(|k| k != key);
            return None;
        }
        self.map.get(key).map(|e| e.value.clone())
    }

    fn insert(&mut self, key: String, value: T, ttl: Duration, max_size: usize) {
        // 先清理过期条目
        let now = Instant::now();
        self.map
            .retain(|_, e| now.duration_since(e.inserted_at) <= ttl);
        let map = &self.map;
        self.insertion_order.retain(|k| map.contains_key(k));

        if self.map.insert(
            key.clone(),
            Entry {
                value,
                inserted_at: now,
            },
        )
        .is_none()
        {
            self.insertion_order.push_back(key);
        }

        // 容量逐出：最早插入先出
        while self.map.len() > max_size {
            let Some(oldest) = self.insertion_order.pop_front() else {
                break;
            };
            self.map.remove(&oldest);
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.insertion_order.clear();
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

struct CacheInner {
    config: CacheConfig,
    critical: Store<f64>,
    normal: Store<f64>,
    profile: Store<ProfileResult>,
}

/// 结果缓存
///
/// 可注入组件：测试中可随时构造全新实例，无隐式全局生命周期。
pub struct ResultCache {
    inner: Mutex<CacheInner>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ResultCache {
    /// 以给定配置创建缓存
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                config,
                critical: Store::new(),
                normal: Store::new(),
                profile: Store::new(),
            }),
        }
    }

    /// 查询临界水深
    pub fn get_critical(&self, params: &ChannelParams) -> Option<f64> {
        let key = critical_key(params);
        let mut inner = self.inner.lock();
        let ttl = inner.config.ttl;
        inner.critical.get(&key, ttl)
    }

    /// 写入临界水深
    pub fn put_critical(&self, params: &ChannelParams, value: f64) {
        let key = critical_key(params);
        let mut inner = self.inner.lock();
        let (ttl, max) = (inner.config.ttl, inner.config.max_size);
        inner.critical.insert(key, value, ttl, max);
    }

    /// 查询正常水深
    pub fn get_normal(&self, params: &ChannelParams) -> Option<f64> {
        let key = normal_key(params);
        let mut inner = self.inner.lock();
        let ttl = inner.config.ttl;
        inner.normal.get(&key, ttl)
    }

    /// 写入正常水深
    pub fn put_normal(&self, params: &ChannelParams, value: f64) {
        let key = normal_key(params);
        let mut inner = self.inner.lock();
        let (ttl, max) = (inner.config.ttl, inner.config.max_size);
        inner.normal.insert(key, value, ttl, max);
    }

    /// 查询整条水面线（返回独立拷贝）
    pub fn get_profile(&self, key: &str) -> Option<ProfileResult> {
        let mut inner = self.inner.lock();
        let ttl = inner.config.ttl;
        inner.profile.get(key, ttl)
    }

    /// 写入整条水面线（存入拷贝）
    pub fn put_profile(&self, key: String, value: &ProfileResult) {
        let mut inner = self.inner.lock();
        let (ttl, max) = (inner.config.ttl, inner.config.max_size);
        inner.profile.insert(key, value.clone(), ttl, max);
    }

    /// 清空全部存储
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.critical.clear();
        inner.normal.clear();
        inner.profile.clear();
    }

    /// 更新配置（已有条目按新策略逐出）
    pub fn configure(&self, config: CacheConfig) {
        self.inner.lock().config = config;
    }

    /// 统计信息
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            critical_entries: inner.critical.len(),
            normal_entries: inner.normal.len(),
            profile_entries: inner.profile.len(),
            ttl: inner.config.ttl,
            max_size: inner.config.max_size,
        }
    }
}

// ============================================================================
// 键规范化
// ============================================================================

/// 形状的规范化片段（字段四舍五入到 4 位小数）
fn shape_key(shape: &ChannelShape) -> String {
    match *shape {
        ChannelShape::Rectangular { bottom_width } => {
            format!("rect|b={:.4}", bottom_width)
        }
        ChannelShape::Trapezoidal {
            bottom_width,
            side_slope,
        } => format!("trap|b={:.4}|m={:.4}", bottom_width, side_slope),
        ChannelShape::Triangular { side_slope } => format!("tri|m={:.4}", side_slope),
        ChannelShape::Circular { diameter } => format!("circ|d={:.4}", diameter),
    }
}

fn unit_key(params: &ChannelParams) -> &'static str {
    match params.unit_system {
        crate::params::UnitSystem::Metric => "metric",
        crate::params::UnitSystem::Imperial => "imperial",
    }
}

/// 临界水深键：几何 + 流量 + 单位制
pub fn critical_key(params: &ChannelParams) -> String {
    format!(
        "{}|q={:.4}|{}",
        shape_key(&params.shape),
        params.discharge,
        unit_key(params)
    )
}

/// 正常水深键：临界水深键 + 底坡 + 糙率
pub fn normal_key(params: &ChannelParams) -> String {
    format!(
        "{}|s={:.6}|n={:.4}",
        critical_key(params),
        params.bed_slope,
        params.manning_n
    )
}

/// 整条水面线键：全部参数 + 计算选项
pub fn profile_key(params: &ChannelParams, num_steps: usize, bidirectional: bool, detect_jumps: bool) -> String {
    format!(
        "{}|l={:.4}|up={:?}|dn={:?}|steps={}|bidir={}|jumps={}",
        normal_key(params),
        params.length,
        params.upstream_depth.map(|d| format!("{:.4}", d)),
        params.downstream_depth.map(|d| format!("{:.4}", d)),
        num_steps,
        bidirectional,
        detect_jumps
    )
}
