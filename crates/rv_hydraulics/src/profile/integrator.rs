// crates/rv_hydraulics/src/profile/integrator.rs

//! 水面线积分器（核心编排）
//!
//! 显式状态机驱动标准步推进：
//!
//! ```text
//! Initializing → Marching → (JumpDetected → ResumeMarching)* → Terminated
//! Terminated ∈ { Complete, Choked }
//! ```
//!
//! # 状态职责
//!
//! - Initializing: 参数验证、临界/正常水深、坡度分类、控制端与基础站距
//! - Marching: 逐站调用单站求解器；转换区附近站距缩小为四分之一；
//!   每隔数个基础步检查近期弗劳德数趋势
//! - JumpDetected: 计算水跃，插入共轭水深点，随后从共轭水深续推
//! - Terminated(Choked): 单站求解产出非正/无效水深，
//!   表示给定边界条件无法满足——记录标志，不抛异常
//! - Terminated(Complete): 站号到达渠长边界；排序、分类、汇总
//!
//! 水跃的中途插入在此表达为显式状态转移，而不是嵌套循环加 break。

use super::classify::classify_profile;
use super::ProfileOptions;
use crate::flow::flow_state;
use crate::jump::{compute_jump, detect_jump, find_jump_interval};
use crate::params::ChannelParams;
use crate::slope::{classify_slope, SlopeClass};
use crate::solvers::{
    critical_depth, normal_depth, solve_step, Direction, NormalStrategy, RootSolve, StepInput,
};
use crate::types::{FlowDepthPoint, HydraulicJump, ProfileResult, ProfileType};
use rv_foundation::float::MIN_BRACKET_DEPTH;
use rv_foundation::RvResult;
use tracing::{debug, info, warn};

/// 终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 正常完成：站号到达渠长边界
    Complete,
    /// 壅塞：边界条件无法满足
    Choked,
}

/// 状态机阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarchPhase {
    /// 初始化
    Initializing,
    /// 推进中
    Marching,
    /// 检测到水跃
    JumpDetected,
    /// 从共轭水深续推
    ResumeMarching,
    /// 终止
    Terminated(Termination),
}

/// 弗劳德数趋势检查的基础步间隔
const JUMP_CHECK_INTERVAL: usize = 5;
/// 转换区判定半径（基础站距的倍数）
const REFINE_RADIUS_STEPS: f64 = 5.0;
/// 转换区内的站距缩小因子
const REFINE_FACTOR: f64 = 0.25;

/// 水面线积分器
pub struct ProfileIntegrator<'a> {
    params: &'a ChannelParams,
    options: &'a ProfileOptions,
    direction: Direction,
    critical: RootSolve,
    normal: RootSolve,
    slope_class: SlopeClass,
    base_dx: f64,
    start_station: f64,
    start_depth: f64,

    phase: MarchPhase,
    points: Vec<FlowDepthPoint>,
    transition_stations: Vec<f64>,
    jump: Option<HydraulicJump>,
    choking: bool,
    last_progress: u8,
}

impl<'a> ProfileIntegrator<'a> {
    /// 初始化：验证参数并确定控制端（方向由显式边界或坡度分类决定）
    pub fn new(params: &'a ChannelParams, options: &'a ProfileOptions) -> RvResult<Self> {
        // 参数错误在任何求解器执行之前同步返回
        params.check()?;

        let critical = critical_depth(params);
        let normal = normal_depth(params, NormalStrategy::Bisection);
        let slope_class = classify_slope(normal.value, critical.value);
        if !critical.converged || !normal.converged {
            warn!(
                critical_converged = critical.converged,
                normal_converged = normal.converged,
                "水深求解未收敛，使用最优估计"
            );
        }

        // 控制端：恰有一侧给定显式边界水深时从该侧出发、背离边界推进；
        // 无边界时由坡度分类决定——缓坡/临界坡从下游端以临界水深控制
        // 向上游推进，陡坡从上游端以正常水深控制向下游推进。
        // 两侧均给定时按坡度分类取端，该端的显式水深仍然生效。
        let direction = match (params.upstream_depth, params.downstream_depth) {
            (Some(_), None) => Direction::Downstream,
            (None, Some(_)) => Direction::Upstream,
            _ => match slope_class {
                SlopeClass::Mild | SlopeClass::Critical => Direction::Upstream,
                SlopeClass::Steep => Direction::Downstream,
            },
        };
        let (start_station, start_depth) = match direction {
            Direction::Upstream => (
                params.length,
                params.downstream_depth.unwrap_or(critical.value),
            ),
            Direction::Downstream => (0.0, params.upstream_depth.unwrap_or(normal.value)),
        };

        let num_steps = options.num_steps.max(1);
        let base_dx = params.length / num_steps as f64;

        info!(
            slope = ?slope_class,
            yc = critical.value,
            yn = normal.value,
            ?direction,
            start_depth,
            "水面线推进初始化"
        );

        Ok(Self {
            params,
            options,
            direction,
            critical,
            normal,
            slope_class,
            base_dx,
            start_station,
            start_depth,
            phase: MarchPhase::Initializing,
            points: Vec::with_capacity(num_steps + 2),
            transition_stations: Vec::new(),
            jump: None,
            choking: false,
            last_progress: 0,
        })
    }

    /// 初始化并强制推进方向（双向变体使用）
    fn with_direction(
        params: &'a ChannelParams,
        options: &'a ProfileOptions,
        direction: Direction,
    ) -> RvResult<Self> {
        let mut integrator = Self::new(params, options)?;
        if integrator.direction != direction {
            integrator.direction = direction;
            let (start_station, start_depth) = match direction {
                Direction::Upstream => (
                    params.length,
                    params
                        .downstream_depth
                        .unwrap_or(integrator.critical.value),
                ),
                Direction::Downstream => (
                    0.0,
                    params.upstream_depth.unwrap_or(integrator.normal.value),
                ),
            };
            integrator.start_station = start_station;
            integrator.start_depth = start_depth;
        }
        Ok(integrator)
    }

    /// 当前阶段（测试可观测）
    pub fn phase(&self) -> MarchPhase {
        self.phase
    }

    /// 运行状态机至终止，产出水面线结果
    pub fn run(mut self) -> RvResult<ProfileResult> {
        self.phase = MarchPhase::Marching;

        let mut station = self.start_station;
        let mut depth = self.start_depth;
        self.push_point(station, depth);

        let mut steps_since_check = 0usize;

        loop {
            let remaining = match self.direction {
                Direction::Upstream => station,
                Direction::Downstream => self.params.length - station,
            };
            if remaining <= self.base_dx * 1e-9 {
                self.phase = MarchPhase::Terminated(Termination::Complete);
                break;
            }

            // 转换区附近细化站距
            let mut dx = if self.near_transition(station) {
                self.base_dx * REFINE_FACTOR
            } else {
                self.base_dx
            };
            dx = dx.min(remaining);

            let result = solve_step(&StepInput {
                params: self.params,
                current_depth: depth,
                dx,
                direction: self.direction,
                normal_depth: self.normal.value,
            });

            if !result.valid || !result.depth.is_finite() || result.depth <= MIN_BRACKET_DEPTH {
                // 边界条件无法满足：壅塞终止，报告而非近似
                warn!(station, depth, "单站求解失败，判定壅塞");
                self.choking = true;
                self.phase = MarchPhase::Terminated(Termination::Choked);
                break;
            }

            station += self.direction.sign() * dx;
            depth = result.depth;
            self.push_point(station, depth);
            self.report_progress(station);

            // 周期性弗劳德数趋势检查
            steps_since_check += 1;
            if self.options.detect_jumps
                && self.direction == Direction::Downstream
                && steps_since_check >= JUMP_CHECK_INTERVAL
            {
                steps_since_check = 0;
                if let Some((jump_station, sequent)) = self.check_for_jump() {
                    // 跃后从跃址起以共轭（缓流）水深续推
                    station = jump_station;
                    depth = sequent;
                    self.phase = MarchPhase::ResumeMarching;
                }
            }
        }

        // 上游推进：推进结束后整体扫描一次（报告水跃，不改动推进轨迹）
        if self.options.detect_jumps && self.direction == Direction::Upstream && self.jump.is_none()
        {
            self.points
                .sort_by(|a, b| a.station.total_cmp(&b.station));
            let found = detect_jump(self.params, &self.points);
            if found.occurs() {
                self.jump = Some(found);
            }
        }

        Ok(self.finish())
    }

    /// 近期点序列的弗劳德数趋势检查
    ///
    /// 返回 Some((跃址站号, 共轭水深)) 表示检测到可行水跃：
    /// 跃址以下游已接受的能量延拓点作废，跃后点已插入，
    /// 推进应从跃址起以共轭水深重新覆盖下游段。
    fn check_for_jump(&mut self) -> Option<(f64, f64)> {
        if self.jump.is_some() {
            return None;
        }
        let window_len = (JUMP_CHECK_INTERVAL + 1).min(self.points.len());
        let start = self.points.len() - window_len;
        let mut window: Vec<FlowDepthPoint> = self.points[start..].to_vec();
        window.sort_by(|a, b| a.station.total_cmp(&b.station));

        let i = find_jump_interval(&window)?;
        let jump = compute_jump(self.params, &window[i], &window[i + 1]);
        let HydraulicJump::Occurs {
            station: jump_station,
            downstream_depth,
            ..
        } = jump
        else {
            return None;
        };

        self.phase = MarchPhase::JumpDetected;
        debug!(jump_station, downstream_depth, "状态转移: JumpDetected");

        // 跃址以下游的急流延拓点不再属于解，剔除后插入跃后点
        self.points.retain(|p| p.station <= jump_station);
        self.push_point(jump_station, downstream_depth);
        self.transition_stations.push(jump_station);
        self.jump = Some(jump);
        Some((jump_station, downstream_depth))
    }

    fn near_transition(&self, station: f64) -> bool {
        let radius = REFINE_RADIUS_STEPS * self.base_dx;
        self.transition_stations
            .iter()
            .any(|&t| (station - t).abs() < radius)
    }

    fn push_point(&mut self, station: f64, depth: f64) {
        let state = flow_state(self.params, depth);
        self.points.push(FlowDepthPoint {
            station,
            depth,
            velocity: state.velocity,
            froude: state.froude,
            specific_energy: state.specific_energy,
            critical_depth: self.critical.value,
            normal_depth: self.normal.value,
        });
    }

    fn report_progress(&mut self, station: f64) {
        let Some(cb) = self.options.progress.as_ref() else {
            return;
        };
        let traveled = match self.direction {
            Direction::Upstream => self.params.length - station,
            Direction::Downstream => station,
        };
        let pct = ((traveled / self.params.length) * 100.0).clamp(0.0, 100.0) as u8;
        if pct != self.last_progress {
            self.last_progress = pct;
            cb(pct);
        }
    }

    /// 终止后整理：排序、分类、汇总
    fn finish(mut self) -> ProfileResult {
        self.points
            .sort_by(|a, b| a.station.total_cmp(&b.station));

        let profile_type = if self.jump.as_ref().is_some_and(|j| j.occurs()) {
            ProfileType::Mixed
        } else {
            classify_profile(
                &self.points,
                self.normal.value,
                self.critical.value,
                self.slope_class,
            )
        };

        info!(
            points = self.points.len(),
            ?profile_type,
            choking = self.choking,
            jump = self.jump.as_ref().is_some_and(|j| j.occurs()),
            "水面线推进终止"
        );

        ProfileResult {
            points: self.points,
            profile_type,
            slope_class: self.slope_class,
            critical_depth: self.critical.value,
            normal_depth: self.normal.value,
            choking: self.choking,
            jump: self.jump,
            critical_converged: self.critical.converged,
            normal_converged: self.normal.converged,
        }
    }
}

/// 判断显式边界是否与坡度控制的流态相反
///
/// 缓坡（含临界坡）遇急流入流、陡坡遇缓流出流时，单支推进无法
/// 贯通全渠（急流支推进至临界水深即止），须双向合并以水跃衔接。
pub(crate) fn regime_transition_expected(params: &ChannelParams) -> bool {
    let yc = critical_depth(params).value;
    let yn = normal_depth(params, NormalStrategy::Bisection).value;
    match classify_slope(yn, yc) {
        SlopeClass::Mild | SlopeClass::Critical => {
            params.upstream_depth.is_some_and(|d| d < yc)
        }
        SlopeClass::Steep => params.downstream_depth.is_some_and(|d| d > yc),
    }
}

/// 双向推进：两支相反方向的推进在流态转换站合并
///
/// 急流支从上游端向下游推进，缓流支从下游端向上游推进；
/// 合并站取两支动量函数差变号（水跃动量平衡）的位置。
/// 无交点时退化为单向推进结果。
pub fn run_bidirectional(
    params: &ChannelParams,
    options: &ProfileOptions,
) -> RvResult<ProfileResult> {
    params.check()?;

    let branch_options = ProfileOptions {
        num_steps: options.num_steps,
        detect_jumps: false,
        progress: None,
    };

    let (down, up) = rayon::join(
        || {
            ProfileIntegrator::with_direction(params, &branch_options, Direction::Downstream)
                .and_then(|i| i.run())
        },
        || {
            ProfileIntegrator::with_direction(params, &branch_options, Direction::Upstream)
                .and_then(|i| i.run())
        },
    );
    let down = down?;
    let up = up?;

    let Some(merge_station) = momentum_merge_station(params, &down, &up) else {
        // 无流态转换：回落到常规单向推进
        debug!("双向推进未发现流态转换，退化为单向");
        return ProfileIntegrator::new(params, options)?.run();
    };

    let mut points: Vec<FlowDepthPoint> = Vec::new();
    points.extend(
        down.points
            .iter()
            .filter(|p| p.station <= merge_station)
            .copied(),
    );
    points.extend(
        up.points
            .iter()
            .filter(|p| p.station > merge_station)
            .copied(),
    );
    points.sort_by(|a, b| a.station.total_cmp(&b.station));

    let jump = if options.detect_jumps {
        let found = detect_jump(params, &points);
        found.occurs().then_some(found)
    } else {
        None
    };

    let profile_type = if jump.is_some() {
        ProfileType::Mixed
    } else {
        classify_profile(&points, down.normal_depth, down.critical_depth, down.slope_class)
    };

    // 急流支在合并站之后被水跃取代，其壅塞不影响合并结果；
    // 缓流支须覆盖合并站以下游的整段，壅塞照常上报
    Ok(ProfileResult {
        points,
        profile_type,
        slope_class: down.slope_class,
        critical_depth: down.critical_depth,
        normal_depth: down.normal_depth,
        choking: up.choking,
        jump,
        critical_converged: down.critical_converged,
        normal_converged: down.normal_converged,
    })
}

/// 在两支重叠范围内寻找动量函数差变号的站（即水跃动量平衡位置）
fn momentum_merge_station(
    params: &ChannelParams,
    down: &ProfileResult,
    up: &ProfileResult,
) -> Option<f64> {
    use crate::flow::momentum_function;
    use crate::geometry::section_properties;

    let g = params.gravity();
    let momentum_at = |depth: f64| {
        momentum_function(params.discharge, &section_properties(&params.shape, depth), g)
    };

    // 在急流支的每个站，线性插值缓流支水深，比较动量
    let interp_up = |station: f64| -> Option<f64> {
        let points = &up.points;
        let i = points.windows(2).position(|w| {
            w[0].station <= station && station <= w[1].station
        })?;
        let (a, b) = (&points[i], &points[i + 1]);
        let span = b.station - a.station;
        if span.abs() < 1e-12 {
            return Some(a.depth);
        }
        let t = (station - a.station) / span;
        Some(a.depth + t * (b.depth - a.depth))
    };

    let mut prev: Option<(f64, f64)> = None;
    for p in &down.points {
        let up_depth = match interp_up(p.station) {
            Some(d) => d,
            None => continue,
        };
        let diff = momentum_at(p.depth) - momentum_at(up_depth);
        if let Some((prev_station, prev_diff)) = prev {
            if prev_diff * diff <= 0.0 && prev_diff != diff {
                // 变号区间内线性插值
                let t = prev_diff / (prev_diff - diff);
                return Some(prev_station + t * (p.station - prev_station));
            }
        }
        prev = Some((p.station, diff));
    }
    None
}
