// crates/ps_physics/src/engine.rs

//! 网格场引擎
//!
//! 对网格上每个点：采样四类输入 → 分类 → 按状态生成完整输出。
//!
//! # 点状态
//!
//! 分类按以下优先级进行：
//!
//! | 状态 | 条件 | 输出 |
//! |------|------|------|
//! | `IceFree` | α 为 0 或缺测，海冰速度缺测，地转流与风都有数据 | τ = τ_air，τ_ice = 0，海冰区字段为 NaN |
//! | `Missing` | 其余任一输入缺测 | 全部字段为 NaN |
//! | `Coupled` | 四个输入齐全 | 调用应力求解器，结果同时写入海冰区字段 |
//!
//! 每个状态由一个处理函数生成完整的 [`PointOutput`]，
//! 不存在某个分支漏写字段的情况。
//!
//! # 并行
//!
//! 逐点计算互不依赖。按纬度行并行（rayon）计算，之后串行写回字段集，
//! 并行与串行的结果逐位相同。诊断字段不在这里计算，保持为零。

use glam::DVec2;
use ps_config::{EngineConfig, StressConfig};
use ps_foundation::geo::coriolis_parameter;
use ps_foundation::vector::{has_missing, quadratic_drag, Vector2, MISSING_VECTOR};
use ps_foundation::Grid;
use rayon::prelude::*;
use std::time::Instant;

use crate::ekman::EkmanClosure;
use crate::fields::{FieldName, FieldSet};
use crate::sampler::SamplerSet;
use crate::solver::{RichardsonSolver, SolveStatus, StressInputs, SurfaceStressSolver};

// ============================================================
// 点状态
// ============================================================

/// 格点分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointState {
    /// 开阔水域，应力只来自风
    IceFree,
    /// 输入缺测，无法计算
    Missing,
    /// 冰-海-气耦合
    Coupled,
}

impl PointState {
    /// 按优先级分类
    pub fn classify(inputs: &StressInputs) -> Self {
        let no_ice = (inputs.alpha == 0.0 || inputs.alpha.is_nan()) && has_missing(inputs.u_ice);
        if no_ice && !has_missing(inputs.u_geo) && !has_missing(inputs.u_wind) {
            Self::IceFree
        } else if inputs.any_missing() {
            Self::Missing
        } else {
            Self::Coupled
        }
    }

    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::IceFree => "ice_free",
            Self::Missing => "missing",
            Self::Coupled => "coupled",
        }
    }
}

/// 单点完整输出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOutput {
    /// 分类
    pub state: PointState,
    /// 空气-海洋应力
    pub tau_air: Vector2,
    /// 冰-海洋应力
    pub tau_ice: Vector2,
    /// 总应力
    pub tau: Vector2,
    /// 海冰区应力
    pub tau_siz: Vector2,
    /// Ekman 速度
    pub u_ekman: Vector2,
    /// 海冰区 Ekman 速度
    pub u_ekman_siz: Vector2,
    /// 记录的采样值
    pub raw: StressInputs,
    /// 求解器状态（仅 `Coupled`）
    pub status: Option<SolveStatus>,
}

impl PointOutput {
    /// 全部为 NaN 的输出
    pub fn missing() -> Self {
        Self {
            state: PointState::Missing,
            tau_air: MISSING_VECTOR,
            tau_ice: MISSING_VECTOR,
            tau: MISSING_VECTOR,
            tau_siz: MISSING_VECTOR,
            u_ekman: MISSING_VECTOR,
            u_ekman_siz: MISSING_VECTOR,
            raw: StressInputs::MISSING,
            status: None,
        }
    }

    fn values(&self) -> [(FieldName, f64); 19] {
        [
            (FieldName::TauAirX, self.tau_air.x),
            (FieldName::TauAirY, self.tau_air.y),
            (FieldName::TauIceX, self.tau_ice.x),
            (FieldName::TauIceY, self.tau_ice.y),
            (FieldName::TauX, self.tau.x),
            (FieldName::TauY, self.tau.y),
            (FieldName::TauSizX, self.tau_siz.x),
            (FieldName::TauSizY, self.tau_siz.y),
            (FieldName::EkmanU, self.u_ekman.x),
            (FieldName::EkmanV, self.u_ekman.y),
            (FieldName::EkmanSizU, self.u_ekman_siz.x),
            (FieldName::EkmanSizV, self.u_ekman_siz.y),
            (FieldName::GeoU, self.raw.u_geo.x),
            (FieldName::GeoV, self.raw.u_geo.y),
            (FieldName::WindU, self.raw.u_wind.x),
            (FieldName::WindV, self.raw.u_wind.y),
            (FieldName::Alpha, self.raw.alpha),
            (FieldName::IceU, self.raw.u_ice.x),
            (FieldName::IceV, self.raw.u_ice.y),
        ]
    }

    /// 写入字段集的 `(i, j)` 处
    pub fn write_to(&self, fields: &mut FieldSet, i: usize, j: usize) {
        for (name, value) in self.values() {
            fields.get_mut(name).set(i, j, value);
        }
    }
}

// ============================================================
// 统计
// ============================================================

/// 一次扫描的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// 开阔水域点数
    pub ice_free: usize,
    /// 缺测点数
    pub missing: usize,
    /// 耦合点数
    pub coupled: usize,
    /// 求解收敛点数
    pub converged: usize,
    /// 达到迭代上限点数
    pub iteration_cap: usize,
    /// 发散点数
    pub diverged: usize,
    /// NaN 点数
    pub non_finite: usize,
}

impl EngineStats {
    fn record(&mut self, output: &PointOutput) {
        match output.state {
            PointState::IceFree => self.ice_free += 1,
            PointState::Missing => self.missing += 1,
            PointState::Coupled => self.coupled += 1,
        }
        match output.status {
            Some(SolveStatus::Converged { .. }) => self.converged += 1,
            Some(SolveStatus::IterationCap) => self.iteration_cap += 1,
            Some(SolveStatus::Diverged { .. }) => self.diverged += 1,
            Some(SolveStatus::NonFinite) => self.non_finite += 1,
            None => {}
        }
    }

    /// 总点数
    pub fn total(&self) -> usize {
        self.ice_free + self.missing + self.coupled
    }
}

/// 扫描结果
#[derive(Debug, Clone)]
pub struct EngineRun {
    /// 字段集（诊断字段为零）
    pub fields: FieldSet,
    /// 统计
    pub stats: EngineStats,
}

// ============================================================
// 引擎
// ============================================================

/// 网格场引擎
pub struct FieldEngine {
    solver: Box<dyn SurfaceStressSolver>,
    ekman: EkmanClosure,
    air_drag: f64,
    omega: f64,
    config: EngineConfig,
}

impl FieldEngine {
    /// 使用指定求解器创建
    pub fn new(
        solver: impl SurfaceStressSolver + 'static,
        ekman: EkmanClosure,
        air_drag: f64,
        omega: f64,
        config: EngineConfig,
    ) -> Self {
        Self {
            solver: Box::new(solver),
            ekman,
            air_drag,
            omega,
            config,
        }
    }

    /// 由配置创建（Richardson 求解器）
    pub fn from_config(config: &StressConfig) -> Self {
        let ekman = EkmanClosure::new(config.ekman_velocity, &config.constants);
        let solver = RichardsonSolver::new(&config.constants, ekman, config.solver);
        Self::new(
            solver,
            ekman,
            config.constants.air_drag(),
            config.constants.omega,
            config.engine,
        )
    }

    /// 求解器名称
    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// 对单点分类并计算
    pub fn compute_point(&self, f: f64, raw: &StressInputs) -> PointOutput {
        match PointState::classify(raw) {
            PointState::IceFree => self.handle_ice_free(f, raw),
            PointState::Missing => PointOutput::missing(),
            PointState::Coupled => self.handle_coupled(f, raw),
        }
    }

    fn handle_ice_free(&self, f: f64, raw: &StressInputs) -> PointOutput {
        let tau_air = quadratic_drag(self.air_drag, raw.u_wind);
        PointOutput {
            state: PointState::IceFree,
            tau_air,
            tau_ice: DVec2::ZERO,
            tau: tau_air,
            tau_siz: MISSING_VECTOR,
            u_ekman: self.ekman.velocity(f, tau_air),
            u_ekman_siz: MISSING_VECTOR,
            raw: *raw,
            status: None,
        }
    }

    fn handle_coupled(&self, f: f64, raw: &StressInputs) -> PointOutput {
        let solution = self.solver.solve(f, raw);
        PointOutput {
            state: PointState::Coupled,
            tau_air: solution.tau_air,
            tau_ice: solution.tau_ice,
            tau: solution.tau,
            tau_siz: solution.tau,
            u_ekman: solution.u_ekman,
            u_ekman_siz: solution.u_ekman,
            raw: *raw,
            status: Some(solution.status),
        }
    }

    fn compute_row(&self, grid: &Grid, samplers: &SamplerSet, i: usize) -> Vec<PointOutput> {
        let lat = grid.lat(i);
        let f = coriolis_parameter(lat, self.omega);
        tracing::debug!(row = i, lat, "计算纬度行");
        grid.lons()
            .iter()
            .map(|&lon| self.compute_point(f, &samplers.sample(lat, lon)))
            .collect()
    }

    /// 扫描整个网格
    pub fn run(&self, grid: &Grid, samplers: &SamplerSet) -> EngineRun {
        let start = Instant::now();
        let n_rows = grid.n_lat();
        let parallel = self.config.use_parallel(n_rows);

        let rows: Vec<Vec<PointOutput>> = if parallel {
            (0..n_rows)
                .into_par_iter()
                .map(|i| self.compute_row(grid, samplers, i))
                .collect()
        } else {
            (0..n_rows)
                .map(|i| self.compute_row(grid, samplers, i))
                .collect()
        };

        let mut fields = FieldSet::zeros(grid.clone());
        let mut stats = EngineStats::default();
        for (i, row) in rows.iter().enumerate() {
            for (j, output) in row.iter().enumerate() {
                output.write_to(&mut fields, i, j);
                stats.record(output);
            }
        }

        tracing::info!(
            n_lat = grid.n_lat(),
            n_lon = grid.n_lon(),
            parallel,
            ice_free = stats.ice_free,
            missing = stats.missing,
            coupled = stats.coupled,
            converged = stats.converged,
            iteration_cap = stats.iteration_cap,
            diverged = stats.diverged,
            non_finite = stats.non_finite,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "表面应力场计算完成"
        );

        EngineRun { fields, stats }
    }
}

impl std::fmt::Debug for FieldEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEngine")
            .field("solver", &self.solver.name())
            .field("ekman", &self.ekman)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{ConstantScalar, ConstantVector, FnScalarSampler, MissingVector};
    use ps_config::ParallelStrategy;

    fn inputs(geo: Vector2, wind: Vector2, alpha: f64, ice: Vector2) -> StressInputs {
        StressInputs { u_geo: geo, u_wind: wind, alpha, u_ice: ice }
    }

    #[test]
    fn test_classify_priority() {
        let v = DVec2::new(1.0, 0.5);
        let nan = MISSING_VECTOR;
        assert_eq!(PointState::classify(&inputs(v, v, 0.0, nan)), PointState::IceFree);
        assert_eq!(PointState::classify(&inputs(v, v, f64::NAN, nan)), PointState::IceFree);
        assert_eq!(PointState::classify(&inputs(nan, v, 0.0, nan)), PointState::Missing);
        assert_eq!(PointState::classify(&inputs(v, v, 0.4, nan)), PointState::Missing);
        assert_eq!(PointState::classify(&inputs(v, nan, 0.4, v)), PointState::Missing);
        assert_eq!(PointState::classify(&inputs(v, v, 0.4, v)), PointState::Coupled);
        assert_eq!(PointState::classify(&inputs(v, v, 0.0, v)), PointState::Coupled);
    }

    #[test]
    fn test_ice_free_exact() {
        let engine = FieldEngine::from_config(&StressConfig::default());
        let raw = inputs(DVec2::new(0.1, 0.0), DVec2::new(6.0, -3.0), 0.0, MISSING_VECTOR);
        let out = engine.compute_point(-1.2e-4, &raw);
        assert_eq!(out.state, PointState::IceFree);
        assert_eq!(out.tau_ice, DVec2::ZERO);
        assert_eq!(out.tau, out.tau_air);
        assert!(has_missing(out.tau_siz) && has_missing(out.u_ekman_siz));
        assert!(out.u_ekman.is_finite());
    }

    #[test]
    fn test_missing_all_nan() {
        let engine = FieldEngine::from_config(&StressConfig::default());
        let raw = inputs(DVec2::new(0.1, 0.0), DVec2::new(6.0, -3.0), 0.5, MISSING_VECTOR);
        let out = engine.compute_point(-1.2e-4, &raw);
        assert_eq!(out.state, PointState::Missing);
        assert!(out.values().iter().all(|(_, v)| v.is_nan()));
    }

    #[test]
    fn test_coupled_mirrors_siz() {
        let engine = FieldEngine::from_config(&StressConfig::default());
        let raw = inputs(DVec2::new(0.05, 0.0), DVec2::new(6.0, 2.0), 0.7, DVec2::new(0.1, 0.02));
        let out = engine.compute_point(-1.2e-4, &raw);
        assert_eq!(out.state, PointState::Coupled);
        assert_eq!(out.tau_siz, out.tau);
        assert_eq!(out.u_ekman_siz, out.u_ekman);
        assert!(out.status.is_some());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let grid = Grid::from_range((-70.0, -60.0, 1.0), (0.0, 10.0, 1.0)).unwrap();
        let samplers = || {
            SamplerSet::new(
                ConstantVector::new(0.02, -0.01),
                ConstantVector::new(7.0, 1.0),
                FnScalarSampler(|lat: f64, lon: f64| {
                    if lon > 8.0 {
                        None
                    } else if lat < -65.0 {
                        Some(0.8)
                    } else {
                        Some(0.0)
                    }
                }),
                MissingVector,
            )
        };

        let mut config = StressConfig::default();
        config.engine.parallel = ParallelStrategy::Sequential;
        let seq = FieldEngine::from_config(&config).run(&grid, &samplers());
        config.engine.parallel = ParallelStrategy::Rows;
        let par = FieldEngine::from_config(&config).run(&grid, &samplers());

        assert!(seq.fields.bitwise_eq(&par.fields));
        assert_eq!(seq.stats, par.stats);
        assert_eq!(seq.stats.total(), grid.n_points());
    }

    #[test]
    fn test_diagnostic_fields_untouched() {
        let grid = Grid::from_range((-70.0, -68.0, 1.0), (0.0, 2.0, 1.0)).unwrap();
        let samplers = SamplerSet::new(
            ConstantVector::new(0.0, 0.0),
            ConstantVector::new(5.0, 0.0),
            ConstantScalar(0.0),
            MissingVector,
        );
        let run = FieldEngine::from_config(&StressConfig::default()).run(&grid, &samplers);
        for name in FieldName::DIAGNOSTICS {
            assert!(run.fields.get(name).as_slice().iter().all(|&v| v == 0.0));
        }
        assert_eq!(run.stats.ice_free, 9);
    }
}
