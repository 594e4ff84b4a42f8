// crates/ps_physics/src/solver.rs

//! 逐点表面应力求解器
//!
//! 大气、海冰与海洋之间的动量平衡：
//!
//! ```text
//! τ_air = ρ_air C_air |u_wind| u_wind
//! u_rel = u_ice - (u_geo - u_E)
//! τ_ice = ρ_0 C_seawater |u_rel| u_rel
//! τ     = α τ_ice + (1 - α) τ_air
//! ```
//!
//! u_E 又依赖 τ（见 [`ekman`](crate::ekman)），因此 τ 是一个非线性不动点。
//! 这里用阻尼 Richardson 迭代求解：
//!
//! ```text
//! τ⁰ = 0, u_E⁰ = (ε, ε)
//! τᵏ⁺¹ = τᵏ + ω (G(τᵏ) - τᵏ)
//! ```
//!
//! 迭代在残差低于阈值时收敛；达到迭代上限、应力发散或出现 NaN 时
//! 返回当前估计并在 [`SolveStatus`] 中说明原因，不会报错。

use glam::DVec2;
use ps_config::{PhysicalConstants, SolverTolerances};
use ps_foundation::vector::{has_missing, quadratic_drag, Vector2, MISSING_VECTOR};
use serde::{Deserialize, Serialize};

use crate::ekman::EkmanClosure;

// ============================================================
// 输入与输出
// ============================================================

/// 单点输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressInputs {
    /// 地转流速 [m/s]
    pub u_geo: Vector2,
    /// 海面风速 [m/s]
    pub u_wind: Vector2,
    /// 海冰密集度 [0, 1]
    pub alpha: f64,
    /// 海冰漂移速度 [m/s]
    pub u_ice: Vector2,
}

impl StressInputs {
    /// 全部缺测
    pub const MISSING: Self = Self {
        u_geo: MISSING_VECTOR,
        u_wind: MISSING_VECTOR,
        alpha: f64::NAN,
        u_ice: MISSING_VECTOR,
    };

    /// 是否有任一输入缺测
    pub fn any_missing(&self) -> bool {
        self.alpha.is_nan()
            || has_missing(self.u_geo)
            || has_missing(self.u_wind)
            || has_missing(self.u_ice)
    }
}

/// 求解结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// 残差低于阈值
    Converged {
        /// 实际迭代次数
        iterations: usize,
    },
    /// 达到迭代上限，返回当前最优估计
    IterationCap,
    /// 应力超过发散阈值，提前终止
    Diverged {
        /// 终止前完成的迭代次数
        iterations: usize,
    },
    /// 估计值出现 NaN
    NonFinite,
}

impl SolveStatus {
    /// 是否收敛
    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// 简短名称（用于统计与日志）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Converged { .. } => "converged",
            Self::IterationCap => "iteration_cap",
            Self::Diverged { .. } => "diverged",
            Self::NonFinite => "non_finite",
        }
    }
}

/// 求解结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressSolution {
    /// 总表面应力 τ [N/m²]
    pub tau: Vector2,
    /// 空气-海洋应力 [N/m²]
    pub tau_air: Vector2,
    /// 冰-海洋应力 [N/m²]
    pub tau_ice: Vector2,
    /// 与最后一次迭代一致的 Ekman 速度 [m/s]
    pub u_ekman: Vector2,
    /// 结束原因
    pub status: SolveStatus,
}

// ============================================================
// 求解器
// ============================================================

/// 表面应力求解器接口
///
/// 场引擎只依赖这个接口，可以替换为 Newton 等其他方法。
pub trait SurfaceStressSolver: Send + Sync {
    /// 求解方法名称
    fn name(&self) -> &'static str;

    /// 在科氏参数 `f` 下求解单点应力
    fn solve(&self, f: f64, inputs: &StressInputs) -> StressSolution;
}

/// 阻尼 Richardson 迭代
#[derive(Debug, Clone)]
pub struct RichardsonSolver {
    air_drag: f64,
    ice_drag: f64,
    ekman: EkmanClosure,
    tolerances: SolverTolerances,
}

impl RichardsonSolver {
    /// 创建求解器
    pub fn new(
        constants: &PhysicalConstants,
        ekman: EkmanClosure,
        tolerances: SolverTolerances,
    ) -> Self {
        Self {
            air_drag: constants.air_drag(),
            ice_drag: constants.ice_drag(),
            ekman,
            tolerances,
        }
    }

    /// 迭代参数
    pub fn tolerances(&self) -> &SolverTolerances {
        &self.tolerances
    }
}

impl SurfaceStressSolver for RichardsonSolver {
    fn name(&self) -> &'static str {
        "richardson"
    }

    fn solve(&self, f: f64, inputs: &StressInputs) -> StressSolution {
        let tol = &self.tolerances;
        let alpha = inputs.alpha;

        let mut tau = DVec2::ZERO;
        let mut tau_air = DVec2::ZERO;
        let mut tau_ice = DVec2::ZERO;
        let mut u_ekman = DVec2::splat(tol.initial_ekman);
        let mut residual = DVec2::ONE;

        let finish = |tau, tau_air, tau_ice, u_ekman, status| StressSolution {
            tau,
            tau_air,
            tau_ice,
            u_ekman,
            status,
        };

        for iteration in 1..=tol.max_iterations {
            if tau.length() > tol.divergence_limit {
                tracing::warn!(
                    ?tau, u_geo = ?inputs.u_geo, u_wind = ?inputs.u_wind, alpha, u_ice = ?inputs.u_ice,
                    "应力超过发散阈值，终止迭代"
                );
                return finish(
                    tau,
                    tau_air,
                    tau_ice,
                    u_ekman,
                    SolveStatus::Diverged { iterations: iteration - 1 },
                );
            }

            tau_air = quadratic_drag(self.air_drag, inputs.u_wind);
            u_ekman = self.ekman.velocity(f, tau);
            let u_rel = inputs.u_ice - (inputs.u_geo - u_ekman);
            tau_ice = quadratic_drag(self.ice_drag, u_rel);

            let target = alpha * tau_ice + (1.0 - alpha) * tau_air;
            residual = target - tau;
            tau += tol.relaxation * residual;

            if has_missing(tau) {
                tracing::warn!(
                    u_geo = ?inputs.u_geo, u_wind = ?inputs.u_wind, alpha, u_ice = ?inputs.u_ice,
                    "应力估计出现 NaN"
                );
                return finish(tau, tau_air, tau_ice, u_ekman, SolveStatus::NonFinite);
            }

            if residual.length() < tol.tolerance {
                return finish(
                    tau,
                    tau_air,
                    tau_ice,
                    u_ekman,
                    SolveStatus::Converged { iterations: iteration },
                );
            }
        }

        tracing::warn!(
            max_iterations = tol.max_iterations,
            ?tau, ?u_ekman, ?residual,
            "迭代达到上限，返回当前估计"
        );
        finish(tau, tau_air, tau_ice, u_ekman, SolveStatus::IterationCap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_config::EkmanVelocityType;

    const F: f64 = -1.26e-4;

    fn solver(tolerances: SolverTolerances) -> RichardsonSolver {
        let constants = PhysicalConstants::default();
        let ekman = EkmanClosure::new(EkmanVelocityType::VerticalAvg, &constants);
        RichardsonSolver::new(&constants, ekman, tolerances)
    }

    fn inputs(wind: (f64, f64), alpha: f64, ice: (f64, f64)) -> StressInputs {
        StressInputs {
            u_geo: DVec2::ZERO,
            u_wind: DVec2::new(wind.0, wind.1),
            alpha,
            u_ice: DVec2::new(ice.0, ice.1),
        }
    }

    #[test]
    fn test_trivial_fixed_point() {
        let s = solver(SolverTolerances::default());
        for alpha in [0.0, 0.3, 1.0] {
            let sol = s.solve(F, &inputs((0.0, 0.0), alpha, (0.0, 0.0)));
            assert_eq!(sol.tau, DVec2::ZERO);
            assert_eq!(sol.status, SolveStatus::Converged { iterations: 1 });
        }
    }

    #[test]
    fn test_iteration_cap_returns_estimate() {
        let s = solver(SolverTolerances::default().with_max_iterations(3));
        let sol = s.solve(F, &inputs((8.0, -2.0), 0.6, (0.1, 0.05)));
        assert_eq!(sol.status, SolveStatus::IterationCap);
        assert!(sol.tau.is_finite());
        assert!(sol.tau_air.is_finite());
        assert!(sol.tau_ice.is_finite());
    }

    #[test]
    fn test_full_relaxation_open_water() {
        // ω = 1, α = 0：第一次迭代即到达 τ_air，第二次残差为零
        let s = solver(SolverTolerances::default().with_relaxation(1.0));
        let sol = s.solve(F, &inputs((5.0, 0.0), 0.0, (0.0, 0.0)));
        let expected = 1.25 * 1.25e-3 * 25.0;
        assert_eq!(sol.status, SolveStatus::Converged { iterations: 2 });
        assert!((sol.tau.x - expected).abs() < 1e-15);
        assert_eq!(sol.tau, sol.tau_air);
    }

    #[test]
    fn test_divergence_guard() {
        let s = solver(SolverTolerances::default());
        let sol = s.solve(F, &inputs((1000.0, 0.0), 0.0, (0.0, 0.0)));
        assert_eq!(sol.status, SolveStatus::Diverged { iterations: 1 });
        assert!(sol.tau.length() > 10.0);
    }

    #[test]
    fn test_nan_input_reported() {
        let s = solver(SolverTolerances::default());
        let mut x = inputs((5.0, 0.0), 0.5, (0.1, 0.0));
        x.u_ice = MISSING_VECTOR;
        let sol = s.solve(F, &x);
        assert_eq!(sol.status, SolveStatus::NonFinite);
        assert!(has_missing(sol.tau));
    }

    #[test]
    fn test_converges_with_larger_relaxation() {
        let tolerances = SolverTolerances::default()
            .with_relaxation(0.5)
            .with_max_iterations(500);
        let s = solver(tolerances);
        let x = inputs((7.0, 3.0), 0.8, (0.15, 0.05));
        let sol = s.solve(F, &x);
        assert!(sol.status.is_converged());

        // 收敛后 τ 满足平衡方程
        let u_rel = x.u_ice - (x.u_geo - sol.u_ekman);
        let tau_ice = quadratic_drag(1025.0 * 5.5e-3, u_rel);
        let target = x.alpha * tau_ice + (1.0 - x.alpha) * sol.tau_air;
        assert!((target - sol.tau).length() < 1e-4);
    }
}
