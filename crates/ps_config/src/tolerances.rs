// crates/ps_config/src/tolerances.rs

//! 不动点迭代参数
//!
//! 阻尼 Richardson 迭代的松弛因子、收敛容差、迭代上限与发散阈值。
//! 以独立结构注入求解器，便于替换为其他求解方法时沿用同一套参数。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 不动点迭代参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverTolerances {
    /// 松弛因子 ω
    #[serde(default = "default_relaxation")]
    pub relaxation: f64,

    /// 残差收敛阈值 ‖residual‖ [N/m²]
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// 最大迭代次数
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// 发散阈值 ‖τ‖ [N/m²]，超过即视为物理上不可信
    #[serde(default = "default_divergence_limit")]
    pub divergence_limit: f64,

    /// 初始 Ekman 速度猜测（两个分量相同）[m/s]
    #[serde(default = "default_initial_ekman")]
    pub initial_ekman: f64,
}

fn default_relaxation() -> f64 { 0.01 }
fn default_tolerance() -> f64 { 1e-5 }
fn default_max_iterations() -> usize { 50 }
fn default_divergence_limit() -> f64 { 10.0 }
fn default_initial_ekman() -> f64 { 0.001 }

impl Default for SolverTolerances {
    fn default() -> Self {
        Self {
            relaxation: default_relaxation(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            divergence_limit: default_divergence_limit(),
            initial_ekman: default_initial_ekman(),
        }
    }
}

impl SolverTolerances {
    /// 设置松弛因子
    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// 设置最大迭代次数
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// 设置收敛阈值
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// 验证参数有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.relaxation > 0.0 && self.relaxation <= 1.0) {
            return Err(ConfigError::invalid(
                "solver.relaxation",
                self.relaxation,
                "松弛因子必须在 (0, 1] 范围内",
            ));
        }
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(ConfigError::invalid(
                "solver.tolerance",
                self.tolerance,
                "收敛阈值必须为有限正数",
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid(
                "solver.max_iterations",
                self.max_iterations,
                "至少需要一次迭代",
            ));
        }
        if !(self.divergence_limit > 0.0) {
            return Err(ConfigError::invalid(
                "solver.divergence_limit",
                self.divergence_limit,
                "发散阈值必须为正",
            ));
        }
        if !self.initial_ekman.is_finite() {
            return Err(ConfigError::invalid(
                "solver.initial_ekman",
                self.initial_ekman,
                "初始猜测必须有限",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = SolverTolerances::default();
        assert_eq!(t.relaxation, 0.01);
        assert_eq!(t.tolerance, 1e-5);
        assert_eq!(t.max_iterations, 50);
        assert_eq!(t.divergence_limit, 10.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_invalid_relaxation() {
        assert!(SolverTolerances::default().with_relaxation(0.0).validate().is_err());
        assert!(SolverTolerances::default().with_relaxation(1.5).validate().is_err());
        assert!(SolverTolerances::default().with_relaxation(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(SolverTolerances::default().with_max_iterations(0).validate().is_err());
    }
}
