// crates/ps_config/src/stress_config.rs

//! 顶层运行配置
//!
//! 从 JSON 文件加载，所有字段都有默认值；加载后立即校验，
//! 任何非法值都在计算开始前报错。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::PhysicalConstants;
use crate::error::ConfigError;
use crate::options::{AveragingPolicy, EkmanVelocityType, ParallelStrategy};
use crate::tolerances::SolverTolerances;

/// 顶层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StressConfig {
    /// 物理常数
    #[serde(default)]
    pub constants: PhysicalConstants,

    /// Ekman 速度形式
    #[serde(default, rename = "u_ekman_type")]
    pub ekman_velocity: EkmanVelocityType,

    /// 时间平均策略
    #[serde(default)]
    pub averaging: AveragingPolicy,

    /// 迭代求解参数
    #[serde(default)]
    pub solver: SolverTolerances,

    /// 网格范围
    #[serde(default)]
    pub grid: GridConfig,

    /// 场引擎设置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 输出设置
    #[serde(default)]
    pub output: OutputConfig,
}

/// 网格范围（闭区间，等间距）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// 纬度下界 [°]
    #[serde(default = "default_lat_min")]
    pub lat_min: f64,
    /// 纬度上界 [°]
    #[serde(default = "default_lat_max")]
    pub lat_max: f64,
    /// 纬度步长 [°]
    #[serde(default = "default_step")]
    pub lat_step: f64,
    /// 经度下界 [°]
    #[serde(default = "default_lon_min")]
    pub lon_min: f64,
    /// 经度上界 [°]
    #[serde(default = "default_lon_max")]
    pub lon_max: f64,
    /// 经度步长 [°]
    #[serde(default = "default_step")]
    pub lon_step: f64,
}

fn default_lat_min() -> f64 { -80.0 }
fn default_lat_max() -> f64 { -40.0 }
fn default_lon_min() -> f64 { -180.0 }
fn default_lon_max() -> f64 { 180.0 }
fn default_step() -> f64 { 0.5 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lat_min: default_lat_min(),
            lat_max: default_lat_max(),
            lat_step: default_step(),
            lon_min: default_lon_min(),
            lon_max: default_lon_max(),
            lon_step: default_step(),
        }
    }
}

impl GridConfig {
    /// 纬度范围三元组 `(min, max, step)`
    pub fn lat_range(&self) -> (f64, f64, f64) {
        (self.lat_min, self.lat_max, self.lat_step)
    }

    /// 经度范围三元组 `(min, max, step)`
    pub fn lon_range(&self) -> (f64, f64, f64) {
        (self.lon_min, self.lon_max, self.lon_step)
    }

    /// 验证网格范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("grid.lat_min", self.lat_min), ("grid.lat_max", self.lat_max)] {
            if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
                return Err(ConfigError::invalid(key, value, "纬度必须在 [-90, 90] 范围内"));
            }
        }
        for (key, value) in [("grid.lon_min", self.lon_min), ("grid.lon_max", self.lon_max)] {
            if !value.is_finite() || !(-360.0..=360.0).contains(&value) {
                return Err(ConfigError::invalid(key, value, "经度必须在 [-360, 360] 范围内"));
            }
        }
        if self.lat_min >= self.lat_max {
            return Err(ConfigError::invalid("grid.lat_max", self.lat_max, "必须大于 lat_min"));
        }
        if self.lon_min >= self.lon_max {
            return Err(ConfigError::invalid("grid.lon_max", self.lon_max, "必须大于 lon_min"));
        }
        for (key, value) in [("grid.lat_step", self.lat_step), ("grid.lon_step", self.lon_step)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(key, value, "步长必须为有限正数"));
            }
        }
        Ok(())
    }
}

/// 场引擎设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 并行策略
    #[serde(default)]
    pub parallel: ParallelStrategy,

    /// `Auto` 策略下启用并行的最小纬度行数
    #[serde(default = "default_min_parallel_rows")]
    pub min_parallel_rows: usize,
}

fn default_min_parallel_rows() -> usize { 16 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: ParallelStrategy::default(),
            min_parallel_rows: default_min_parallel_rows(),
        }
    }
}

impl EngineConfig {
    /// 给定行数时是否并行
    pub fn use_parallel(&self, n_rows: usize) -> bool {
        match self.parallel {
            ParallelStrategy::Sequential => false,
            ParallelStrategy::Rows => true,
            ParallelStrategy::Auto => n_rows >= self.min_parallel_rows,
        }
    }
}

/// 输出设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 归档根目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// 平均场是否重新计算诊断量
    #[serde(default = "default_recompute")]
    pub recompute_diagnostics: bool,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_recompute() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            recompute_diagnostics: default_recompute(),
        }
    }
}

impl StressConfig {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;

        let config: StressConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.constants.validate()?;
        self.solver.validate()?;
        self.grid.validate()?;
        if self.output.directory.as_os_str().is_empty() {
            return Err(ConfigError::invalid("output.directory", "", "输出目录不能为空"));
        }
        Ok(())
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(ConfigError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StressConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ekman_velocity, EkmanVelocityType::VerticalAvg);
        assert_eq!(config.averaging, AveragingPolicy::PartialDataOk);
        assert!(config.output.recompute_diagnostics);
    }

    #[test]
    fn test_unknown_ekman_type_fails_parse() {
        let json = r#"{"u_ekman_type": "bottom"}"#;
        assert!(serde_json::from_str::<StressConfig>(json).is_err());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "u_ekman_type": "surface",
            "averaging": "full_data_only",
            "grid": {"lat_min": -70.0, "lat_max": -60.0}
        }"#;
        let config: StressConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ekman_velocity, EkmanVelocityType::Surface);
        assert_eq!(config.averaging, AveragingPolicy::FullDataOnly);
        assert_eq!(config.grid.lat_step, 0.5);
        assert_eq!(config.solver.max_iterations, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_grid() {
        let mut config = StressConfig::default();
        config.grid.lat_min = -95.0;
        assert!(config.validate().is_err());

        let mut config = StressConfig::default();
        config.grid.lon_step = 0.0;
        assert!(config.validate().is_err());

        let mut config = StressConfig::default();
        config.grid.lat_max = config.grid.lat_min;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_use_parallel() {
        let mut engine = EngineConfig::default();
        assert!(!engine.use_parallel(4));
        assert!(engine.use_parallel(81));
        engine.parallel = ParallelStrategy::Sequential;
        assert!(!engine.use_parallel(1000));
        engine.parallel = ParallelStrategy::Rows;
        assert!(engine.use_parallel(1));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("ps_config_round_trip.json");
        let mut config = StressConfig::default();
        config.constants.ekman_depth = 30.0;
        config.save_to_file(&path).unwrap();

        let loaded = StressConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_from_file_validates() {
        let path = std::env::temp_dir().join("ps_config_invalid.json");
        std::fs::write(&path, r#"{"constants": {"rho_0": -1.0}}"#).unwrap();
        let err = StressConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
