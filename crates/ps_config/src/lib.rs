// crates/ps_config/src/lib.rs

//! PolarStress Config Layer
//!
//! 配置层，集中定义所有外部提供的物理常数、求解器容差与运行选项。
//! 核心计算代码不硬编码任何物理常数，全部从这里读取。
//!
//! # 模块概览
//!
//! - [`constants`]: 物理常数（空气/海水密度、拖曳系数、自转角速度、Ekman 层深度）
//! - [`options`]: Ekman 速度形式、平均策略、并行策略
//! - [`tolerances`]: 不动点迭代的松弛因子、收敛容差与迭代上限
//! - [`stress_config`]: 顶层 `StressConfig`（JSON 加载与校验）
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 4: ps_workflow   ─> uses StressConfig
//! Layer 3: ps_physics    ─> PhysicalConstants, SolverTolerances, options
//! Layer 2: ps_config     (本层)
//! Layer 1: ps_foundation
//! ```
//!
//! # 快速失败
//!
//! 未识别的 `u_Ekman_type` 或平均策略在解析阶段即报错，
//! 数值越界在 [`StressConfig::validate`] 中报错，均发生在任何计算开始之前。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod error;
pub mod options;
pub mod stress_config;
pub mod tolerances;

/// 层级标识
pub const LAYER: u8 = 2;

// 重导出核心类型
pub use constants::PhysicalConstants;
pub use error::ConfigError;
pub use options::{AveragingPolicy, EkmanVelocityType, ParallelStrategy};
pub use stress_config::{EngineConfig, GridConfig, OutputConfig, StressConfig};
pub use tolerances::SolverTolerances;
