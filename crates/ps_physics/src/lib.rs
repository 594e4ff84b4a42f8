// crates/ps_physics/src/lib.rs

//! PolarStress Physics Layer
//!
//! 冰-海-气表面应力计算核心：
//!
//! - 采样接口 (sampler) - 外部数据源的逐点读取
//! - 应力求解 (solver) - 阻尼 Richardson 迭代求耦合不动点
//! - Ekman 闭合 (ekman) - 表层与垂向平均两种形式
//! - 场引擎 (engine) - 逐点分类并生成完整输出
//! - 诊断 (diagnostics) - 风应力旋度与 Ekman 抽吸
//! - 时间平均 (aggregate) - 两种缺测策略
//! - 字段 (fields) - 23 个命名输出字段
//!
//! # 数据流
//!
//! ```text
//! SamplerSet ─> FieldEngine ─> FieldSet ─> DiagnosticStage
//!                                  │
//!                                  └─> 归档 ─> MeanAggregator ─> FieldSet ─> DiagnosticStage
//! ```
//!
//! 所有物理常数通过 `ps_config` 注入，这里不硬编码任何常数。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod diagnostics;
pub mod ekman;
pub mod engine;
pub mod error;
pub mod fields;
pub mod sampler;
pub mod solver;

/// 层级标识
pub const LAYER: u8 = 3;

// 重导出常用类型
pub use aggregate::{
    strategy_for, ArchiveSource, AveragingStrategy, FullDataOnly, MeanAccumulator,
    MeanAggregator, MeanOutcome, PartialDataOk,
};
pub use diagnostics::{DiagnosticStage, DiagnosticStats, Diagnostics};
pub use ekman::EkmanClosure;
pub use engine::{EngineRun, EngineStats, FieldEngine, PointOutput, PointState};
pub use error::{AggregateError, AggregateResult, SourceError};
pub use fields::{FieldName, FieldSet};
pub use sampler::{
    ConstantScalar, ConstantVector, FnScalarSampler, FnVectorSampler, MissingScalar,
    MissingVector, SamplerSet, ScalarSampler, SourceProvider, VectorSampler,
};
pub use solver::{
    RichardsonSolver, SolveStatus, StressInputs, StressSolution, SurfaceStressSolver,
};
