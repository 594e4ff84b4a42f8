// crates/ps_workflow/src/lib.rs

//! PolarStress 工作流
//!
//! 把物理层与归档层串成可运行的流程：
//!
//! - [`daily`]: 逐日计算、诊断重算、时段平均
//! - [`period`]: 月、季、年及多年气候态的日期展开与标签
//! - [`batch`]: 多日并行批处理
//! - [`error`]: 错误类型
//!
//! # 示例
//!
//! ```rust,ignore
//! use ps_config::StressConfig;
//! use ps_workflow::{process_period, Period};
//!
//! let config = StressConfig::from_file("stress.json")?;
//! let period = Period::Month { year: 2015, month: 2 };
//! let (report, mean_path) = process_period(&period, &config, &provider)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod daily;
pub mod error;
pub mod period;

/// 层级标识
pub const LAYER: u8 = 4;

// 重导出核心类型
pub use batch::{process_period, run_batch, BatchReport};
pub use daily::{
    aggregate, archive_store, build_grid, compute_daily_field, compute_diagnostics,
    produce_period_mean, run_daily,
};
pub use error::{WorkflowError, WorkflowResult};
pub use period::{Period, Season};
