// crates/ps_workflow/src/error.rs

//! 工作流错误类型

use ps_config::ConfigError;
use ps_foundation::PsError;
use ps_io::ArchiveError;
use ps_physics::{AggregateError, SourceError};
use thiserror::Error;

/// 工作流结果类型
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// 工作流错误
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// 配置无效
    #[error("配置无效: {0}")]
    Config(#[from] ConfigError),

    /// 数据源错误
    #[error("数据源错误: {0}")]
    Source(#[from] SourceError),

    /// 归档错误
    #[error("归档错误: {0}")]
    Archive(#[from] ArchiveError),

    /// 时间平均错误
    #[error("时间平均失败: {0}")]
    Aggregate(#[from] AggregateError),

    /// 基础层错误
    #[error("基础层错误: {0}")]
    Foundation(#[from] PsError),

    /// 时段无效
    #[error("时段无效: {0}")]
    InvalidPeriod(String),
}

impl WorkflowError {
    /// 构造时段错误
    pub fn invalid_period(message: impl Into<String>) -> Self {
        Self::InvalidPeriod(message.into())
    }
}
