// crates/ps_workflow/src/batch.rs

//! 并行批处理
//!
//! 每个日期独立计算并写入各自的归档文件，日期之间不共享可变状态。
//! 单日失败只记录日志，不影响其它日期。

use chrono::NaiveDate;
use ps_config::StressConfig;
use ps_physics::SourceProvider;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::daily::{produce_period_mean, run_daily};
use crate::error::WorkflowResult;
use crate::period::Period;

/// 批处理结果
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 成功的日期与归档路径
    pub succeeded: Vec<(NaiveDate, PathBuf)>,
    /// 失败的日期与原因
    pub failed: Vec<(NaiveDate, String)>,
}

impl BatchReport {
    /// 是否全部成功
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// 处理的日期总数
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// 并行计算多日并写入配置的输出目录
pub fn run_batch(
    dates: &[NaiveDate],
    config: &StressConfig,
    provider: &dyn SourceProvider,
) -> BatchReport {
    let start = Instant::now();
    let results: Vec<(NaiveDate, WorkflowResult<PathBuf>)> = dates
        .par_iter()
        .map(|&date| (date, run_daily(date, config, provider)))
        .collect();

    let mut report = BatchReport::default();
    for (date, result) in results {
        match result {
            Ok(path) => report.succeeded.push((date, path)),
            Err(e) => {
                tracing::error!(%date, error = %e, "逐日计算失败");
                report.failed.push((date, e.to_string()));
            }
        }
    }

    tracing::info!(
        requested = dates.len(),
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "批处理完成"
    );
    report
}

/// 计算时段内每一天，再生成时段平均
///
/// 平均只使用成功写入的日期；缺失的日期在平均阶段被跳过。
pub fn process_period(
    period: &Period,
    config: &StressConfig,
    provider: &dyn SourceProvider,
) -> WorkflowResult<(BatchReport, PathBuf)> {
    config.validate()?;
    let dates = period.dates()?;
    let report = run_batch(&dates, config, provider);
    let (_, path) = produce_period_mean(period, config)?;
    Ok((report, path))
}
