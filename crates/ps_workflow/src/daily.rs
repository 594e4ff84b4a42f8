// crates/ps_workflow/src/daily.rs

//! 逐日计算与时段平均
//!
//! 工作流入口：
//!
//! - [`compute_daily_field`]: 采样 -> 场引擎 -> 诊断 -> 逐日归档
//! - [`compute_diagnostics`]: 对已有归档重算旋度与 Ekman 抽吸
//! - [`aggregate`]: 对若干日期求平均
//! - [`run_daily`] / [`produce_period_mean`]: 计算并写入配置的输出目录

use chrono::NaiveDate;
use ps_config::{AveragingPolicy, StressConfig};
use ps_foundation::Grid;
use ps_io::{Archive, ArchiveStore};
use ps_physics::{
    AggregateError, ArchiveSource, DiagnosticStage, FieldEngine, MeanAggregator, SourceProvider,
};
use std::path::PathBuf;
use std::time::Instant;

use crate::error::WorkflowResult;
use crate::period::Period;

/// 由配置构建输出网格
pub fn build_grid(config: &StressConfig) -> WorkflowResult<Grid> {
    Ok(Grid::from_range(
        config.grid.lat_range(),
        config.grid.lon_range(),
    )?)
}

/// 计算某日的完整字段集
///
/// 诊断字段在返回前已填好。
///
/// # Errors
///
/// 配置无效、网格无法构建或该日的数据源无法打开时返回错误。
/// 单点缺测不是错误，记为 NaN。
pub fn compute_daily_field(
    date: NaiveDate,
    config: &StressConfig,
    provider: &dyn SourceProvider,
) -> WorkflowResult<Archive> {
    config.validate()?;
    let start = Instant::now();
    let grid = build_grid(config)?;
    let samplers = provider.samplers_for(date)?;

    tracing::info!(%date, n_lat = grid.n_lat(), n_lon = grid.n_lon(), "开始逐日计算");

    let engine = FieldEngine::from_config(config);
    let mut run = engine.run(&grid, &samplers);
    DiagnosticStage::new(&config.constants).apply(&mut run.fields);

    tracing::info!(
        %date,
        solver = engine.solver_name(),
        coupled = run.stats.coupled,
        missing = run.stats.missing,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "逐日计算完成"
    );
    Ok(Archive::daily(date, run.fields))
}

/// 重算归档中的诊断字段
pub fn compute_diagnostics(mut archive: Archive, config: &StressConfig) -> Archive {
    DiagnosticStage::new(&config.constants).apply(&mut archive.fields);
    archive
}

/// 对 `dates` 求平均
///
/// 返回的归档以首个成功加载的日期为键，标签为 `label`。
/// 诊断字段是平均值，需要时由调用方调用 [`compute_diagnostics`]。
///
/// # Errors
///
/// 没有任何一天可用时返回错误。
pub fn aggregate(
    dates: &[NaiveDate],
    policy: AveragingPolicy,
    label: &str,
    source: &dyn ArchiveSource,
) -> WorkflowResult<Archive> {
    let outcome = MeanAggregator::new(policy).aggregate(dates, source)?;
    let Some(&date) = outcome.loaded.first() else {
        return Err(AggregateError::NoData { requested: dates.len() }.into());
    };
    if !outcome.skipped.is_empty() {
        tracing::warn!(
            label,
            skipped = outcome.skipped.len(),
            "部分日期未参与平均"
        );
    }
    Ok(Archive::new(date, label, outcome.fields))
}

/// 配置的输出目录对应的归档目录
pub fn archive_store(config: &StressConfig) -> ArchiveStore {
    ArchiveStore::from_config(&config.output)
}

/// 计算某日并写入 `output.directory` 下的归档目录
pub fn run_daily(
    date: NaiveDate,
    config: &StressConfig,
    provider: &dyn SourceProvider,
) -> WorkflowResult<PathBuf> {
    let archive = compute_daily_field(date, config, provider)?;
    Ok(archive_store(config).save(&archive)?)
}

/// 从 `output.directory` 读取逐日结果，生成时段平均并写回
///
/// 平均归档的日期键为时段首日，标签来自 [`Period::label`]，
/// 与同一日期的逐日归档位于不同文件。按配置决定是否重算诊断。
pub fn produce_period_mean(
    period: &Period,
    config: &StressConfig,
) -> WorkflowResult<(Archive, PathBuf)> {
    config.validate()?;
    let store = archive_store(config);
    let dates = period.dates()?;
    let label = period.label();
    tracing::info!(%period, days = dates.len(), policy = %config.averaging, "开始时段平均");

    let mut archive = aggregate(&dates, config.averaging, &label, &store)?;
    archive.date = period.first_date()?;
    if config.output.recompute_diagnostics {
        archive = compute_diagnostics(archive, config);
    }

    let path = store.save(&archive)?;
    Ok((archive, path))
}
