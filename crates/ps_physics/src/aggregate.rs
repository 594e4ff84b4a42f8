// crates/ps_physics/src/aggregate.rs

//! 时间平均
//!
//! 把若干天的归档字段集合并为一个平均字段集。每个字段、每个格点维护
//! 一对累加器 `(value_sum, valid_count)`，由 [`AveragingStrategy`]
//! 决定如何累加与收尾。所有字段走同一套逻辑，没有逐字段的特殊处理。
//!
//! | 策略 | 累加 | 结果 |
//! |------|------|------|
//! | `full_data_only` | 原值求和（NaN 传播），每个成功加载的日期计数 | `sum / 加载天数` |
//! | `partial_data_ok` | 仅非 NaN 值计入和与计数 | `sum / count`，`0/0` 为 NaN |
//!
//! 加载失败或网格不一致的归档会被跳过并记录警告，不计入分母。
//! 全部加载失败时返回 [`AggregateError::NoData`]。

use chrono::NaiveDate;
use ps_config::AveragingPolicy;
use ps_foundation::{Field2D, Grid};
use rayon::prelude::*;

use crate::error::{AggregateError, AggregateResult, SourceError};
use crate::fields::{FieldName, FieldSet};

// ============================================================
// 归档源
// ============================================================

/// 按日期读取已归档的字段集
pub trait ArchiveSource: Sync {
    /// 读取 `date` 当天的字段集
    fn load_fields(&self, date: NaiveDate) -> Result<FieldSet, SourceError>;
}

// ============================================================
// 累加器与策略
// ============================================================

/// 单个字段的逐点累加器
#[derive(Debug, Clone, PartialEq)]
pub struct MeanAccumulator {
    value_sum: Vec<f64>,
    valid_count: Vec<u32>,
}

impl MeanAccumulator {
    /// 创建 `n` 个点的零累加器
    pub fn new(n: usize) -> Self {
        Self {
            value_sum: vec![0.0; n],
            valid_count: vec![0; n],
        }
    }

    /// 累加和
    pub fn value_sum(&self) -> &[f64] {
        &self.value_sum
    }

    /// 有效计数
    pub fn valid_count(&self) -> &[u32] {
        &self.valid_count
    }

    /// 逐点 `sum / count`
    pub fn mean(&self) -> Vec<f64> {
        self.value_sum
            .iter()
            .zip(&self.valid_count)
            .map(|(&s, &c)| s / c as f64)
            .collect()
    }
}

/// 平均策略
pub trait AveragingStrategy: Send + Sync {
    /// 对应的配置项
    fn policy(&self) -> AveragingPolicy;

    /// 把一天的字段值并入累加器
    fn accumulate(&self, acc: &mut MeanAccumulator, values: &[f64]);

    /// 求平均
    fn finish(&self, acc: &MeanAccumulator) -> Vec<f64> {
        acc.mean()
    }
}

/// 只接受全部日期都有数据的格点
#[derive(Debug, Clone, Copy, Default)]
pub struct FullDataOnly;

impl AveragingStrategy for FullDataOnly {
    fn policy(&self) -> AveragingPolicy {
        AveragingPolicy::FullDataOnly
    }

    fn accumulate(&self, acc: &mut MeanAccumulator, values: &[f64]) {
        for ((sum, count), &v) in acc.value_sum.iter_mut().zip(&mut acc.valid_count).zip(values) {
            *sum += v;
            *count += 1;
        }
    }
}

/// 逐格点按有效天数平均
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialDataOk;

impl AveragingStrategy for PartialDataOk {
    fn policy(&self) -> AveragingPolicy {
        AveragingPolicy::PartialDataOk
    }

    fn accumulate(&self, acc: &mut MeanAccumulator, values: &[f64]) {
        for ((sum, count), &v) in acc.value_sum.iter_mut().zip(&mut acc.valid_count).zip(values) {
            if !v.is_nan() {
                *sum += v;
                *count += 1;
            }
        }
    }
}

/// 由配置项创建策略
pub fn strategy_for(policy: AveragingPolicy) -> Box<dyn AveragingStrategy> {
    match policy {
        AveragingPolicy::FullDataOnly => Box::new(FullDataOnly),
        AveragingPolicy::PartialDataOk => Box::new(PartialDataOk),
    }
}

// ============================================================
// 聚合器
// ============================================================

/// 平均结果
#[derive(Debug, Clone)]
pub struct MeanOutcome {
    /// 平均字段集
    pub fields: FieldSet,
    /// 成功加载的日期
    pub loaded: Vec<NaiveDate>,
    /// 跳过的日期
    pub skipped: Vec<NaiveDate>,
}

/// 时间平均聚合器
pub struct MeanAggregator {
    strategy: Box<dyn AveragingStrategy>,
}

impl MeanAggregator {
    /// 按配置项创建
    pub fn new(policy: AveragingPolicy) -> Self {
        Self::with_strategy(strategy_for(policy))
    }

    /// 使用自定义策略
    pub fn with_strategy(strategy: Box<dyn AveragingStrategy>) -> Self {
        Self { strategy }
    }

    /// 当前策略
    pub fn policy(&self) -> AveragingPolicy {
        self.strategy.policy()
    }

    /// 对 `dates` 求平均
    ///
    /// # Errors
    ///
    /// 没有任何一天能加载时返回 [`AggregateError::NoData`]。
    pub fn aggregate(
        &self,
        dates: &[NaiveDate],
        source: &dyn ArchiveSource,
    ) -> AggregateResult<MeanOutcome> {
        let mut state: Option<(Grid, Vec<MeanAccumulator>)> = None;
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();

        for &date in dates {
            tracing::info!(%date, policy = %self.policy(), "累加");
            let fields = match source.load_fields(date) {
                Ok(fields) => fields,
                Err(e) => {
                    tracing::warn!(%date, error = %e, "无法加载，跳过");
                    skipped.push(date);
                    continue;
                }
            };

            let (grid, accumulators) = state.get_or_insert_with(|| {
                let grid = fields.grid().clone();
                let n = grid.n_points();
                (grid, (0..FieldName::COUNT).map(|_| MeanAccumulator::new(n)).collect())
            });

            if !grid.same_axes(fields.grid()) {
                tracing::warn!(
                    %date,
                    expected = ?grid.shape(),
                    actual = ?fields.grid().shape(),
                    "网格不一致，跳过"
                );
                skipped.push(date);
                continue;
            }

            let strategy = self.strategy.as_ref();
            accumulators
                .par_iter_mut()
                .zip(FieldName::ALL.par_iter())
                .for_each(|(acc, &name)| strategy.accumulate(acc, fields.get(name).as_slice()));
            loaded.push(date);
        }

        let Some((grid, accumulators)) = state else {
            return Err(AggregateError::NoData { requested: dates.len() });
        };

        let (n_lat, n_lon) = grid.shape();
        let mut named = Vec::with_capacity(FieldName::COUNT);
        for (name, acc) in FieldName::ALL.iter().copied().zip(&accumulators) {
            let field = Field2D::from_vec(n_lat, n_lon, self.strategy.finish(acc))?;
            named.push((name, field));
        }
        let fields = FieldSet::from_fields(grid, named)?;

        tracing::info!(
            requested = dates.len(),
            loaded = loaded.len(),
            skipped = skipped.len(),
            policy = %self.policy(),
            "时间平均完成"
        );

        Ok(MeanOutcome {
            fields,
            loaded,
            skipped,
        })
    }
}

impl std::fmt::Debug for MeanAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeanAggregator")
            .field("policy", &self.policy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_data_skips_nan() {
        let mut acc = MeanAccumulator::new(3);
        PartialDataOk.accumulate(&mut acc, &[1.0, f64::NAN, f64::NAN]);
        PartialDataOk.accumulate(&mut acc, &[3.0, 4.0, f64::NAN]);
        let mean = PartialDataOk.finish(&acc);
        assert_eq!(mean[0], 2.0);
        assert_eq!(mean[1], 4.0);
        assert!(mean[2].is_nan());
        assert_eq!(acc.valid_count(), &[2, 1, 0]);
    }

    #[test]
    fn test_full_data_propagates_nan() {
        let mut acc = MeanAccumulator::new(2);
        FullDataOnly.accumulate(&mut acc, &[1.0, f64::NAN]);
        FullDataOnly.accumulate(&mut acc, &[2.0, 4.0]);
        let mean = FullDataOnly.finish(&acc);
        assert_eq!(mean[0], 1.5);
        assert!(mean[1].is_nan());
    }

    #[test]
    fn test_strategy_for() {
        assert_eq!(strategy_for(AveragingPolicy::FullDataOnly).policy(), AveragingPolicy::FullDataOnly);
        assert_eq!(strategy_for(AveragingPolicy::PartialDataOk).policy(), AveragingPolicy::PartialDataOk);
    }
}
