// crates/ps_physics/src/error.rs

//! 物理层错误类型
//!
//! 逐点计算本身不产生错误：缺测以 NaN 传播，求解失败以
//! [`SolveStatus`](crate::solver::SolveStatus) 报告。这里只定义
//! 跨越外部接口（数据源、归档源）和聚合过程的错误。

use chrono::NaiveDate;
use ps_foundation::PsError;

/// 外部数据源错误
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 指定日期没有数据
    #[error("{date} 没有可用数据")]
    NotFound {
        /// 日期
        date: NaiveDate,
    },

    /// 数据存在但无法读取
    #[error("{date} 的数据无法读取: {reason}")]
    Unreadable {
        /// 日期
        date: NaiveDate,
        /// 原因
        reason: String,
    },
}

impl SourceError {
    /// 构造读取失败错误
    pub fn unreadable(date: NaiveDate, reason: impl ToString) -> Self {
        Self::Unreadable {
            date,
            reason: reason.to_string(),
        }
    }

    /// 出错的日期
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::NotFound { date } | Self::Unreadable { date, .. } => *date,
        }
    }
}

/// 时间平均错误
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// 没有任何一天的数据可用
    #[error("请求的 {requested} 天中没有可加载的数据")]
    NoData {
        /// 请求的天数
        requested: usize,
    },

    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] PsError),
}

/// 物理层结果类型
pub type AggregateResult<T> = Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_date() {
        let date = NaiveDate::from_ymd_opt(2015, 2, 1).unwrap();
        let err = SourceError::unreadable(date, "变量 tau_x 缺失");
        assert_eq!(err.date(), date);
        assert!(err.to_string().contains("2015-02-01"));
    }

    #[test]
    fn test_no_data_display() {
        let err = AggregateError::NoData { requested: 28 };
        assert!(err.to_string().contains("28"));
    }
}
