// crates/ps_workflow/src/period.rs

//! 平均时段
//!
//! 把"某月""某季""多年气候态"等时段展开为日期列表，并给出归档标签。
//!
//! | 时段 | 标签示例 |
//! |------|----------|
//! | 单日 | `20150204_avg` |
//! | 月 | `Feb2015_avg` |
//! | 季 | `JAS2015_avg` |
//! | 年 | `2015_avg` |
//! | 月气候态 | `Feb_1992-2015_avg` |
//! | 季气候态 | `JAS_1992-2015_avg` |
//! | 气候态 | `1992-2015_avg` |
//!
//! `DJF` 季跨年：`DJF 2015` 为 2014 年 12 月至 2015 年 2 月。
//!
//! 标签不会等于逐日归档的 `daily`，平均结果不会覆盖逐日归档。

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::{WorkflowError, WorkflowResult};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 三个月的季节
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// 12-2 月（跨年）
    DJF,
    /// 3-5 月
    MAM,
    /// 6-8 月
    JJA,
    /// 9-11 月
    SON,
    /// 1-3 月
    JFM,
    /// 4-6 月
    AMJ,
    /// 7-9 月
    JAS,
    /// 10-12 月
    OND,
}

impl Season {
    /// 全部季节
    pub const ALL: [Season; 8] = [
        Self::DJF,
        Self::MAM,
        Self::JJA,
        Self::SON,
        Self::JFM,
        Self::AMJ,
        Self::JAS,
        Self::OND,
    ];

    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::DJF => "DJF",
            Self::MAM => "MAM",
            Self::JJA => "JJA",
            Self::SON => "SON",
            Self::JFM => "JFM",
            Self::AMJ => "AMJ",
            Self::JAS => "JAS",
            Self::OND => "OND",
        }
    }

    /// 起始月份
    pub fn start_month(&self) -> u32 {
        match self {
            Self::DJF => 12,
            Self::MAM => 3,
            Self::JJA => 6,
            Self::SON => 9,
            Self::JFM => 1,
            Self::AMJ => 4,
            Self::JAS => 7,
            Self::OND => 10,
        }
    }

    /// `year` 年该季节包含的 `(年, 月)`
    pub fn months(&self, year: i32) -> [(i32, u32); 3] {
        let start = self.start_month();
        if start == 12 {
            [(year - 1, 12), (year, 1), (year, 2)]
        } else {
            [(year, start), (year, start + 1), (year, start + 2)]
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|season| season.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WorkflowError::invalid_period(format!("未知季节 '{}'", s)))
    }
}

/// 平均时段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// 单日
    Day(NaiveDate),
    /// 某年某月
    Month {
        /// 年
        year: i32,
        /// 月 (1-12)
        month: u32,
    },
    /// 某年某季
    Season {
        /// 年（DJF 为结束年份）
        year: i32,
        /// 季节
        season: Season,
    },
    /// 全年
    Year(i32),
    /// 多年同月
    MonthlyClimatology {
        /// 月 (1-12)
        month: u32,
        /// 起始年
        start_year: i32,
        /// 结束年（含）
        end_year: i32,
    },
    /// 多年同季
    SeasonalClimatology {
        /// 季节
        season: Season,
        /// 起始年
        start_year: i32,
        /// 结束年（含）
        end_year: i32,
    },
    /// 多年全部日期
    Climatology {
        /// 起始年
        start_year: i32,
        /// 结束年（含）
        end_year: i32,
    },
}

impl Period {
    /// 展开为按时间排序的日期列表
    ///
    /// # Errors
    ///
    /// 月份越界或起止年份颠倒时返回 [`WorkflowError::InvalidPeriod`]。
    pub fn dates(&self) -> WorkflowResult<Vec<NaiveDate>> {
        match *self {
            Self::Day(date) => Ok(vec![date]),
            Self::Month { year, month } => month_days(year, month),
            Self::Season { year, season } => season_days(year, season),
            Self::Year(year) => {
                let first = ymd(year, 1, 1)?;
                let last = ymd(year, 12, 31)?;
                Ok(first.iter_days().take_while(|d| *d <= last).collect())
            }
            Self::MonthlyClimatology {
                month,
                start_year,
                end_year,
            } => {
                check_years(start_year, end_year)?;
                let mut dates = Vec::new();
                for year in start_year..=end_year {
                    dates.extend(month_days(year, month)?);
                }
                Ok(dates)
            }
            Self::SeasonalClimatology {
                season,
                start_year,
                end_year,
            } => {
                check_years(start_year, end_year)?;
                let mut dates = Vec::new();
                for year in start_year..=end_year {
                    dates.extend(season_days(year, season)?);
                }
                Ok(dates)
            }
            Self::Climatology {
                start_year,
                end_year,
            } => {
                check_years(start_year, end_year)?;
                let first = ymd(start_year, 1, 1)?;
                let last = ymd(end_year, 12, 31)?;
                Ok(first.iter_days().take_while(|d| *d <= last).collect())
            }
        }
    }

    /// 时段首日（平均归档的日期键）
    pub fn first_date(&self) -> WorkflowResult<NaiveDate> {
        self.dates()?
            .first()
            .copied()
            .ok_or_else(|| WorkflowError::invalid_period(format!("{} 不包含任何日期", self.label())))
    }

    /// 归档标签
    pub fn label(&self) -> String {
        match *self {
            Self::Day(date) => format!("{}_avg", date.format("%Y%m%d")),
            Self::Month { year, month } => format!("{}{}_avg", month_abbr(month), year),
            Self::Season { year, season } => format!("{}{}_avg", season, year),
            Self::Year(year) => format!("{}_avg", year),
            Self::MonthlyClimatology {
                month,
                start_year,
                end_year,
            } => format!("{}_{}-{}_avg", month_abbr(month), start_year, end_year),
            Self::SeasonalClimatology {
                season,
                start_year,
                end_year,
            } => format!("{}_{}-{}_avg", season, start_year, end_year),
            Self::Climatology {
                start_year,
                end_year,
            } => format!("{}-{}_avg", start_year, end_year),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(date) => write!(f, "{}", date),
            _ => f.write_str(&self.label()),
        }
    }
}

fn month_abbr(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBR.get(i as usize))
        .copied()
        .unwrap_or("???")
}

fn ymd(year: i32, month: u32, day: u32) -> WorkflowResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| WorkflowError::invalid_period(format!("无效日期 {}-{}-{}", year, month, day)))
}

fn check_years(start_year: i32, end_year: i32) -> WorkflowResult<()> {
    if start_year > end_year {
        return Err(WorkflowError::invalid_period(format!(
            "起始年 {} 晚于结束年 {}",
            start_year, end_year
        )));
    }
    Ok(())
}

/// 某月全部日期
fn month_days(year: i32, month: u32) -> WorkflowResult<Vec<NaiveDate>> {
    let first = ymd(year, month, 1)?;
    Ok(first.iter_days().take_while(|d| d.month() == month).collect())
}

fn season_days(year: i32, season: Season) -> WorkflowResult<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(92);
    for (y, m) in season.months(year) {
        dates.extend(month_days(y, m)?);
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_leap_year() {
        let dates = Period::Month { year: 2016, month: 2 }.dates().unwrap();
        assert_eq!(dates.len(), 29);
        assert_eq!(dates[0], d(2016, 2, 1));
        assert_eq!(dates[28], d(2016, 2, 29));
        assert_eq!(Period::Month { year: 2015, month: 2 }.dates().unwrap().len(), 28);
    }

    #[test]
    fn test_djf_spans_previous_december() {
        let p = Period::Season { year: 2015, season: Season::DJF };
        let dates = p.dates().unwrap();
        assert_eq!(dates.len(), 31 + 31 + 28);
        assert_eq!(dates[0], d(2014, 12, 1));
        assert_eq!(*dates.last().unwrap(), d(2015, 2, 28));
        assert_eq!(p.first_date().unwrap(), d(2014, 12, 1));
    }

    #[test]
    fn test_season_jas() {
        let dates = Period::Season { year: 2010, season: Season::JAS }.dates().unwrap();
        assert_eq!(dates.len(), 31 + 31 + 30);
    }

    #[test]
    fn test_year_and_climatology() {
        assert_eq!(Period::Year(2016).dates().unwrap().len(), 366);
        let c = Period::Climatology { start_year: 2014, end_year: 2016 };
        assert_eq!(c.dates().unwrap().len(), 365 + 365 + 366);
    }

    #[test]
    fn test_climatologies() {
        let m = Period::MonthlyClimatology { month: 2, start_year: 2015, end_year: 2016 };
        assert_eq!(m.dates().unwrap().len(), 28 + 29);

        let s = Period::SeasonalClimatology {
            season: Season::DJF,
            start_year: 2015,
            end_year: 2016,
        };
        let dates = s.dates().unwrap();
        assert_eq!(dates.len(), (31 + 31 + 28) + (31 + 31 + 29));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Period::Day(d(2015, 2, 4)).label(), "20150204_avg");
        assert_eq!(Period::Month { year: 2015, month: 2 }.label(), "Feb2015_avg");
        assert_eq!(Period::Season { year: 2015, season: Season::JAS }.label(), "JAS2015_avg");
        assert_eq!(Period::Year(2015).label(), "2015_avg");
        assert_eq!(
            Period::MonthlyClimatology { month: 9, start_year: 1992, end_year: 2015 }.label(),
            "Sep_1992-2015_avg"
        );
        assert_eq!(
            Period::SeasonalClimatology {
                season: Season::JAS,
                start_year: 1992,
                end_year: 2015
            }
            .label(),
            "JAS_1992-2015_avg"
        );
        assert_eq!(
            Period::Climatology { start_year: 1992, end_year: 2015 }.label(),
            "1992-2015_avg"
        );
    }

    #[test]
    fn test_invalid_periods() {
        assert!(Period::Month { year: 2015, month: 13 }.dates().is_err());
        assert!(Period::Climatology { start_year: 2016, end_year: 2015 }.dates().is_err());
        assert!("XYZ".parse::<Season>().is_err());
        assert_eq!("jas".parse::<Season>().unwrap(), Season::JAS);
    }
}
