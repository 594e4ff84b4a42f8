// crates/ps_config/src/options.rs

//! 运行选项枚举
//!
//! 字符串形式与配置文件一致（snake_case），未知值在解析时立即报错。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Ekman 速度闭合形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EkmanVelocityType {
    /// 表层 Ekman 速度：`√2/(f ρ_0 D_e) · R(-45°) τ`
    Surface,
    /// 垂向平均 Ekman 速度：`(τ_y, -τ_x) / (f ρ_0 D_e)`
    #[default]
    VerticalAvg,
}

impl EkmanVelocityType {
    /// 配置名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::VerticalAvg => "vertical_avg",
        }
    }
}

impl fmt::Display for EkmanVelocityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EkmanVelocityType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "surface" => Ok(Self::Surface),
            "vertical_avg" => Ok(Self::VerticalAvg),
            _ => Err(ConfigError::invalid(
                "u_ekman_type",
                s,
                "期望 'surface' 或 'vertical_avg'",
            )),
        }
    }
}

/// 时间平均的缺测处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AveragingPolicy {
    /// 只接受全部日期都有数据的格点，任一天 NaN 则结果为 NaN
    FullDataOnly,
    /// 逐格点按有效天数平均，NaN 不计入分子与分母
    #[default]
    PartialDataOk,
}

impl AveragingPolicy {
    /// 配置名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullDataOnly => "full_data_only",
            Self::PartialDataOk => "partial_data_ok",
        }
    }
}

impl fmt::Display for AveragingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AveragingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_data_only" => Ok(Self::FullDataOnly),
            "partial_data_ok" => Ok(Self::PartialDataOk),
            _ => Err(ConfigError::invalid(
                "averaging",
                s,
                "期望 'full_data_only' 或 'partial_data_ok'",
            )),
        }
    }
}

/// 场引擎的并行策略
///
/// 逐点计算之间没有依赖，并行与串行结果完全一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParallelStrategy {
    /// 串行逐行
    Sequential,
    /// 按纬度行并行
    Rows,
    /// 根据网格规模自动选择
    #[default]
    Auto,
}
