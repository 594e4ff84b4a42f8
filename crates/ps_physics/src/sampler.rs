// crates/ps_physics/src/sampler.rs

//! 采样接口
//!
//! 场引擎通过这里的 trait 读取四类输入：地转流速、海面风速、
//! 海冰密集度和海冰漂移速度。数据读取与空间插值由外部实现。
//!
//! # 约定
//!
//! - 对固定的 `(lat, lon)` 结果确定
//! - 超出覆盖范围或陆地返回 `None`，不报错
//! - `None` 在进入计算前统一转为 NaN 标记

use chrono::NaiveDate;
use glam::DVec2;
use ps_foundation::vector::{Vector2, MISSING_VECTOR};

use crate::error::SourceError;
use crate::solver::StressInputs;

/// 向量采样器
pub trait VectorSampler: Send + Sync {
    /// 采样 `(纬向, 经向)` 分量，缺测返回 `None`
    fn sample(&self, lat: f64, lon: f64) -> Option<Vector2>;
}

/// 标量采样器
pub trait ScalarSampler: Send + Sync {
    /// 采样标量，缺测返回 `None`
    fn sample(&self, lat: f64, lon: f64) -> Option<f64>;
}

// ============================================================
// 常数与闭包采样器
// ============================================================

/// 处处相同的向量
#[derive(Debug, Clone, Copy)]
pub struct ConstantVector(pub Vector2);

impl ConstantVector {
    /// 由分量创建
    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }
}

impl VectorSampler for ConstantVector {
    fn sample(&self, _lat: f64, _lon: f64) -> Option<Vector2> {
        Some(self.0)
    }
}

/// 处处相同的标量
#[derive(Debug, Clone, Copy)]
pub struct ConstantScalar(pub f64);

impl ScalarSampler for ConstantScalar {
    fn sample(&self, _lat: f64, _lon: f64) -> Option<f64> {
        Some(self.0)
    }
}

/// 处处缺测的向量
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingVector;

impl VectorSampler for MissingVector {
    fn sample(&self, _lat: f64, _lon: f64) -> Option<Vector2> {
        None
    }
}

/// 处处缺测的标量
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingScalar;

impl ScalarSampler for MissingScalar {
    fn sample(&self, _lat: f64, _lon: f64) -> Option<f64> {
        None
    }
}

/// 闭包向量采样器
pub struct FnVectorSampler<F>(pub F);

impl<F> VectorSampler for FnVectorSampler<F>
where
    F: Fn(f64, f64) -> Option<Vector2> + Send + Sync,
{
    fn sample(&self, lat: f64, lon: f64) -> Option<Vector2> {
        (self.0)(lat, lon)
    }
}

/// 闭包标量采样器
pub struct FnScalarSampler<F>(pub F);

impl<F> ScalarSampler for FnScalarSampler<F>
where
    F: Fn(f64, f64) -> Option<f64> + Send + Sync,
{
    fn sample(&self, lat: f64, lon: f64) -> Option<f64> {
        (self.0)(lat, lon)
    }
}

// ============================================================
// 采样器组
// ============================================================

/// 一天计算所需的四个采样器
pub struct SamplerSet {
    geostrophic: Box<dyn VectorSampler>,
    wind: Box<dyn VectorSampler>,
    ice_concentration: Box<dyn ScalarSampler>,
    ice_motion: Box<dyn VectorSampler>,
}

impl SamplerSet {
    /// 创建采样器组
    pub fn new(
        geostrophic: impl VectorSampler + 'static,
        wind: impl VectorSampler + 'static,
        ice_concentration: impl ScalarSampler + 'static,
        ice_motion: impl VectorSampler + 'static,
    ) -> Self {
        Self {
            geostrophic: Box::new(geostrophic),
            wind: Box::new(wind),
            ice_concentration: Box::new(ice_concentration),
            ice_motion: Box::new(ice_motion),
        }
    }

    /// 在 `(lat, lon)` 处采样全部输入，缺测转为 NaN
    pub fn sample(&self, lat: f64, lon: f64) -> StressInputs {
        StressInputs {
            u_geo: self.geostrophic.sample(lat, lon).unwrap_or(MISSING_VECTOR),
            u_wind: self.wind.sample(lat, lon).unwrap_or(MISSING_VECTOR),
            alpha: self.ice_concentration.sample(lat, lon).unwrap_or(f64::NAN),
            u_ice: self.ice_motion.sample(lat, lon).unwrap_or(MISSING_VECTOR),
        }
    }
}

impl std::fmt::Debug for SamplerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerSet").finish_non_exhaustive()
    }
}

/// 按日期提供采样器
///
/// 数据集的定位、读取与插值都在实现方完成。
pub trait SourceProvider: Send + Sync {
    /// 返回 `date` 当天的采样器组
    fn samplers_for(&self, date: NaiveDate) -> Result<SamplerSet, SourceError>;
}

impl<F> SourceProvider for F
where
    F: Fn(NaiveDate) -> Result<SamplerSet, SourceError> + Send + Sync,
{
    fn samplers_for(&self, date: NaiveDate) -> Result<SamplerSet, SourceError> {
        self(date)
    }
}
