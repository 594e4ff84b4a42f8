// crates/ps_foundation/src/grid.rs

//! 经纬度网格
//!
//! 网格由两条坐标轴组成：纬度轴（行）与经度轴（列），共 `n_lat × n_lon` 个点。
//! 网格在一次计算中只构造一次，之后不可变；所有场共享同一形状。
//!
//! # 不变量
//!
//! - 两条坐标轴非空、有限
//! - 两条坐标轴严格单调（递增或递减）
//!
//! # 约定
//!
//! 纬度取 -90（南极）到 +90（北极），经度取 -180 到 +180。
//! 由范围构造时保留 +180 经线（与 -180 重合），便于首尾扇区的绘制。

use serde::{Deserialize, Serialize};

use crate::error::{PsError, PsResult};

/// 经纬度网格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl Grid {
    /// 从两条坐标轴创建网格
    ///
    /// # Errors
    ///
    /// 坐标轴为空、含非有限值或不严格单调时返回 [`PsError::InvalidGrid`]。
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> PsResult<Self> {
        validate_axis("lat", &lats)?;
        validate_axis("lon", &lons)?;
        Ok(Self { lats, lons })
    }

    /// 由 `(min, max, step)` 范围创建等间距网格（含两端点）
    ///
    /// 点数为 `round((max - min) / step) + 1`，坐标按 linspace 方式生成，
    /// 因此最后一个点精确等于 `max`。
    pub fn from_range(lat: (f64, f64, f64), lon: (f64, f64, f64)) -> PsResult<Self> {
        let lats = linspace_axis("lat", lat)?;
        let lons = linspace_axis("lon", lon)?;
        Self::new(lats, lons)
    }

    /// 纬度轴
    #[inline]
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// 经度轴
    #[inline]
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// 纬度点数
    #[inline]
    pub fn n_lat(&self) -> usize {
        self.lats.len()
    }

    /// 经度点数
    #[inline]
    pub fn n_lon(&self) -> usize {
        self.lons.len()
    }

    /// 网格形状 `(n_lat, n_lon)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    /// 网格点总数
    #[inline]
    pub fn n_points(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    /// 第 `i` 个纬度 [度]
    #[inline]
    pub fn lat(&self, i: usize) -> f64 {
        self.lats[i]
    }

    /// 第 `j` 个经度 [度]
    #[inline]
    pub fn lon(&self, j: usize) -> f64 {
        self.lons[j]
    }

    /// 是否为边界环上的点（首/末纬度行或首/末经度列）
    #[inline]
    pub fn is_boundary(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 >= self.n_lat() || j + 1 >= self.n_lon()
    }

    /// 按行优先顺序遍历 `(i, j, lat, lon)`
    pub fn points(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.lats.iter().enumerate().flat_map(move |(i, &lat)| {
            self.lons
                .iter()
                .enumerate()
                .map(move |(j, &lon)| (i, j, lat, lon))
        })
    }

    /// 与另一网格坐标是否逐位相同
    pub fn same_axes(&self, other: &Grid) -> bool {
        self.shape() == other.shape()
            && self
                .lats
                .iter()
                .zip(&other.lats)
                .all(|(a, b)| a.to_bits() == b.to_bits())
            && self
                .lons
                .iter()
                .zip(&other.lons)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

fn validate_axis(name: &str, axis: &[f64]) -> PsResult<()> {
    if axis.is_empty() {
        return Err(PsError::invalid_grid(format!("{name} 坐标轴为空")));
    }
    if let Some(v) = axis.iter().find(|v| !v.is_finite()) {
        return Err(PsError::invalid_grid(format!("{name} 坐标轴含非有限值: {v}")));
    }
    if axis.len() > 1 {
        let increasing = axis.windows(2).all(|w| w[1] > w[0]);
        let decreasing = axis.windows(2).all(|w| w[1] < w[0]);
        if !increasing && !decreasing {
            return Err(PsError::invalid_grid(format!("{name} 坐标轴不是严格单调的")));
        }
    }
    Ok(())
}

fn linspace_axis(name: &str, (min, max, step): (f64, f64, f64)) -> PsResult<Vec<f64>> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(PsError::invalid_grid(format!("{name} 步长必须为正: {step}")));
    }
    if !(max >= min) {
        return Err(PsError::invalid_grid(format!(
            "{name} 范围无效: min={min}, max={max}"
        )));
    }

    let n = ((max - min) / step).round() as usize + 1;
    if n == 1 {
        return Ok(vec![min]);
    }

    let span = max - min;
    let denom = (n - 1) as f64;
    Ok((0..n)
        .map(|k| if k + 1 == n { max } else { min + span * k as f64 / denom })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_range_inclusive() {
        let grid = Grid::from_range((-80.0, -40.0, 0.5), (-180.0, 180.0, 0.5)).unwrap();
        assert_eq!(grid.n_lat(), 81);
        assert_eq!(grid.n_lon(), 721);
        assert_eq!(grid.lat(0), -80.0);
        assert_eq!(grid.lat(80), -40.0);
        assert_eq!(grid.lon(720), 180.0);
        assert!((grid.lat(1) - -79.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_axis() {
        let grid = Grid::from_range((10.0, 10.0, 1.0), (0.0, 2.0, 1.0)).unwrap();
        assert_eq!(grid.shape(), (1, 3));
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let err = Grid::new(vec![0.0, 1.0, 1.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, PsError::InvalidGrid { .. }));
        assert!(Grid::new(vec![0.0, 2.0, 1.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_accepts_decreasing_axis() {
        let grid = Grid::new(vec![1.0, 0.0, -1.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(grid.shape(), (3, 2));
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert!(Grid::new(vec![], vec![0.0]).is_err());
        assert!(Grid::new(vec![0.0, f64::NAN], vec![0.0]).is_err());
        assert!(Grid::from_range((0.0, 1.0, 0.0), (0.0, 1.0, 1.0)).is_err());
        assert!(Grid::from_range((1.0, 0.0, 0.5), (0.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_boundary_ring() {
        let grid = Grid::from_range((0.0, 2.0, 1.0), (0.0, 3.0, 1.0)).unwrap();
        assert!(grid.is_boundary(0, 1));
        assert!(grid.is_boundary(2, 1));
        assert!(grid.is_boundary(1, 0));
        assert!(grid.is_boundary(1, 3));
        assert!(!grid.is_boundary(1, 1));
        assert!(!grid.is_boundary(1, 2));
    }

    #[test]
    fn test_points_row_major() {
        let grid = Grid::new(vec![-1.0, 0.0], vec![10.0, 20.0, 30.0]).unwrap();
        let pts: Vec<_> = grid.points().collect();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], (0, 0, -1.0, 10.0));
        assert_eq!(pts[4], (1, 1, 0.0, 20.0));
    }

    #[test]
    fn test_same_axes() {
        let a = Grid::from_range((0.0, 1.0, 0.5), (0.0, 1.0, 0.5)).unwrap();
        let b = a.clone();
        let c = Grid::from_range((0.0, 1.0, 0.25), (0.0, 1.0, 0.5)).unwrap();
        assert!(a.same_axes(&b));
        assert!(!a.same_axes(&c));
    }
}
