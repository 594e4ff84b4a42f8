// crates/ps_foundation/src/field.rs

//! 二维网格场
//!
//! 以行优先（`[lat][lon]`）存储的 `f64` 数组，形状与 [`Grid`] 一致。
//! NaN 是保留的"无数据"标记（陆地、源数据缺失或求解失败）。
//!
//! 场之间互相独立；除聚合求和外，任何操作都不得把 NaN 静默当作 0。

use serde::{Deserialize, Serialize};

use crate::error::{PsError, PsResult};
use crate::grid::Grid;

/// 二维网格场
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field2D {
    n_lat: usize,
    n_lon: usize,
    data: Vec<f64>,
}

impl Field2D {
    /// 创建全零场
    pub fn zeros(grid: &Grid) -> Self {
        Self::filled(grid, 0.0)
    }

    /// 创建全 NaN 场
    pub fn nan(grid: &Grid) -> Self {
        Self::filled(grid, f64::NAN)
    }

    /// 创建以常数填充的场
    pub fn filled(grid: &Grid, value: f64) -> Self {
        let (n_lat, n_lon) = grid.shape();
        Self {
            n_lat,
            n_lon,
            data: vec![value; n_lat * n_lon],
        }
    }

    /// 从行优先数据创建
    ///
    /// # Errors
    ///
    /// 数据长度不等于 `n_lat * n_lon` 时返回 [`PsError::SizeMismatch`]。
    pub fn from_vec(n_lat: usize, n_lon: usize, data: Vec<f64>) -> PsResult<Self> {
        PsError::check_size("field", n_lat * n_lon, data.len())?;
        Ok(Self { n_lat, n_lon, data })
    }

    /// 由网格和逐点函数构造
    pub fn from_fn(grid: &Grid, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let (n_lat, n_lon) = grid.shape();
        let mut data = Vec::with_capacity(n_lat * n_lon);
        for i in 0..n_lat {
            for j in 0..n_lon {
                data.push(f(i, j));
            }
        }
        Self { n_lat, n_lon, data }
    }

    /// 形状 `(n_lat, n_lon)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_lat, self.n_lon)
    }

    /// 是否与网格同形
    #[inline]
    pub fn matches(&self, grid: &Grid) -> bool {
        self.shape() == grid.shape()
    }

    /// 读取 `(i, j)` 处的值
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n_lon + j]
    }

    /// 写入 `(i, j)` 处的值
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n_lon + j] = value;
    }

    /// 第 `i` 行
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_lon..(i + 1) * self.n_lon]
    }

    /// 行优先数据
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// 行优先数据（可变）
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// 取出底层数据
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// 非 NaN 点数
    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// 是否全部为 NaN
    pub fn is_all_nan(&self) -> bool {
        self.data.iter().all(|v| v.is_nan())
    }

    /// 逐位相等（NaN 与 NaN 视为相等）
    pub fn bitwise_eq(&self, other: &Field2D) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// 忽略 NaN 的最小/最大值
    pub fn nan_min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::from_range((0.0, 2.0, 1.0), (0.0, 3.0, 1.0)).unwrap()
    }

    #[test]
    fn test_zeros_shape() {
        let f = Field2D::zeros(&grid());
        assert_eq!(f.shape(), (3, 4));
        assert!(f.as_slice().iter().all(|&v| v == 0.0));
        assert!(f.matches(&grid()));
    }

    #[test]
    fn test_get_set_row_major() {
        let mut f = Field2D::zeros(&grid());
        f.set(1, 2, 7.0);
        assert_eq!(f.get(1, 2), 7.0);
        assert_eq!(f.as_slice()[1 * 4 + 2], 7.0);
        assert_eq!(f.row(1), &[0.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn test_from_vec_size_check() {
        assert!(Field2D::from_vec(2, 2, vec![1.0; 4]).is_ok());
        assert!(Field2D::from_vec(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_nan_tracking() {
        let mut f = Field2D::nan(&grid());
        assert!(f.is_all_nan());
        f.set(0, 0, 1.5);
        f.set(2, 3, -2.0);
        assert_eq!(f.count_valid(), 2);
        assert_eq!(f.nan_min_max(), Some((-2.0, 1.5)));
    }

    #[test]
    fn test_bitwise_eq_treats_nan_equal() {
        let a = Field2D::from_fn(&grid(), |i, j| if i == j { f64::NAN } else { (i + j) as f64 });
        let b = a.clone();
        assert!(a.bitwise_eq(&b));
        assert_ne!(a, b);
    }
}
