// crates/ps_foundation/src/lib.rs

//! PolarStress Foundation Layer
//!
//! 基础层，提供整个工作区共享的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`grid`]: 经纬度网格（两条严格单调的坐标轴）
//! - [`field`]: 与网格同形的二维场，NaN 表示无数据
//! - [`vector`]: 二维向量（纬向, 经向）及旋转工具
//! - [`geo`]: 球面几何（Haversine 距离、科氏参数）
//!
//! # 示例
//!
//! ```
//! use ps_foundation::{Grid, Field2D};
//!
//! let grid = Grid::from_range((-80.0, -70.0, 5.0), (0.0, 10.0, 5.0)).unwrap();
//! let mut field = Field2D::zeros(&grid);
//! field.set(1, 2, f64::NAN);
//! assert_eq!(field.count_valid(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod field;
pub mod geo;
pub mod grid;
pub mod vector;

// 重导出常用类型
pub use error::{PsError, PsResult};
pub use field::Field2D;
pub use grid::Grid;
pub use vector::Vector2;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{PsError, PsResult};
    pub use crate::field::Field2D;
    pub use crate::geo::{coriolis_parameter, haversine_distance, EARTH_MEAN_RADIUS};
    pub use crate::grid::Grid;
    pub use crate::vector::{has_missing, rotate_deg, Vector2, MISSING_VECTOR};
}
