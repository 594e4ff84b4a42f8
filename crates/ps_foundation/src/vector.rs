// crates/ps_foundation/src/vector.rs

//! 二维向量工具
//!
//! 风速、流速、海冰漂移与应力都用 `(纬向, 经向)` 分量表示，
//! 统一使用 [`glam::DVec2`]。缺测向量以两个分量均为 NaN 表示。

use glam::DVec2;

/// 二维向量 `(纬向, 经向)`
pub type Vector2 = DVec2;

/// 缺测向量
pub const MISSING_VECTOR: Vector2 = DVec2::NAN;

/// 任一分量为 NaN
#[inline]
pub fn has_missing(v: Vector2) -> bool {
    v.x.is_nan() || v.y.is_nan()
}

/// 逆时针旋转 `deg` 度
///
/// ```text
/// R(θ) = [cos θ  -sin θ]
///        [sin θ   cos θ]
/// ```
#[inline]
pub fn rotate_deg(v: Vector2, deg: f64) -> Vector2 {
    DVec2::from_angle(deg.to_radians()).rotate(v)
}

/// 二次拖曳形式 `coeff · |v| · v`
#[inline]
pub fn quadratic_drag(coeff: f64, v: Vector2) -> Vector2 {
    coeff * v.length() * v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_minus_45() {
        let r = rotate_deg(DVec2::new(1.0, 0.0), -45.0);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((r.x - s).abs() < 1e-15);
        assert!((r.y + s).abs() < 1e-15);
    }

    #[test]
    fn test_rotate_preserves_norm() {
        let v = DVec2::new(3.0, -4.0);
        assert!((rotate_deg(v, 45.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_vector() {
        assert!(has_missing(MISSING_VECTOR));
        assert!(has_missing(DVec2::new(1.0, f64::NAN)));
        assert!(!has_missing(DVec2::ZERO));
    }

    #[test]
    fn test_quadratic_drag() {
        let tau = quadratic_drag(2.0, DVec2::new(3.0, 4.0));
        assert_eq!(tau, DVec2::new(30.0, 40.0));
    }
}
