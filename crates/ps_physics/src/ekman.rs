// crates/ps_physics/src/ekman.rs

//! Ekman 速度闭合
//!
//! 给定表面应力 τ 和科氏参数 f，求 Ekman 速度：
//!
//! ```text
//! surface:      u_E = √2 / (f ρ_0 D_e) · R(-45°) τ
//! vertical_avg: u_E = ( τ_y / (f ρ_0 D_e), -τ_x / (f ρ_0 D_e) )
//! ```
//!
//! f = 0（赤道）时结果为 NaN 或无穷，由调用方按缺测处理。

use glam::DVec2;
use ps_config::{EkmanVelocityType, PhysicalConstants};
use ps_foundation::vector::{rotate_deg, Vector2};

/// Ekman 速度闭合
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EkmanClosure {
    kind: EkmanVelocityType,
    rho_0: f64,
    ekman_depth: f64,
}

impl EkmanClosure {
    /// 创建闭合
    pub fn new(kind: EkmanVelocityType, constants: &PhysicalConstants) -> Self {
        Self {
            kind,
            rho_0: constants.rho_0,
            ekman_depth: constants.ekman_depth,
        }
    }

    /// 闭合形式
    pub fn kind(&self) -> EkmanVelocityType {
        self.kind
    }

    /// 由应力 `tau` 计算 Ekman 速度
    #[inline]
    pub fn velocity(&self, f: f64, tau: Vector2) -> Vector2 {
        let denom = f * self.rho_0 * self.ekman_depth;
        match self.kind {
            EkmanVelocityType::Surface => {
                (std::f64::consts::SQRT_2 / denom) * rotate_deg(tau, -45.0)
            }
            EkmanVelocityType::VerticalAvg => DVec2::new(tau.y / denom, -tau.x / denom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: f64 = -1.3e-4;

    fn closure(kind: EkmanVelocityType) -> EkmanClosure {
        EkmanClosure::new(kind, &PhysicalConstants::default())
    }

    #[test]
    fn test_vertical_avg() {
        let e = closure(EkmanVelocityType::VerticalAvg);
        let tau = DVec2::new(0.1, 0.05);
        let u = e.velocity(F, tau);
        let denom = F * 1025.0 * 20.0;
        assert!((u.x - 0.05 / denom).abs() < 1e-15);
        assert!((u.y + 0.1 / denom).abs() < 1e-15);
        // 南半球 Ekman 输运在应力左侧
        assert!(u.y > 0.0);
    }

    #[test]
    fn test_surface_magnitude() {
        let e = closure(EkmanVelocityType::Surface);
        let tau = DVec2::new(0.1, 0.0);
        let u = e.velocity(F, tau);
        let expected = std::f64::consts::SQRT_2 * 0.1 / (F * 1025.0 * 20.0).abs();
        assert!((u.length() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_stress() {
        for kind in [EkmanVelocityType::Surface, EkmanVelocityType::VerticalAvg] {
            assert_eq!(closure(kind).velocity(F, DVec2::ZERO), DVec2::ZERO);
        }
    }

    #[test]
    fn test_equator_not_finite() {
        let e = closure(EkmanVelocityType::VerticalAvg);
        let u = e.velocity(0.0, DVec2::new(0.1, 0.0));
        assert!(!u.is_finite());
    }
}
