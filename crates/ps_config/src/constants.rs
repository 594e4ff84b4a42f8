// crates/ps_config/src/constants.rs

//! 物理常数
//!
//! 所有常数均由外部提供（配置文件或调用方），核心计算不硬编码。
//! 默认值对应南大洋海冰区的常用取值。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 物理常数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// 空气密度 ρ_air [kg/m³]
    #[serde(default = "default_rho_air")]
    pub rho_air: f64,

    /// 海水密度 ρ_seawater [kg/m³]
    #[serde(default = "default_rho_seawater")]
    pub rho_seawater: f64,

    /// 参考密度 ρ_0 [kg/m³]，用于冰-海应力、Ekman 速度与 Ekman 抽吸
    #[serde(default = "default_rho_0")]
    pub rho_0: f64,

    /// 空气-海洋拖曳系数 C_air
    #[serde(default = "default_c_air")]
    pub c_air: f64,

    /// 冰-海洋拖曳系数 C_seawater
    #[serde(default = "default_c_seawater")]
    pub c_seawater: f64,

    /// 地球自转角速度 Ω [rad/s]
    #[serde(default = "default_omega")]
    pub omega: f64,

    /// Ekman 层深度 D_e [m]
    #[serde(default = "default_ekman_depth")]
    pub ekman_depth: f64,

    /// 地球半径 [m]，用于 Haversine 距离
    #[serde(default = "default_earth_radius")]
    pub earth_radius: f64,
}

fn default_rho_air() -> f64 { 1.25 }
fn default_rho_seawater() -> f64 { 1025.0 }
fn default_rho_0() -> f64 { 1025.0 }
fn default_c_air() -> f64 { 1.25e-3 }
fn default_c_seawater() -> f64 { 5.5e-3 }
fn default_omega() -> f64 { 7.292115e-5 }
fn default_ekman_depth() -> f64 { 20.0 }
fn default_earth_radius() -> f64 { 6_371_008.8 }

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            rho_air: default_rho_air(),
            rho_seawater: default_rho_seawater(),
            rho_0: default_rho_0(),
            c_air: default_c_air(),
            c_seawater: default_c_seawater(),
            omega: default_omega(),
            ekman_depth: default_ekman_depth(),
            earth_radius: default_earth_radius(),
        }
    }
}

impl PhysicalConstants {
    /// 空气应力系数 `ρ_air · C_air`
    #[inline]
    pub fn air_drag(&self) -> f64 {
        self.rho_air * self.c_air
    }

    /// 冰-海应力系数 `ρ_0 · C_seawater`
    #[inline]
    pub fn ice_drag(&self) -> f64 {
        self.rho_0 * self.c_seawater
    }

    /// 验证所有常数为正且有限
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = [
            ("constants.rho_air", self.rho_air),
            ("constants.rho_seawater", self.rho_seawater),
            ("constants.rho_0", self.rho_0),
            ("constants.c_air", self.c_air),
            ("constants.c_seawater", self.c_seawater),
            ("constants.omega", self.omega),
            ("constants.ekman_depth", self.ekman_depth),
            ("constants.earth_radius", self.earth_radius),
        ];
        for (key, value) in entries {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(key, value, "物理常数必须为有限正数"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let c = PhysicalConstants::default();
        assert!(c.validate().is_ok());
        assert!((c.air_drag() - 1.25 * 1.25e-3).abs() < 1e-15);
        assert!((c.ice_drag() - 1025.0 * 5.5e-3).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_positive() {
        let mut c = PhysicalConstants::default();
        c.ekman_depth = 0.0;
        assert!(c.validate().is_err());

        let mut c = PhysicalConstants::default();
        c.omega = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: PhysicalConstants = serde_json::from_str(r#"{"rho_air": 1.3}"#).unwrap();
        assert_eq!(c.rho_air, 1.3);
        assert_eq!(c.rho_0, 1025.0);
    }
}
