// crates/ps_foundation/src/geo.rs

//! 球面几何
//!
//! - Haversine 大圆距离（经纬度，度）
//! - 科氏参数 `f = 2Ω sin(φ)`
//!
//! 网格点之间的实际距离随纬度变化，有限差分必须使用这里的大圆距离，
//! 而不是固定的网格步长。

/// 地球平均半径 (米)
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Haversine 公式计算大圆距离
///
/// # Arguments
/// - `lat1`, `lon1`: 第一个点（度）
/// - `lat2`, `lon2`: 第二个点（度）
/// - `radius`: 球体半径（米）
///
/// # Returns
/// 大圆距离（米）
#[must_use]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// 科氏参数 `f = 2Ω sin(lat)` [1/s]
///
/// # Arguments
/// - `lat_deg`: 纬度（度）
/// - `omega`: 地球自转角速度 [rad/s]
#[inline]
#[must_use]
pub fn coriolis_parameter(lat_deg: f64, omega: f64) -> f64 {
    2.0 * omega * lat_deg.to_radians().sin()
}
