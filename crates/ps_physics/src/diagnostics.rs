// crates/ps_physics/src/diagnostics.rs

//! 风应力旋度与 Ekman 抽吸
//!
//! 对内部格点使用二阶中心差分：
//!
//! ```text
//! ∂τy/∂x = (τy[i][j+1] - τy[i][j-1]) / dx
//! ∂τx/∂y = (τx[i+1][j] - τx[i-1][j]) / dy
//! curl   = ∂τy/∂x - ∂τx/∂y
//! w_E    = curl / (ρ_0 f)
//! ```
//!
//! `dx`、`dy` 是两侧相邻点之间的大圆距离（跨两个格距，因此分母不再除以 2）。
//! 坐标轴递减时差分方向随之取反。
//!
//! # 边界与缺测
//!
//! - 最外一圈格点（首末纬度行、首末经度列）写 NaN
//! - 中心点或四个邻点中任一应力为 NaN，四个输出都写 NaN
//!
//! 结果只取决于应力场和网格，重复计算逐位相同。

use ps_config::PhysicalConstants;
use ps_foundation::geo::{coriolis_parameter, haversine_distance};
use ps_foundation::{Field2D, Grid};

use crate::fields::{FieldName, FieldSet};

/// 诊断结果
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// 风应力旋度 [N/m³]
    pub curl: Field2D,
    /// Ekman 抽吸速度 [m/s]
    pub ekman_w: Field2D,
    /// ∂τx/∂y [N/m³]
    pub dtauxdy: Field2D,
    /// ∂τy/∂x [N/m³]
    pub dtauydx: Field2D,
}

/// 诊断统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticStats {
    /// 成功计算的内部点数
    pub computed: usize,
    /// 因缺测写 NaN 的内部点数
    pub missing: usize,
    /// 边界点数
    pub boundary: usize,
}

/// 诊断阶段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticStage {
    rho_0: f64,
    omega: f64,
    earth_radius: f64,
}

impl DiagnosticStage {
    /// 由物理常数创建
    pub fn new(constants: &PhysicalConstants) -> Self {
        Self {
            rho_0: constants.rho_0,
            omega: constants.omega,
            earth_radius: constants.earth_radius,
        }
    }

    /// 由应力分量计算诊断量
    pub fn compute(&self, grid: &Grid, tau_x: &Field2D, tau_y: &Field2D) -> (Diagnostics, DiagnosticStats) {
        let mut out = Diagnostics {
            curl: Field2D::nan(grid),
            ekman_w: Field2D::nan(grid),
            dtauxdy: Field2D::nan(grid),
            dtauydx: Field2D::nan(grid),
        };
        let (n_lat, n_lon) = grid.shape();
        let mut stats = DiagnosticStats {
            boundary: n_lat * n_lon,
            ..Default::default()
        };

        if n_lat < 3 || n_lon < 3 {
            return (out, stats);
        }
        stats.boundary = n_lat * n_lon - (n_lat - 2) * (n_lon - 2);

        for i in 1..n_lat - 1 {
            let lat = grid.lat(i);
            let (lat_s, lat_n) = (grid.lat(i - 1), grid.lat(i + 1));
            let f = coriolis_parameter(lat, self.omega);
            let sign_y = (lat_n - lat_s).signum();

            for j in 1..n_lon - 1 {
                let (lon_w, lon_e) = (grid.lon(j - 1), grid.lon(j + 1));

                let centre = [tau_x.get(i, j), tau_y.get(i, j)];
                let neighbours = [
                    tau_y.get(i, j - 1),
                    tau_y.get(i, j + 1),
                    tau_x.get(i - 1, j),
                    tau_x.get(i + 1, j),
                ];
                if centre.iter().chain(&neighbours).any(|v| v.is_nan()) {
                    stats.missing += 1;
                    continue;
                }

                let dx = haversine_distance(lat, lon_w, lat, lon_e, self.earth_radius);
                let dy = haversine_distance(lat_s, grid.lon(j), lat_n, grid.lon(j), self.earth_radius);
                let sign_x = (lon_e - lon_w).signum();

                let dtauydx = sign_x * (neighbours[1] - neighbours[0]) / dx;
                let dtauxdy = sign_y * (neighbours[3] - neighbours[2]) / dy;
                let curl = dtauydx - dtauxdy;

                out.dtauydx.set(i, j, dtauydx);
                out.dtauxdy.set(i, j, dtauxdy);
                out.curl.set(i, j, curl);
                out.ekman_w.set(i, j, curl / (self.rho_0 * f));
                stats.computed += 1;
            }
        }

        (out, stats)
    }

    /// 重新计算字段集的诊断字段
    pub fn apply(&self, fields: &mut FieldSet) -> DiagnosticStats {
        let (diag, stats) = self.compute(
            fields.grid(),
            fields.get(FieldName::TauX),
            fields.get(FieldName::TauY),
        );
        *fields.get_mut(FieldName::WindStressCurl) = diag.curl;
        *fields.get_mut(FieldName::EkmanW) = diag.ekman_w;
        *fields.get_mut(FieldName::DtauxDy) = diag.dtauxdy;
        *fields.get_mut(FieldName::DtauyDx) = diag.dtauydx;

        tracing::info!(
            computed = stats.computed,
            missing = stats.missing,
            boundary = stats.boundary,
            "风应力旋度与 Ekman 抽吸计算完成"
        );
        stats
    }
}
