// crates/ps_physics/src/fields.rs

//! 输出字段
//!
//! 一次逐日计算产生 23 个与网格同形的二维场。[`FieldName`] 是这组字段的
//! 封闭枚举，携带归档变量名、单位和长名称等元数据；[`FieldSet`] 按枚举
//! 顺序持有全部字段，在场引擎、诊断、时间平均与归档之间传递。
//!
//! 时间平均对每个字段使用完全相同的逻辑，因此新增字段只需在
//! [`FieldName::ALL`] 中登记。

use ps_foundation::{Field2D, Grid, PsError, PsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 输出字段名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldName {
    /// 空气-海洋应力 x
    TauAirX,
    /// 空气-海洋应力 y
    TauAirY,
    /// 冰-海洋应力 x
    TauIceX,
    /// 冰-海洋应力 y
    TauIceY,
    /// 总表面应力 x
    TauX,
    /// 总表面应力 y
    TauY,
    /// 海冰区表面应力 x
    TauSizX,
    /// 海冰区表面应力 y
    TauSizY,
    /// Ekman 速度 u
    EkmanU,
    /// Ekman 速度 v
    EkmanV,
    /// 海冰区 Ekman 速度 u
    EkmanSizU,
    /// 海冰区 Ekman 速度 v
    EkmanSizV,
    /// 地转流速 u（采样值）
    GeoU,
    /// 地转流速 v（采样值）
    GeoV,
    /// 风速 u（采样值）
    WindU,
    /// 风速 v（采样值）
    WindV,
    /// 海冰密集度（采样值）
    Alpha,
    /// 海冰漂移速度 u（采样值）
    IceU,
    /// 海冰漂移速度 v（采样值）
    IceV,
    /// 风应力旋度
    WindStressCurl,
    /// Ekman 抽吸速度
    EkmanW,
    /// ∂τx/∂y
    DtauxDy,
    /// ∂τy/∂x
    DtauyDx,
}

impl FieldName {
    /// 全部字段（归档顺序）
    pub const ALL: [FieldName; 23] = [
        Self::TauAirX,
        Self::TauAirY,
        Self::TauIceX,
        Self::TauIceY,
        Self::TauX,
        Self::TauY,
        Self::TauSizX,
        Self::TauSizY,
        Self::EkmanU,
        Self::EkmanV,
        Self::EkmanSizU,
        Self::EkmanSizV,
        Self::GeoU,
        Self::GeoV,
        Self::WindU,
        Self::WindV,
        Self::Alpha,
        Self::IceU,
        Self::IceV,
        Self::WindStressCurl,
        Self::EkmanW,
        Self::DtauxDy,
        Self::DtauyDx,
    ];

    /// 字段总数
    pub const COUNT: usize = Self::ALL.len();

    /// 诊断阶段写入的字段
    pub const DIAGNOSTICS: [FieldName; 4] = [
        Self::WindStressCurl,
        Self::EkmanW,
        Self::DtauxDy,
        Self::DtauyDx,
    ];

    /// 在 [`ALL`](Self::ALL) 中的位置
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 归档变量名
    pub fn archive_name(self) -> &'static str {
        match self {
            Self::TauAirX => "tau_air_x",
            Self::TauAirY => "tau_air_y",
            Self::TauIceX => "tau_ice_x",
            Self::TauIceY => "tau_ice_y",
            Self::TauX => "tau_x",
            Self::TauY => "tau_y",
            Self::TauSizX => "tau_SIZ_x",
            Self::TauSizY => "tau_SIZ_y",
            Self::EkmanU => "Ekman_u",
            Self::EkmanV => "Ekman_v",
            Self::EkmanSizU => "Ekman_SIZ_u",
            Self::EkmanSizV => "Ekman_SIZ_v",
            Self::GeoU => "geo_u",
            Self::GeoV => "geo_v",
            Self::WindU => "wind_u",
            Self::WindV => "wind_v",
            Self::Alpha => "alpha",
            Self::IceU => "ice_u",
            Self::IceV => "ice_v",
            Self::WindStressCurl => "wind_stress_curl",
            Self::EkmanW => "Ekman_w",
            Self::DtauxDy => "dtauxdy",
            Self::DtauyDx => "dtauydx",
        }
    }

    /// 由归档变量名解析
    pub fn from_archive_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.archive_name() == name)
    }

    /// 单位
    pub fn units(self) -> &'static str {
        match self {
            Self::TauAirX
            | Self::TauAirY
            | Self::TauIceX
            | Self::TauIceY
            | Self::TauX
            | Self::TauY
            | Self::TauSizX
            | Self::TauSizY => "N/m^2",
            Self::EkmanU
            | Self::EkmanV
            | Self::EkmanSizU
            | Self::EkmanSizV
            | Self::GeoU
            | Self::GeoV
            | Self::WindU
            | Self::WindV
            | Self::IceU
            | Self::IceV
            | Self::EkmanW => "m/s",
            Self::Alpha => "fractional",
            Self::WindStressCurl | Self::DtauxDy | Self::DtauyDx => "N/m^3",
        }
    }

    /// 长名称
    pub fn long_name(self) -> &'static str {
        match self {
            Self::TauAirX => "air-ocean stress, zonal component",
            Self::TauAirY => "air-ocean stress, meridional component",
            Self::TauIceX => "ice-ocean stress, zonal component",
            Self::TauIceY => "ice-ocean stress, meridional component",
            Self::TauX => "surface stress, zonal component",
            Self::TauY => "surface stress, meridional component",
            Self::TauSizX => "surface stress in the sea ice zone, zonal component",
            Self::TauSizY => "surface stress in the sea ice zone, meridional component",
            Self::EkmanU => "Ekman transport velocity, zonal component",
            Self::EkmanV => "Ekman transport velocity, meridional component",
            Self::EkmanSizU => "Ekman transport velocity in the sea ice zone, zonal component",
            Self::EkmanSizV => "Ekman transport velocity in the sea ice zone, meridional component",
            Self::GeoU => "mean geostrophic velocity, zonal component",
            Self::GeoV => "mean geostrophic velocity, meridional component",
            Self::WindU => "surface wind velocity, zonal component",
            Self::WindV => "surface wind velocity, meridional component",
            Self::Alpha => "sea ice concentration",
            Self::IceU => "sea ice drift velocity, zonal component",
            Self::IceV => "sea ice drift velocity, meridional component",
            Self::WindStressCurl => "wind stress curl",
            Self::EkmanW => "Ekman pumping velocity",
            Self::DtauxDy => "meridional derivative of the zonal stress",
            Self::DtauyDx => "zonal derivative of the meridional stress",
        }
    }

    /// 是否由诊断阶段计算
    pub fn is_diagnostic(self) -> bool {
        Self::DIAGNOSTICS.contains(&self)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.archive_name())
    }
}

// ============================================================
// 字段集
// ============================================================

/// 网格与全部输出字段
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    grid: Grid,
    fields: Vec<Field2D>,
}

impl FieldSet {
    /// 创建全零字段集
    pub fn zeros(grid: Grid) -> Self {
        let fields = (0..FieldName::COUNT).map(|_| Field2D::zeros(&grid)).collect();
        Self { grid, fields }
    }

    /// 创建全 NaN 字段集
    pub fn nan(grid: Grid) -> Self {
        let fields = (0..FieldName::COUNT).map(|_| Field2D::nan(&grid)).collect();
        Self { grid, fields }
    }

    /// 由命名字段构造，必须恰好覆盖全部字段
    ///
    /// # Errors
    ///
    /// 字段形状与网格不一致、重复或缺少字段时返回错误。
    pub fn from_fields(
        grid: Grid,
        named: impl IntoIterator<Item = (FieldName, Field2D)>,
    ) -> PsResult<Self> {
        let mut slots: Vec<Option<Field2D>> = vec![None; FieldName::COUNT];
        for (name, field) in named {
            if !field.matches(&grid) {
                return Err(PsError::invalid_input(format!(
                    "字段 {} 形状 {:?} 与网格 {:?} 不一致",
                    name,
                    field.shape(),
                    grid.shape()
                )));
            }
            let slot = &mut slots[name.index()];
            if slot.is_some() {
                return Err(PsError::invalid_input(format!("字段 {} 重复", name)));
            }
            *slot = Some(field);
        }

        let mut fields = Vec::with_capacity(FieldName::COUNT);
        for (name, slot) in FieldName::ALL.iter().zip(slots) {
            match slot {
                Some(field) => fields.push(field),
                None => return Err(PsError::invalid_input(format!("缺少字段 {}", name))),
            }
        }
        Ok(Self { grid, fields })
    }

    /// 网格
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 读取字段
    #[inline]
    pub fn get(&self, name: FieldName) -> &Field2D {
        &self.fields[name.index()]
    }

    /// 可变字段
    #[inline]
    pub fn get_mut(&mut self, name: FieldName) -> &mut Field2D {
        &mut self.fields[name.index()]
    }

    /// 替换字段
    ///
    /// # Errors
    ///
    /// 形状与网格不一致时返回 [`PsError::SizeMismatch`]。
    pub fn replace(&mut self, name: FieldName, field: Field2D) -> PsResult<()> {
        PsError::check_size("field", self.grid.n_points(), field.as_slice().len())?;
        if !field.matches(&self.grid) {
            return Err(PsError::invalid_input(format!("字段 {} 形状与网格不一致", name)));
        }
        self.fields[name.index()] = field;
        Ok(())
    }

    /// 按归档顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &Field2D)> {
        FieldName::ALL.iter().copied().zip(self.fields.iter())
    }

    /// 按归档顺序可变遍历
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FieldName, &mut Field2D)> {
        FieldName::ALL.iter().copied().zip(self.fields.iter_mut())
    }

    /// 拆分为网格与字段
    pub fn into_parts(self) -> (Grid, Vec<(FieldName, Field2D)>) {
        let named = FieldName::ALL.iter().copied().zip(self.fields).collect();
        (self.grid, named)
    }

    /// 逐字段按位比较（NaN 视为相等）
    pub fn bitwise_eq(&self, other: &FieldSet) -> bool {
        self.grid.same_axes(&other.grid)
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.bitwise_eq(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(vec![-70.0, -69.0], vec![0.0, 1.0, 2.0]).unwrap()
    }

    #[test]
    fn test_indices_match_order() {
        for (i, name) in FieldName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
        assert_eq!(FieldName::COUNT, 23);
    }

    #[test]
    fn test_archive_names_unique_and_parse() {
        let mut names: Vec<_> = FieldName::ALL.iter().map(|f| f.archive_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FieldName::COUNT);

        assert_eq!(FieldName::from_archive_name("tau_SIZ_x"), Some(FieldName::TauSizX));
        assert_eq!(FieldName::from_archive_name("Ekman_w"), Some(FieldName::EkmanW));
        assert_eq!(FieldName::from_archive_name("tau_z"), None);
    }

    #[test]
    fn test_diagnostic_flags() {
        let n = FieldName::ALL.iter().filter(|f| f.is_diagnostic()).count();
        assert_eq!(n, 4);
        assert!(!FieldName::TauX.is_diagnostic());
        assert_eq!(FieldName::WindStressCurl.units(), "N/m^3");
        assert_eq!(FieldName::Alpha.units(), "fractional");
    }

    #[test]
    fn test_from_fields_requires_all() {
        let g = grid();
        let partial = vec![(FieldName::TauX, Field2D::zeros(&g))];
        assert!(FieldSet::from_fields(g.clone(), partial).is_err());

        let set = FieldSet::nan(g.clone());
        let (grid, named) = set.clone().into_parts();
        let rebuilt = FieldSet::from_fields(grid, named).unwrap();
        assert!(rebuilt.bitwise_eq(&set));
    }

    #[test]
    fn test_from_fields_rejects_wrong_shape() {
        let g = grid();
        let other = Grid::new(vec![-70.0], vec![0.0]).unwrap();
        let named = FieldName::ALL.iter().map(|&n| {
            let field = if n == FieldName::Alpha { Field2D::zeros(&other) } else { Field2D::zeros(&g) };
            (n, field)
        });
        assert!(FieldSet::from_fields(g.clone(), named).is_err());
    }

    #[test]
    fn test_replace() {
        let g = grid();
        let mut set = FieldSet::zeros(g.clone());
        set.replace(FieldName::Alpha, Field2D::filled(&g, 0.5)).unwrap();
        assert_eq!(set.get(FieldName::Alpha).get(1, 2), 0.5);
        assert_eq!(set.get(FieldName::TauX).get(1, 2), 0.0);

        let wrong = Grid::new(vec![-70.0], vec![0.0]).unwrap();
        assert!(set.replace(FieldName::Alpha, Field2D::zeros(&wrong)).is_err());
    }
}
