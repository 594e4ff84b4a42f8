// crates/ps_io/src/archive.rs

//! 表面应力场 NetCDF 归档
//!
//! 每个归档保存一个日期（或一个平均时段）的完整字段集，遵循 CF 约定，
//! 可以脱离场引擎用任何 NetCDF 工具读取。缺测值按 NaN 原样保存。
//!
//! # 文件结构
//!
//! ```text
//! dimensions:
//!     lat = n_lat ;
//!     lon = n_lon ;
//! variables:
//!     double lat(lat) ;      units = "degrees_north"
//!     double lon(lon) ;      units = "degrees_east"
//!     double tau_x(lat, lon) ; units, long_name
//!     ...                    每个 FieldName 一个变量
//! global attributes:
//!     Conventions, title, archive_version, date, label, date_created
//! ```
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use ps_io::Archive;
//!
//! let archive = Archive::daily(date, fields);
//! archive.save(Path::new("surface_stress_20150201.nc"))?;
//!
//! let loaded = Archive::load(Path::new("surface_stress_20150201.nc"))?;
//! println!("{} {}", loaded.date, loaded.label);
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;

use ps_foundation::{Field2D, Grid};
use ps_physics::{FieldName, FieldSet};

use crate::error::{ArchiveError, ArchiveResult};

// ============================================================
// 常量
// ============================================================

/// 归档格式版本
pub const ARCHIVE_VERSION: i32 = 1;

/// 逐日归档的标签
pub const DAILY_LABEL: &str = "daily";

/// 归档文件扩展名
pub const ARCHIVE_EXTENSION: &str = "nc";

const LAT_DIM: &str = "lat";
const LON_DIM: &str = "lon";

const ATTR_VERSION: &str = "archive_version";
const ATTR_DATE: &str = "date";
const ATTR_LABEL: &str = "label";
const ATTR_CREATED: &str = "date_created";

// ============================================================
// 归档数据
// ============================================================

/// 归档头部信息（全局属性与维度）
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveHeader {
    /// 版本号
    pub version: i32,
    /// 日期
    pub date: NaiveDate,
    /// 标签
    pub label: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 纬度点数
    pub n_lat: usize,
    /// 经度点数
    pub n_lon: usize,
}

/// 一个日期或时段的字段集归档
#[derive(Debug, Clone)]
pub struct Archive {
    /// 版本号
    pub version: i32,
    /// 日期（平均归档为时段的首日）
    pub date: NaiveDate,
    /// 标签
    pub label: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 字段集
    pub fields: FieldSet,
}

impl Archive {
    /// 创建归档
    pub fn new(date: NaiveDate, label: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            version: ARCHIVE_VERSION,
            date,
            label: label.into(),
            created_at: Utc::now(),
            fields,
        }
    }

    /// 创建逐日归档
    pub fn daily(date: NaiveDate, fields: FieldSet) -> Self {
        Self::new(date, DAILY_LABEL, fields)
    }

    /// 是否为逐日归档
    pub fn is_daily(&self) -> bool {
        self.label == DAILY_LABEL
    }

    /// 替换字段集，返回旧字段集
    pub fn replace_fields(&mut self, fields: FieldSet) -> FieldSet {
        std::mem::replace(&mut self.fields, fields)
    }

    /// 网格
    pub fn grid(&self) -> &Grid {
        self.fields.grid()
    }

    /// 保存到文件
    ///
    /// 先写 `*.nc.tmp`，关闭后重命名，读取方不会看到写了一半的文件。
    pub fn save(&self, path: &Path) -> ArchiveResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("nc.tmp");
        if let Err(e) = self.write_netcdf(&temp_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
        std::fs::rename(&temp_path, path)?;

        tracing::debug!(path = %path.display(), date = %self.date, label = %self.label, "归档已保存");
        Ok(())
    }

    fn write_netcdf(&self, path: &Path) -> ArchiveResult<()> {
        let grid = self.fields.grid();
        let mut file = netcdf::create(path)?;

        file.add_dimension(LAT_DIM, grid.n_lat())?;
        file.add_dimension(LON_DIM, grid.n_lon())?;

        {
            let mut lat = file.add_variable::<f64>(LAT_DIM, &[LAT_DIM])?;
            lat.put_attribute("standard_name", "latitude")?;
            lat.put_attribute("long_name", "latitude")?;
            lat.put_attribute("units", "degrees_north")?;
            lat.put_values(grid.lats(), ..)?;
        }
        {
            let mut lon = file.add_variable::<f64>(LON_DIM, &[LON_DIM])?;
            lon.put_attribute("standard_name", "longitude")?;
            lon.put_attribute("long_name", "longitude")?;
            lon.put_attribute("units", "degrees_east")?;
            lon.put_values(grid.lons(), ..)?;
        }

        for (name, field) in self.fields.iter() {
            let mut var = file.add_variable::<f64>(name.archive_name(), &[LAT_DIM, LON_DIM])?;
            var.put_attribute("units", name.units())?;
            var.put_attribute("long_name", name.long_name())?;
            var.put_values(field.as_slice(), ..)?;
        }

        file.add_attribute("Conventions", "CF-1.8")?;
        file.add_attribute("title", "Polar air-ice-ocean surface stress")?;
        file.add_attribute(ATTR_VERSION, self.version)?;
        file.add_attribute(ATTR_DATE, self.date.format("%Y-%m-%d").to_string().as_str())?;
        file.add_attribute(ATTR_LABEL, self.label.as_str())?;
        file.add_attribute(ATTR_CREATED, self.created_at.to_rfc3339().as_str())?;
        Ok(())
    }

    /// 从文件加载
    ///
    /// # Errors
    ///
    /// 文件不存在时返回 [`ArchiveError::NotFound`]；缺少任一字段变量、
    /// 全局属性或形状与坐标轴不符时返回相应错误。
    pub fn load(path: &Path) -> ArchiveResult<Self> {
        let file = open(path)?;
        let header = read_header_from(&file)?;

        let lats = read_variable(&file, LAT_DIM)?;
        let lons = read_variable(&file, LON_DIM)?;
        let grid = Grid::new(lats, lons)?;

        let mut named = Vec::with_capacity(FieldName::COUNT);
        for name in FieldName::ALL {
            let values = read_variable(&file, name.archive_name())?;
            named.push((name, Field2D::from_vec(header.n_lat, header.n_lon, values)?));
        }

        for var in file.variables() {
            let var_name = var.name();
            let known = var_name == LAT_DIM
                || var_name == LON_DIM
                || FieldName::from_archive_name(&var_name).is_some();
            if !known {
                tracing::debug!(path = %path.display(), variable = %var_name, "忽略未知变量");
            }
        }

        Ok(Self {
            version: header.version,
            date: header.date,
            label: header.label,
            created_at: header.created_at,
            fields: FieldSet::from_fields(grid, named)?,
        })
    }

    /// 仅读取全局属性与维度，不加载字段
    pub fn read_header(path: &Path) -> ArchiveResult<ArchiveHeader> {
        read_header_from(&open(path)?)
    }
}

// ============================================================
// 读取辅助
// ============================================================

fn open(path: &Path) -> ArchiveResult<netcdf::File> {
    if !path.is_file() {
        return Err(ArchiveError::NotFound(path.to_path_buf()));
    }
    Ok(netcdf::open(path)?)
}

fn read_header_from(file: &netcdf::File) -> ArchiveResult<ArchiveHeader> {
    let version = match global_attribute(file, ATTR_VERSION)? {
        netcdf::AttributeValue::Int(v) => v,
        other => {
            return Err(ArchiveError::format(format!("{} 类型错误: {:?}", ATTR_VERSION, other)))
        }
    };
    if version > ARCHIVE_VERSION || version < 1 {
        return Err(ArchiveError::Version {
            file: version,
            current: ARCHIVE_VERSION,
        });
    }

    let date_str = global_string(file, ATTR_DATE)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| ArchiveError::format(format!("无效日期 '{}': {}", date_str, e)))?;
    let label = global_string(file, ATTR_LABEL)?;
    let created_str = global_string(file, ATTR_CREATED)?;
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| ArchiveError::format(format!("无效创建时间 '{}': {}", created_str, e)))?
        .with_timezone(&Utc);

    Ok(ArchiveHeader {
        version,
        date,
        label,
        created_at,
        n_lat: dimension_len(file, LAT_DIM)?,
        n_lon: dimension_len(file, LON_DIM)?,
    })
}

fn global_attribute(file: &netcdf::File, name: &str) -> ArchiveResult<netcdf::AttributeValue> {
    let attr = file
        .attribute(name)
        .ok_or_else(|| ArchiveError::MissingAttribute(name.to_string()))?;
    Ok(attr.value()?)
}

fn global_string(file: &netcdf::File, name: &str) -> ArchiveResult<String> {
    match global_attribute(file, name)? {
        netcdf::AttributeValue::Str(s) => Ok(s),
        other => Err(ArchiveError::format(format!("{} 应为字符串: {:?}", name, other))),
    }
}

fn dimension_len(file: &netcdf::File, name: &str) -> ArchiveResult<usize> {
    file.dimension(name)
        .map(|d| d.len())
        .ok_or_else(|| ArchiveError::format(format!("缺少维度 '{}'", name)))
}

fn read_variable(file: &netcdf::File, name: &str) -> ArchiveResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| ArchiveError::MissingVariable(name.to_string()))?;
    Ok(var.get_values::<f64, _>(..)?)
}
