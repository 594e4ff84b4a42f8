// crates/ps_io/src/store.rs

//! 按日期组织的归档目录
//!
//! ```text
//! <root>/surface_stress/<year>/surface_stress_<YYYYMMDD>.nc   逐日
//! <root>/surface_stress/<year>/surface_stress_<label>.nc      平均
//! ```
//!
//! 每个日期只有一个写入者；读取可以任意并发。

use chrono::{Datelike, NaiveDate};
use ps_config::OutputConfig;
use std::path::{Path, PathBuf};

use ps_physics::{ArchiveSource, FieldSet, SourceError};

use crate::archive::{Archive, ARCHIVE_EXTENSION};
use crate::error::ArchiveResult;

/// 归档子目录名
const STORE_SUBDIR: &str = "surface_stress";

/// 文件名前缀
const FILE_PREFIX: &str = "surface_stress_";

/// 归档目录
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    /// 以 `root` 为根目录
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 以配置的输出目录为根目录
    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new(&output.directory)
    }

    /// 根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn year_dir(&self, year: i32) -> PathBuf {
        self.root.join(STORE_SUBDIR).join(year.to_string())
    }

    /// 逐日归档路径
    pub fn daily_path(&self, date: NaiveDate) -> PathBuf {
        self.year_dir(date.year()).join(format!(
            "{}{}.{}",
            FILE_PREFIX,
            date.format("%Y%m%d"),
            ARCHIVE_EXTENSION
        ))
    }

    /// 平均归档路径
    pub fn mean_path(&self, year: i32, label: &str) -> PathBuf {
        self.year_dir(year)
            .join(format!("{}{}.{}", FILE_PREFIX, label, ARCHIVE_EXTENSION))
    }

    /// 归档应存放的位置
    pub fn path_for(&self, archive: &Archive) -> PathBuf {
        if archive.is_daily() {
            self.daily_path(archive.date)
        } else {
            self.mean_path(archive.date.year(), &archive.label)
        }
    }

    /// 保存归档，返回路径
    pub fn save(&self, archive: &Archive) -> ArchiveResult<PathBuf> {
        let path = self.path_for(archive);
        archive.save(&path)?;
        tracing::info!(path = %path.display(), label = %archive.label, "归档写入完成");
        Ok(path)
    }

    /// 读取逐日归档
    pub fn load_daily(&self, date: NaiveDate) -> ArchiveResult<Archive> {
        Archive::load(&self.daily_path(date))
    }

    /// 读取平均归档
    pub fn load_mean(&self, year: i32, label: &str) -> ArchiveResult<Archive> {
        Archive::load(&self.mean_path(year, label))
    }

    /// 逐日归档是否存在
    pub fn has_daily(&self, date: NaiveDate) -> bool {
        self.daily_path(date).is_file()
    }
}

impl ArchiveSource for ArchiveStore {
    fn load_fields(&self, date: NaiveDate) -> Result<FieldSet, SourceError> {
        match self.load_daily(date) {
            Ok(archive) => Ok(archive.fields),
            Err(e) if e.is_not_found() => Err(SourceError::NotFound { date }),
            Err(e) => Err(SourceError::unreadable(date, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let store = ArchiveStore::new("/data/out");
        let date = NaiveDate::from_ymd_opt(2015, 2, 7).unwrap();
        assert_eq!(
            store.daily_path(date),
            PathBuf::from("/data/out/surface_stress/2015/surface_stress_20150207.nc")
        );
        assert_eq!(
            store.mean_path(1992, "JAS_1992-2015_avg"),
            PathBuf::from("/data/out/surface_stress/1992/surface_stress_JAS_1992-2015_avg.nc")
        );
    }

    #[test]
    fn test_from_config_uses_output_directory() {
        let output = OutputConfig {
            directory: PathBuf::from("/data/polar"),
            ..Default::default()
        };
        let store = ArchiveStore::from_config(&output);
        assert_eq!(store.root(), Path::new("/data/polar"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let store = ArchiveStore::new(std::env::temp_dir().join("ps_io_store_empty"));
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert!(!store.has_daily(date));
        assert!(matches!(
            store.load_fields(date),
            Err(SourceError::NotFound { .. })
        ));
    }
}
