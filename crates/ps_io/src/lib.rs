// crates/ps_io/src/lib.rs

//! PolarStress IO
//!
//! 表面应力字段集的持久化：
//!
//! - [`archive`]: CF 约定的 NetCDF 归档（经纬度坐标、全部命名字段及其单位）
//! - [`store`]: 按日期组织的归档目录，实现 `ArchiveSource` 供时间平均读取
//! - [`error`]: 错误类型
//!
//! 写入先落到临时文件再重命名，读取方不会看到写了一半的归档。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod error;
pub mod store;

pub use archive::{Archive, ArchiveHeader, ARCHIVE_VERSION, DAILY_LABEL};
pub use error::{ArchiveError, ArchiveResult};
pub use store::ArchiveStore;
