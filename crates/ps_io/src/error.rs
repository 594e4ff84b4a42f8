// crates/ps_io/src/error.rs
//! IO 错误类型定义
//!
//! 归档读写的统一错误枚举，文件系统、NetCDF 库与基础层错误通过 thiserror 自动转换。

use ps_foundation::PsError;
use std::path::PathBuf;
use thiserror::Error;

/// 归档操作结果类型
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// 归档错误
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// 文件系统错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// NetCDF 库错误
    #[error("NetCDF 错误: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// 归档不存在
    #[error("归档不存在: {}", .0.display())]
    NotFound(PathBuf),

    /// 缺少字段变量或坐标变量
    #[error("缺少变量: {0}")]
    MissingVariable(String),

    /// 缺少全局属性
    #[error("缺少全局属性: {0}")]
    MissingAttribute(String),

    /// 属性值无法解析
    #[error("格式错误: {0}")]
    Format(String),

    /// 版本不兼容
    #[error("版本不兼容: 文件版本 {file}, 当前版本 {current}")]
    Version {
        /// 文件版本
        file: i32,
        /// 当前版本
        current: i32,
    },

    /// 坐标轴或字段形状无效
    #[error("基础层错误: {0}")]
    Foundation(#[from] PsError),
}

impl ArchiveError {
    /// 构造格式错误
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// 是否为文件不存在
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
