// crates/ps_foundation/src/error.rs

//! 基础层错误
//!
//! 只描述网格与场容器自身的约束违反。配置、物理与归档错误在各自
//! crate 中定义，并通过 `#[from]` 包装本类型。
//!
//! # 示例
//!
//! ```
//! use ps_foundation::error::{PsError, PsResult};
//!
//! fn check_axis(len: usize) -> PsResult<()> {
//!     if len == 0 {
//!         return Err(PsError::invalid_grid("坐标轴为空"));
//!     }
//!     Ok(())
//! }
//! assert!(check_axis(0).is_err());
//! ```

use thiserror::Error;

/// 基础层结果类型
pub type PsResult<T> = Result<T, PsError>;

/// 网格与场的约束错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PsError {
    /// 坐标轴为空、含非有限值或不单调
    #[error("无效的网格: {message}")]
    InvalidGrid {
        /// 违反的约束
        message: String,
    },

    /// 字段集不完整、重复或与网格不符
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 违反的约束
        message: String,
    },

    /// 数据长度与网格点数不一致
    #[error("长度不匹配: {name} 需要 {expected} 个值, 实际 {actual} 个")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 网格点数
        expected: usize,
        /// 实际长度
        actual: usize,
    },
}

impl PsError {
    /// 构造网格错误
    pub fn invalid_grid(message: impl Into<String>) -> Self {
        Self::InvalidGrid {
            message: message.into(),
        }
    }

    /// 构造输入错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 长度一致时返回 `Ok`
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> PsResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::SizeMismatch {
                name,
                expected,
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_size() {
        assert!(PsError::check_size("field", 4, 4).is_ok());
        let err = PsError::check_size("lats", 10, 9).unwrap_err();
        assert_eq!(
            err,
            PsError::SizeMismatch { name: "lats", expected: 10, actual: 9 }
        );
        assert!(err.to_string().contains("lats"));
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(PsError::invalid_grid("空"), PsError::InvalidGrid { .. }));
        assert!(PsError::invalid_input("缺少字段 tau_x").to_string().contains("tau_x"));
    }
}
