// ==========================================
// TIPO DE PROCESO 分类系统 - 持久化层错误类型
// ==========================================
// 职责: 历史表 / 已处理报表登记的读写错误
// 说明: 历史表写入失败不影响已导出的结果文件
// 工具: thiserror 派生宏
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 持久化层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 文件错误 =====
    #[error("存储文件读写失败 ({path}): {message}")]
    StorageIoError { path: PathBuf, message: String },

    #[error("不支持的存储格式: {0}（仅支持 .json / .csv / .db / .sqlite）")]
    UnsupportedStorage(String),

    #[error("存储内容格式错误: {0}")]
    DataFormatError(String),

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        RepositoryError::StorageIoError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                RepositoryError::DatabaseQueryError(msg)
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::StorageIoError {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        RepositoryError::DataFormatError(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DataFormatError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
