// ==========================================
// TIPO DE PROCESO 分类系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误,保留数据源 / 列名上下文
// 说明: 致命错误（版式/列/数据源）中止本次运行且不写输出文件
// ==========================================

use crate::domain::types::SourceKind;
use crate::exporter::error::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据源错误（致命）
    // ==========================================
    #[error("无法识别报表版式，现有列: {0:?}")]
    LayoutNotRecognized(Vec<String>),

    #[error("缺少必需列 ({source_kind}): {column}")]
    MissingRequiredColumn {
        source_kind: SourceKind,
        column: String,
    },

    #[error("数据源加载失败 ({source_kind}): {message}")]
    SourceLoadError {
        source_kind: SourceKind,
        message: String,
    },

    // ==========================================
    // 配置 / 输入错误
    // ==========================================
    #[error("未配置文件路径: {0}")]
    PathNotConfigured(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 输出 / 持久化错误
    // ==========================================
    #[error("结果导出失败: {0}")]
    ExportError(String),

    #[error("持久化失败: {0}")]
    PersistenceError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::LayoutNotRecognized { columns } => ApiError::LayoutNotRecognized(columns),
            ImportError::MissingRequiredColumn {
                source_kind,
                column,
            } => ApiError::MissingRequiredColumn {
                source_kind,
                column,
            },
            ImportError::SourceLoadError {
                source_kind,
                message,
            } => ApiError::SourceLoadError {
                source_kind,
                message,
            },
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::PersistenceError(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::SourceError(import) => import.into(),
            ExportError::UnsupportedFormat(fmt) => {
                ApiError::InvalidInput(format!("不支持的导出格式: {}", fmt))
            }
            other => ApiError::ExportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_keeps_source_context() {
        let err: ApiError = ImportError::MissingRequiredColumn {
            source_kind: SourceKind::Reporte,
            column: "NOMs".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            ApiError::MissingRequiredColumn {
                source_kind: SourceKind::Reporte,
                ..
            }
        ));
        assert!(err.to_string().contains("NOMs"));
    }

    #[test]
    fn test_repository_error_is_persistence() {
        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::PersistenceError(_)));
    }
}
