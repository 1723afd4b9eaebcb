// ==========================================
// TIPO DE PROCESO 分类系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 导入阶段错误对本次运行均为致命错误,不重试
// ==========================================

use crate::domain::types::SourceKind;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    // ===== 数据源错误 =====
    #[error("数据源加载失败 ({source_kind}): {message}")]
    SourceLoadError {
        source_kind: SourceKind,
        message: String,
    },

    #[error("无法识别报表版式: 未找到任何零件号列（Número de Parte / Num. Parte / Numero de Parte），现有列: {columns:?}")]
    LayoutNotRecognized { columns: Vec<String> },

    #[error("缺少必需列 ({source_kind}): {column}")]
    MissingRequiredColumn {
        source_kind: SourceKind,
        column: String,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 为底层解析错误补充数据源上下文
    pub fn in_source(self, source_kind: SourceKind) -> Self {
        match self {
            ImportError::LayoutNotRecognized { .. }
            | ImportError::MissingRequiredColumn { .. }
            | ImportError::SourceLoadError { .. } => self,
            other => ImportError::SourceLoadError {
                source_kind,
                message: other.to_string(),
            },
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_source_wraps_parse_errors() {
        let err = ImportError::CsvParseError("bad quote".to_string()).in_source(SourceKind::Reporte);
        match err {
            ImportError::SourceLoadError {
                source_kind,
                message,
            } => {
                assert_eq!(source_kind, SourceKind::Reporte);
                assert!(message.contains("bad quote"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_in_source_keeps_layout_errors() {
        let err = ImportError::MissingRequiredColumn {
            source_kind: SourceKind::Reporte,
            column: "NOMs".to_string(),
        }
        .in_source(SourceKind::BaseGeneral);
        assert!(matches!(
            err,
            ImportError::MissingRequiredColumn {
                source_kind: SourceKind::Reporte,
                ..
            }
        ));
    }
}
