// ==========================================
// TIPO DE PROCESO 分类系统 - 导出层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("不支持的导出格式: {0}（仅支持 csv / json）")]
    UnsupportedFormat(String),

    #[error("输出文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("CSV 写入失败: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("源文件读取失败: {0}")]
    SourceError(#[from] ImportError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    pub fn write(path: &std::path::Path, err: std::io::Error) -> Self {
        ExportError::WriteError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
