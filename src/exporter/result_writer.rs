// ==========================================
// TIPO DE PROCESO 分类系统 - 结果表导出
// ==========================================
// 列顺序: ITEM, TIPO DE PROCESO, NORMA, CRITERIO, DESCRIPCION
// 格式: CSV（带表头）或 JSON 记录数组
// ==========================================

use crate::domain::records::ResultRow;
use crate::exporter::error::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// 按输出文件扩展名推断格式
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        ext.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

pub struct ResultWriter;

impl ResultWriter {
    /// 写出结果表（覆盖已存在文件）
    pub fn write(rows: &[ResultRow], path: &Path, format: ExportFormat) -> ExportResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ExportError::write(parent, e))?;
            }
        }

        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;
                if rows.is_empty() {
                    writer.write_record(ResultRow::COLUMNS)?;
                }
                for row in rows {
                    writer.serialize(row)?;
                }
                writer.flush().map_err(|e| ExportError::write(path, e))?;
            }
            ExportFormat::Json => {
                let file = File::create(path).map_err(|e| ExportError::write(path, e))?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, rows)?;
                writer.flush().map_err(|e| ExportError::write(path, e))?;
            }
        }

        info!(path = %path.display(), rows = rows.len(), format = %format, "结果表已导出");
        Ok(())
    }
}
