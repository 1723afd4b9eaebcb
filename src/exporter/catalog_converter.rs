// ==========================================
// TIPO DE PROCESO 分类系统 - 目录格式转换
// ==========================================
// 职责: Excel / CSV 目录 → JSON 记录数组（加载器可直接读取）
// 说明: 单元格一律按文本写出,保留 EAN 前导零;空单元格写 null
// ==========================================

use crate::domain::table::Table;
use crate::exporter::error::{ExportError, ExportResult};
use crate::importer::file_parser::UniversalFileParser;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub rows: usize,
    pub columns: usize,
}

pub struct CatalogConverter;

impl CatalogConverter {
    /// 内存表 → JSON 记录数组
    pub fn table_to_records(table: &Table) -> Value {
        let records = table
            .rows()
            .map(|row| {
                let mut record = Map::new();
                for (header, cell) in table.headers().iter().zip(row) {
                    let value = if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell.clone())
                    };
                    record.insert(header.clone(), value);
                }
                Value::Object(record)
            })
            .collect();
        Value::Array(records)
    }

    /// 读取源文件并写出 JSON 记录数组
    pub fn convert(source: &Path, target: &Path) -> ExportResult<ConversionSummary> {
        let table = UniversalFileParser.parse(source)?;
        let records = Self::table_to_records(&table);

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ExportError::write(parent, e))?;
            }
        }
        let file = File::create(target).map_err(|e| ExportError::write(target, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writer.flush().map_err(|e| ExportError::write(target, e))?;

        let summary = ConversionSummary {
            rows: table.len(),
            columns: table.headers().len(),
        };
        info!(
            source = %source.display(),
            target = %target.display(),
            rows = summary.rows,
            "目录已转换为 JSON"
        );
        Ok(summary)
    }
}
