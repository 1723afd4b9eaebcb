// ==========================================
// TIPO DE PROCESO 分类系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv) / JSON 记录数组 (.json)
// ==========================================

use crate::domain::table::Table;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// 检查文件存在及扩展名
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 去掉 UTF-8 BOM 与首尾空白
fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// 完全空白的行
fn is_blank(row: &[String]) -> bool {
    row.iter().all(|v| v.is_empty())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table> {
        check_file(file_path, &["csv"])?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
        let mut table = Table::new(headers);

        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if is_blank(&row) {
                continue;
            }
            table.push_row(row);
        }

        debug!(file = %file_path.display(), rows = table.len(), "CSV 解析完成");
        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 单元格文本化: 整数值浮点不带 `.0`,错误单元格视为空
    fn render_cell(cell: &Data) -> String {
        match cell {
            Data::Empty | Data::Error(_) => String::new(),
            Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            other => other.to_string().trim().to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table> {
        check_file(file_path, &["xlsx", "xls", "xlsm", "xlsb"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| clean_header(&Self::render_cell(cell)))
            .collect();

        let mut table = Table::new(headers);
        for data_row in rows {
            let row: Vec<String> = data_row.iter().map(Self::render_cell).collect();

            // 跳过完全空白的行
            if is_blank(&row) {
                continue;
            }
            table.push_row(row);
        }

        debug!(file = %file_path.display(), sheet = %sheet_name, rows = table.len(), "Excel 解析完成");
        Ok(table)
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
// 接受两种形态:
// - 记录数组: [{"EAN": "...", ...}, ...]
// - 包装对象: {"columns": [...], "data": [{...}], "metadata": {...}}
pub struct JsonParser;

impl JsonParser {
    /// JSON 单元格文本化: 整数值浮点不带 `.0`, null → 空串
    pub fn render_value(value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    i.to_string()
                } else if let Some(u) = n.as_u64() {
                    u.to_string()
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                        Some(f) => f.to_string(),
                        None => n.to_string(),
                    }
                }
            }
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }

    /// 从已解析的 JSON 值构建内存表
    pub fn table_from_value(value: &Value) -> ImportResult<Table> {
        let (records, declared_columns) = match value {
            Value::Array(records) => (records, None),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(records)) => {
                    let columns = map.get("columns").and_then(Value::as_array).map(|cols| {
                        cols.iter()
                            .map(|c| clean_header(&Self::render_value(c)))
                            .collect::<Vec<_>>()
                    });
                    (records, columns)
                }
                _ => {
                    return Err(ImportError::JsonParseError(
                        "JSON 对象缺少 data 数组".to_string(),
                    ))
                }
            },
            _ => {
                return Err(ImportError::JsonParseError(
                    "JSON 顶层必须是记录数组".to_string(),
                ))
            }
        };

        // 表头: 声明的列优先,其次按记录中首次出现的顺序补齐
        let mut headers: Vec<String> = declared_columns.unwrap_or_default();
        for record in records {
            if let Value::Object(map) = record {
                for key in map.keys() {
                    let key = clean_header(key);
                    if !headers.contains(&key) {
                        headers.push(key);
                    }
                }
            }
        }

        let mut table = Table::new(headers.clone());
        for record in records {
            let Value::Object(map) = record else {
                continue;
            };
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.iter()
                        .find(|(k, _)| clean_header(k) == *h)
                        .map(|(_, v)| Self::render_value(v))
                        .unwrap_or_default()
                })
                .collect();
            if is_blank(&row) {
                continue;
            }
            table.push_row(row);
        }
        Ok(table)
    }
}

impl FileParser for JsonParser {
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table> {
        check_file(file_path, &["json"])?;

        let reader = BufReader::new(File::open(file_path)?);
        let value: Value = serde_json::from_reader(reader)?;
        let table = Self::table_from_value(&value)?;

        debug!(file = %file_path.display(), rows = table.len(), "JSON 解析完成");
        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Table> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_table(path),
            "xlsx" | "xls" | "xlsm" | "xlsb" => ExcelParser.parse_to_table(path),
            "json" => JsonParser.parse_to_table(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
