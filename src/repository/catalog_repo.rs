// ==========================================
// TIPO DE PROCESO 分类系统 - 目录维护仓储
// ==========================================
// 职责: 向 JSON 记录目录登记零件号（通用目录 / 合规代码目录）
// 规则: 键按文本比较;已存在 → 原位替换,否则追加;键以字符串写入
// 格式: 保持原文档形态（记录数组 或 {"data": [...]} 包装）
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::JsonParser;
use crate::importer::source_loader::{
    CATALOG_DESCRIPTION, CATALOG_FORMAT_CODE, CATALOG_KEY, COMPLIANCE_CRITERION_ALIASES,
    COMPLIANCE_KEY, COMPLIANCE_OBSERVATIONS,
};
use crate::domain::types::labels;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 登记结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpsertOutcome {
    Insertado,
    Actualizado,
}

pub struct CatalogRepository {
    path: PathBuf,
}

impl CatalogRepository {
    pub fn new(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if ext != "json" {
            return Err(RepositoryError::UnsupportedStorage(ext));
        }
        Ok(Self { path })
    }

    /// 通用目录: {EAN, DESCRIPTION, CODIGO FORMATO}
    pub fn upsert_catalog_item(
        &self,
        item: i64,
        descripcion: &str,
        codigo_formato: &str,
    ) -> RepositoryResult<UpsertOutcome> {
        let mut record = Map::new();
        record.insert(CATALOG_KEY.to_string(), Value::String(item.to_string()));
        record.insert(
            CATALOG_DESCRIPTION.to_string(),
            Value::String(descripcion.trim().to_string()),
        );
        record.insert(
            CATALOG_FORMAT_CODE.to_string(),
            Value::String(codigo_formato.trim().to_string()),
        );
        self.upsert(CATALOG_KEY, record)
    }

    /// 合规代码目录: {ITEM, OBSERVACIONES, CRITERIO}
    ///
    /// OBSERVACIONES 为 CUMPLE 时 CRITERIO 写为空
    pub fn upsert_compliance_item(
        &self,
        item: i64,
        observaciones: &str,
        criterio: &str,
    ) -> RepositoryResult<UpsertOutcome> {
        let observaciones = observaciones.trim();
        let criterio = if observaciones.to_uppercase() == labels::CUMPLE {
            ""
        } else {
            criterio.trim()
        };

        let mut record = Map::new();
        record.insert(COMPLIANCE_KEY.to_string(), Value::String(item.to_string()));
        record.insert(
            COMPLIANCE_OBSERVATIONS.to_string(),
            Value::String(observaciones.to_string()),
        );
        record.insert(
            COMPLIANCE_CRITERION_ALIASES[0].to_string(),
            Value::String(criterio.to_string()),
        );
        self.upsert(COMPLIANCE_KEY, record)
    }

    fn upsert(
        &self,
        key_column: &str,
        record: Map<String, Value>,
    ) -> RepositoryResult<UpsertOutcome> {
        let key = record
            .get(key_column)
            .map(JsonParser::render_value)
            .unwrap_or_default();

        let mut document = self.load()?;
        let records = records_mut(&mut document)?;

        let cleaner = DataCleaner;
        let existing = records.iter().position(|r| {
            r.get(key_column)
                .map(|v| cleaner.key_text(&JsonParser::render_value(v)) == key)
                .unwrap_or(false)
        });

        let outcome = match existing {
            Some(idx) => {
                records[idx] = Value::Object(record);
                UpsertOutcome::Actualizado
            }
            None => {
                records.push(Value::Object(record));
                UpsertOutcome::Insertado
            }
        };

        self.save(&document)?;
        info!(path = %self.path.display(), key = %key, outcome = ?outcome, "目录记录已登记");
        Ok(outcome)
    }

    /// 文件不存在或为空时视为空记录数组
    fn load(&self) -> RepositoryResult<Value> {
        if !self.path.exists() {
            return Ok(Value::Array(Vec::new()));
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| RepositoryError::io(&self.path, e))?;
        if raw.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, document: &Value) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RepositoryError::io(parent, e))?;
            }
        }
        let body = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, body).map_err(|e| RepositoryError::io(&self.path, e))
    }
}

fn records_mut(document: &mut Value) -> RepositoryResult<&mut Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(map) => map
            .entry("data")
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| RepositoryError::DataFormatError("目录 data 字段不是数组".to_string())),
        _ => Err(RepositoryError::DataFormatError(
            "目录 JSON 顶层必须是记录数组".to_string(),
        )),
    }
}
