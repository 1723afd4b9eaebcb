// ==========================================
// TIPO DE PROCESO 分类系统 - 统计面板 API
// ==========================================
// 职责: 合规代码目录统计 + 已处理报表统计 + 历史表规模
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::domain::types::SourceKind;
use crate::engine::summary::ComplianceCatalogStats;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::repository::history_repo::open_history_store;
use crate::repository::processed_file_repo::{ProcessedFileRepository, ProcessedFileStats};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub codigos: ComplianceCatalogStats,
    pub archivos: ProcessedFileStats,
    /// 历史表行数,历史表不可读时为 None
    pub total_historial: Option<usize>,
}

pub struct DashboardApi<'a> {
    config: &'a ConfigManager,
}

impl<'a> DashboardApi<'a> {
    pub fn new(config: &'a ConfigManager) -> Self {
        Self { config }
    }

    /// 合规代码目录统计
    pub fn compliance_stats(&self) -> ApiResult<ComplianceCatalogStats> {
        let path = self
            .config
            .get_config_value(config_keys::CODIGOS_CUMPLE)
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ApiError::PathNotConfigured(config_keys::CODIGOS_CUMPLE.to_string()))?;
        let path = Path::new(path.trim());
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        // JSON 目录按原始记录统计（区分"缺少 ITEM 键"与"ITEM 为空"）
        let stats = if is_json {
            read_json_document(path)
                .and_then(|document| ComplianceCatalogStats::from_json_records(&document))
        } else {
            UniversalFileParser
                .parse(path)
                .and_then(|table| ComplianceCatalogStats::from_table(&table))
        };
        Ok(stats.map_err(|e| e.in_source(SourceKind::CodigosCumple))?)
    }

    /// 已处理报表统计
    pub fn processed_files(&self) -> ApiResult<ProcessedFileStats> {
        Ok(ProcessedFileRepository::new(self.config.archivos_procesados_path()).stats()?)
    }

    /// 清空已处理报表登记
    pub fn clear_processed_files(&self) -> ApiResult<()> {
        Ok(ProcessedFileRepository::new(self.config.archivos_procesados_path()).clear()?)
    }

    /// 面板汇总
    pub fn dashboard_stats(&self) -> ApiResult<DashboardStats> {
        let total_historial = match open_history_store(&self.config.historial_path())
            .and_then(|store| store.load_all())
        {
            Ok(rows) => Some(rows.len()),
            Err(e) => {
                warn!(error = %e, "历史表不可读");
                None
            }
        };

        Ok(DashboardStats {
            codigos: self.compliance_stats()?,
            archivos: self.processed_files()?,
            total_historial,
        })
    }
}

fn read_json_document(path: &Path) -> ImportResult<Value> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
