// ==========================================
// TIPO DE PROCESO 分类系统 - 报表处理 API
// ==========================================
// 职责: 一次"处理报表"操作的完整编排
// 流程: 加载三源 → 流水线 → 写出结果 → 合并历史 → 登记报表
// 错误策略:
// - 加载 / 流水线 / 导出失败 → 整体失败,不写输出
// - 历史合并、报表登记失败 → 结果保留,记为警告
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::domain::records::ResultRow;
use crate::domain::types::ReportLayout;
use crate::engine::history_merger::{HistoryMerger, MergeOutcome};
use crate::engine::pipeline::{PipelineContext, ProgressSink};
use crate::engine::rules::{ClassificationRules, RuleOptions};
use crate::engine::summary::RunSummary;
use crate::exporter::catalog_converter::{CatalogConverter, ConversionSummary};
use crate::exporter::result_writer::{ExportFormat, ResultWriter};
use crate::importer::source_loader::{LoadedSources, SourceLoader, SourcePaths};
use crate::repository::history_repo::open_history_store;
use crate::repository::processed_file_repo::ProcessedFileRepository;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 默认输出文件名（不含扩展名）
pub const DEFAULT_OUTPUT_STEM: &str = "TIPO DE PROCESO";

/// 处理报表请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessReportRequest {
    pub reporte: PathBuf,
    /// 输出文件,缺省为报表同目录下的 "TIPO DE PROCESO.<ext>"
    pub salida: Option<PathBuf>,
    /// 输出格式,缺省按 salida 扩展名推断,再缺省为 CSV
    pub formato: Option<ExportFormat>,
}

/// 历史表更新结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryStatus {
    Actualizado { store: String, outcome: MergeOutcome },
    Fallido { store: String, error: String },
}

impl HistoryStatus {
    pub fn is_updated(&self) -> bool {
        matches!(self, HistoryStatus::Actualizado { .. })
    }
}

/// 处理报表响应
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReportResponse {
    pub run_id: String,
    pub reporte: String,
    pub salida: PathBuf,
    pub formato: ExportFormat,
    pub layout: ReportLayout,
    /// 报表原始数据行数
    pub filas_reporte: usize,
    /// 零件号无法解析而丢弃的行数
    pub filas_descartadas: usize,
    pub summary: RunSummary,
    pub historial: HistoryStatus,
    pub archivo_registrado: bool,
    /// 非致命问题（历史 / 登记失败）
    pub advertencias: Vec<String>,
    pub elapsed_ms: i64,
    #[serde(skip)]
    pub rows: Vec<ResultRow>,
}

// ==========================================
// ReportApi
// ==========================================
pub struct ReportApi {
    config: ConfigManager,
    loader: SourceLoader,
}

impl ReportApi {
    pub fn new(config: ConfigManager) -> Self {
        Self {
            config,
            loader: SourceLoader::new(),
        }
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    fn configured_path(&self, key: &str) -> ApiResult<PathBuf> {
        let value = self.config.get_config_value(key).unwrap_or_default();
        if value.trim().is_empty() {
            return Err(ApiError::PathNotConfigured(key.to_string()));
        }
        Ok(PathBuf::from(value.trim()))
    }

    fn rules(&self) -> ApiResult<ClassificationRules> {
        let options =
            RuleOptions::from_reader(&self.config).map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(ClassificationRules::new(&options))
    }

    /// 加载三个数据源
    pub fn load_sources(&self, reporte: &Path) -> ApiResult<LoadedSources> {
        let paths = SourcePaths {
            base_general: self.configured_path(config_keys::BASE_GENERAL)?,
            codigos_cumple: self.configured_path(config_keys::CODIGOS_CUMPLE)?,
            reporte: reporte.to_path_buf(),
        };
        Ok(self.loader.load_from_paths(&paths)?)
    }

    /// 处理一份商品报表
    #[instrument(skip_all, fields(reporte = %request.reporte.display()))]
    pub fn process_report(
        &self,
        request: &ProcessReportRequest,
        sink: &mut dyn ProgressSink,
    ) -> ApiResult<ProcessReportResponse> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let fecha_proceso = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let (salida, formato) = resolve_output(request)?;

        // 1. 加载 + 流水线（失败则不写任何输出）
        let sources = self.load_sources(&request.reporte)?;
        let layout = sources.report.columns.layout;
        let filas_reporte = sources.report.total_rows;
        let filas_descartadas = sources.report.dropped_rows;
        let context = PipelineContext::new(sources, self.rules()?);
        let rows = context.run(sink);

        // 2. 写出结果
        ResultWriter::write(&rows, &salida, formato)?;

        let mut advertencias = Vec::new();

        // 3. 合并历史（失败仅警告）
        let historial = self.update_history(&rows);
        if let HistoryStatus::Fallido { store, error } = &historial {
            warn!(store = %store, error = %error, "历史表更新失败,结果文件已保留");
            advertencias.push(format!("No se actualizó el historial ({}): {}", store, error));
        }

        // 4. 登记报表（失败仅警告）
        let nombre = request
            .reporte
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| request.reporte.display().to_string());
        let registry = ProcessedFileRepository::new(self.config.archivos_procesados_path());
        let archivo_registrado = match registry.register(&nombre, &fecha_proceso) {
            Ok(registered) => registered,
            Err(e) => {
                warn!(nombre = %nombre, error = %e, "报表登记失败");
                advertencias.push(format!("No se registró el archivo {}: {}", nombre, e));
                false
            }
        };

        let response = ProcessReportResponse {
            run_id,
            reporte: nombre,
            salida,
            formato,
            layout,
            filas_reporte,
            filas_descartadas,
            summary: RunSummary::from_rows(&rows),
            historial,
            archivo_registrado,
            advertencias,
            elapsed_ms: start.elapsed().as_millis() as i64,
            rows,
        };

        info!(
            run_id = %response.run_id,
            items = response.summary.total,
            layout = %response.layout,
            history_updated = response.historial.is_updated(),
            elapsed_ms = response.elapsed_ms,
            "报表处理完成"
        );
        Ok(response)
    }

    fn update_history(&self, rows: &[ResultRow]) -> HistoryStatus {
        let path = self.config.historial_path();
        let store = match open_history_store(&path) {
            Ok(store) => store,
            Err(e) => {
                return HistoryStatus::Fallido {
                    store: path.display().to_string(),
                    error: e.to_string(),
                }
            }
        };
        match HistoryMerger::new(store.as_ref()).merge(rows) {
            Ok(outcome) => HistoryStatus::Actualizado {
                store: store.describe(),
                outcome,
            },
            Err(e) => HistoryStatus::Fallido {
                store: store.describe(),
                error: e.to_string(),
            },
        }
    }

    /// 报表中不在通用目录的零件号
    pub fn find_new_items(&self, reporte: &Path) -> ApiResult<Vec<i64>> {
        let sources = self.load_sources(reporte)?;
        let context = PipelineContext::new(sources, self.rules()?);
        let items = context.new_items();
        info!(reporte = %reporte.display(), new_items = items.len(), "新零件号查询完成");
        Ok(items)
    }

    /// 目录 Excel → JSON
    pub fn convert_catalog(&self, source: &Path, target: &Path) -> ApiResult<ConversionSummary> {
        Ok(CatalogConverter::convert(source, target)?)
    }
}

/// 输出路径与格式
fn resolve_output(request: &ProcessReportRequest) -> ApiResult<(PathBuf, ExportFormat)> {
    match (&request.salida, request.formato) {
        (Some(path), Some(format)) => Ok((path.clone(), format)),
        (Some(path), None) => Ok((path.clone(), ExportFormat::from_path(path)?)),
        (None, format) => {
            let format = format.unwrap_or(ExportFormat::Csv);
            let dir = request
                .reporte
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let path = dir.join(format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension()));
            Ok((path, format))
        }
    }
}
