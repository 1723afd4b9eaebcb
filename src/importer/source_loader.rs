// ==========================================
// TIPO DE PROCESO 分类系统 - 数据源加载器
// ==========================================
// 职责: 三个输入 → 规整后的内存索引
// - 通用目录: EAN(字符串) → CatalogRecord,重复键取第一条
// - 合规目录: ITEM(字符串) → ComplianceRecord,重复键取第一条
// - 商品报表: 零件号(整数) → ReportRow,重复零件号取最后一行
// 说明: 索引只构建一次,逐项查找为 O(1)
// ==========================================

use crate::domain::records::{CatalogRecord, ComplianceRecord, ReportRow};
use crate::domain::table::Table;
use crate::domain::types::SourceKind;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::layout::{LayoutDetector, ReportColumns};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

// 通用目录列名
pub const CATALOG_KEY: &str = "EAN";
pub const CATALOG_DESCRIPTION: &str = "DESCRIPTION";
pub const CATALOG_FORMAT_CODE: &str = "CODIGO FORMATO";

// 合规目录列名
pub const COMPLIANCE_KEY: &str = "ITEM";
pub const COMPLIANCE_OBSERVATIONS: &str = "OBSERVACIONES";
pub const COMPLIANCE_CRITERION_ALIASES: [&str; 2] = ["CRITERIO", "INFORMACION FALTANTE"];

// ==========================================
// CatalogIndex - 通用目录索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    records: HashMap<String, CatalogRecord>,
}

impl CatalogIndex {
    pub fn get(&self, ean: &str) -> Option<&CatalogRecord> {
        self.records.get(ean)
    }

    pub fn contains(&self, ean: &str) -> bool {
        self.records.contains_key(ean)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// ComplianceIndex - 合规目录索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ComplianceIndex {
    records: HashMap<String, ComplianceRecord>,
}

impl ComplianceIndex {
    pub fn get(&self, item: &str) -> Option<&ComplianceRecord> {
        self.records.get(item)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// ReportData - 商品报表索引
// ==========================================
#[derive(Debug, Clone)]
pub struct ReportData {
    pub columns: ReportColumns,
    rows: BTreeMap<i64, ReportRow>,
    pub total_rows: usize,   // 原始数据行数
    pub dropped_rows: usize, // 零件号无法解析而丢弃的行数
}

impl ReportData {
    /// 唯一零件号（升序）
    pub fn items(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.keys().copied()
    }

    pub fn get(&self, item: i64) -> Option<&ReportRow> {
        self.rows.get(&item)
    }

    pub fn item_count(&self) -> usize {
        self.rows.len()
    }
}

// ==========================================
// 路径 / 加载结果
// ==========================================
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub base_general: PathBuf,
    pub codigos_cumple: PathBuf,
    pub reporte: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoadedSources {
    pub catalog: CatalogIndex,
    pub compliance: ComplianceIndex,
    pub report: ReportData,
}

// ==========================================
// SourceLoader
// ==========================================
pub struct SourceLoader {
    cleaner: DataCleaner,
    detector: LayoutDetector,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceLoader {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
            detector: LayoutDetector::new(),
        }
    }

    /// 从文件路径加载三个数据源
    #[instrument(skip(self, paths), fields(reporte = %paths.reporte.display()))]
    pub fn load_from_paths(&self, paths: &SourcePaths) -> ImportResult<LoadedSources> {
        let parser = UniversalFileParser;

        let catalog_table = parser
            .parse(&paths.base_general)
            .map_err(|e| e.in_source(SourceKind::BaseGeneral))?;
        let compliance_table = parser
            .parse(&paths.codigos_cumple)
            .map_err(|e| e.in_source(SourceKind::CodigosCumple))?;
        let report_table = parser
            .parse(&paths.reporte)
            .map_err(|e| e.in_source(SourceKind::Reporte))?;

        self.load_tables(&catalog_table, &compliance_table, &report_table)
    }

    /// 从内存表加载三个数据源
    pub fn load_tables(
        &self,
        catalog: &Table,
        compliance: &Table,
        report: &Table,
    ) -> ImportResult<LoadedSources> {
        let sources = LoadedSources {
            catalog: self.load_catalog(catalog)?,
            compliance: self.load_compliance(compliance)?,
            report: self.load_report(report)?,
        };

        info!(
            catalog = sources.catalog.len(),
            compliance = sources.compliance.len(),
            items = sources.report.item_count(),
            layout = %sources.report.columns.layout,
            "数据源加载完成"
        );
        Ok(sources)
    }

    /// 加载通用目录
    pub fn load_catalog(&self, table: &Table) -> ImportResult<CatalogIndex> {
        let key = self.require_column(table, CATALOG_KEY, SourceKind::BaseGeneral)?;
        let description = self.find_column(table, CATALOG_DESCRIPTION);
        let format_code = self.find_column(table, CATALOG_FORMAT_CODE);

        let mut records = HashMap::new();
        for row in table.rows() {
            let ean = self.cleaner.key_text(&row[key]);
            if ean.is_empty() {
                continue;
            }
            records.entry(ean.clone()).or_insert_with(|| CatalogRecord {
                ean,
                descripcion: self.optional_cell(row, description),
                codigo_formato: self.optional_cell(row, format_code),
            });
        }

        debug!(records = records.len(), "通用目录索引构建完成");
        Ok(CatalogIndex { records })
    }

    /// 加载合规代码目录
    pub fn load_compliance(&self, table: &Table) -> ImportResult<ComplianceIndex> {
        let key = self.require_column(table, COMPLIANCE_KEY, SourceKind::CodigosCumple)?;
        let observations = self.find_column(table, COMPLIANCE_OBSERVATIONS);
        let criterion = COMPLIANCE_CRITERION_ALIASES
            .iter()
            .find_map(|alias| self.find_column(table, alias));

        let mut records = HashMap::new();
        for row in table.rows() {
            let item = self.cleaner.key_text(&row[key]);
            if item.is_empty() {
                continue;
            }
            records.entry(item.clone()).or_insert_with(|| ComplianceRecord {
                item,
                observaciones: self.optional_cell(row, observations),
                criterio: self.optional_cell(row, criterion),
            });
        }

        debug!(records = records.len(), "合规目录索引构建完成");
        Ok(ComplianceIndex { records })
    }

    /// 加载商品报表
    ///
    /// 零件号无法解析为数值的行被静默丢弃（过滤步骤,不是错误）
    pub fn load_report(&self, table: &Table) -> ImportResult<ReportData> {
        let columns = self.detector.detect(table)?;

        let mut rows = BTreeMap::new();
        let mut dropped_rows = 0;
        for row in table.rows() {
            let raw = &row[columns.part_number];
            let Some(item) = self.cleaner.parse_part_number(raw) else {
                debug!(value = %raw, "零件号无法解析,丢弃该行");
                dropped_rows += 1;
                continue;
            };
            rows.insert(
                item,
                ReportRow {
                    item,
                    descripcion: self.cleaner.clean_cell(&row[columns.description]),
                    norma: self.cleaner.clean_cell(&row[columns.norm]),
                },
            );
        }

        debug!(
            layout = %columns.layout,
            items = rows.len(),
            dropped = dropped_rows,
            "商品报表索引构建完成"
        );
        Ok(ReportData {
            columns,
            rows,
            total_rows: table.len(),
            dropped_rows,
        })
    }

    // ==========================================
    // 列定位辅助
    // ==========================================

    fn find_column(&self, table: &Table, column: &str) -> Option<usize> {
        let wanted = self.cleaner.normalize_header(column);
        table
            .column_index(column)
            .or_else(|| table.find_column(|h| self.cleaner.normalize_header(h) == wanted))
    }

    fn require_column(
        &self,
        table: &Table,
        column: &str,
        source_kind: SourceKind,
    ) -> ImportResult<usize> {
        self.find_column(table, column)
            .ok_or_else(|| ImportError::MissingRequiredColumn {
                source_kind,
                column: column.to_string(),
            })
    }

    fn optional_cell(&self, row: &[String], column: Option<usize>) -> String {
        column
            .and_then(|idx| row.get(idx))
            .map(|v| self.cleaner.clean_cell(v))
            .unwrap_or_default()
    }
}
