// ==========================================
// TIPO DE PROCESO 分类系统 - 报表版式识别
// ==========================================
// 职责: 根据列名判定报表版式（FH / MIMPO）并定位三列:
//       零件号列 / 描述列 / 标准(NOM)列
// 规则（按优先级）:
// 1. 存在精确列名 "Número de Parte" → FH
// 2. 存在规整后等于 num. parte / num.parte / numero de parte 的列 → MIMPO
// 3. 否则 → LayoutNotRecognized
// ==========================================

use crate::domain::table::Table;
use crate::domain::types::{ReportLayout, SourceKind};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};

// FH 版式列名
pub const FH_PART_NUMBER: &str = "Número de Parte";
pub const FH_DESCRIPTION: &str = "Desc. Pedimento";
pub const FH_NORM: &str = "Normas";

// MIMPO 版式列名
pub const MIMPO_PART_NUMBER_ALIASES: [&str; 3] = ["num. parte", "num.parte", "numero de parte"];
pub const MIMPO_DESCRIPTION: &str = "descripción agente aduanal";
pub const MIMPO_NORM: &str = "NOMs";

/// 识别结果: 版式 + 三列下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportColumns {
    pub layout: ReportLayout,
    pub part_number: usize,
    pub description: usize,
    pub norm: usize,
}

pub struct LayoutDetector {
    cleaner: DataCleaner,
}

impl Default for LayoutDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutDetector {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 识别报表版式
    pub fn detect(&self, report: &Table) -> ImportResult<ReportColumns> {
        if let Some(part_number) = report.column_index(FH_PART_NUMBER) {
            let description = self.require(report, FH_DESCRIPTION)?;
            let norm = self.require(report, FH_NORM)?;
            return Ok(ReportColumns {
                layout: ReportLayout::Fh,
                part_number,
                description,
                norm,
            });
        }

        let mimpo_part_number = report.find_column(|h| {
            MIMPO_PART_NUMBER_ALIASES.contains(&self.cleaner.normalize_header(h).as_str())
        });
        if let Some(part_number) = mimpo_part_number {
            let description = report
                .find_column(|h| self.cleaner.normalize_header(h) == MIMPO_DESCRIPTION)
                .ok_or_else(|| ImportError::MissingRequiredColumn {
                    source_kind: SourceKind::Reporte,
                    column: MIMPO_DESCRIPTION.to_string(),
                })?;
            let norm = self.require(report, MIMPO_NORM)?;
            return Ok(ReportColumns {
                layout: ReportLayout::Mimpo,
                part_number,
                description,
                norm,
            });
        }

        Err(ImportError::LayoutNotRecognized {
            columns: report.headers().to_vec(),
        })
    }

    /// 定位必需列: 先精确匹配,再做去空白/不区分大小写匹配
    fn require(&self, report: &Table, column: &str) -> ImportResult<usize> {
        let wanted = self.cleaner.normalize_header(column);
        report
            .column_index(column)
            .or_else(|| report.find_column(|h| self.cleaner.normalize_header(h) == wanted))
            .ok_or_else(|| ImportError::MissingRequiredColumn {
                source_kind: SourceKind::Reporte,
                column: column.to_string(),
            })
    }
}
