// ==========================================
// TIPO DE PROCESO 分类系统 - 汇总统计
// ==========================================
// 职责: 为展示层提供聚合计数
// - RunSummary: 单次运行结果（按 TIPO / CRITERIO 计数）
// - ComplianceCatalogStats: 合规代码目录（CUMPLE / 已复核占比）
// ==========================================

use crate::domain::records::ResultRow;
use crate::domain::table::Table;
use crate::domain::types::{labels, SourceKind};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::source_loader::{COMPLIANCE_KEY, COMPLIANCE_OBSERVATIONS};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

// ==========================================
// RunSummary
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub por_tipo: BTreeMap<String, usize>,
    pub por_criterio: BTreeMap<String, usize>,
    pub criterio_cumple: usize,   // CRITERIO == "CUMPLE"
    pub criterio_revisado: usize, // CRITERIO == "REVISADO"
}

impl RunSummary {
    pub fn from_rows(rows: &[ResultRow]) -> Self {
        let mut summary = RunSummary {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            *summary
                .por_tipo
                .entry(row.tipo_proceso.clone())
                .or_insert(0) += 1;
            *summary
                .por_criterio
                .entry(row.criterio.clone())
                .or_insert(0) += 1;
            if row.criterio == labels::CUMPLE {
                summary.criterio_cumple += 1;
            } else if row.criterio == labels::REVISADO {
                summary.criterio_revisado += 1;
            }
        }
        summary
    }
}

// ==========================================
// ComplianceCatalogStats
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceCatalogStats {
    pub total_codigos: usize,
    pub codigos_cumple: usize,
    pub codigos_revisados: usize,
    pub porcentaje_cumple: f64,
    pub porcentaje_revisados: f64,
}

impl ComplianceCatalogStats {
    /// 统计合规目录原始行（不去重,表格来源: Excel / CSV）
    ///
    /// # 规则
    /// - 每一行都带 ITEM 列,全部计入
    /// - OBSERVACIONES 大写后（不去空白）恰为 CUMPLE → 合规,其余 → 已复核
    pub fn from_table(table: &Table) -> ImportResult<Self> {
        let cleaner = DataCleaner;
        let find = |name: &str| {
            let wanted = cleaner.normalize_header(name);
            table.find_column(|h| cleaner.normalize_header(h) == wanted)
        };
        find(COMPLIANCE_KEY).ok_or_else(|| ImportError::MissingRequiredColumn {
            source_kind: SourceKind::CodigosCumple,
            column: COMPLIANCE_KEY.to_string(),
        })?;
        let obs_col = find(COMPLIANCE_OBSERVATIONS);

        let cumple = (0..table.len())
            .filter(|&row| {
                obs_col.is_some_and(|c| table.cell(row, c).to_uppercase() == labels::CUMPLE)
            })
            .count();
        Ok(Self::from_counts(table.len(), cumple))
    }

    /// 统计 JSON 记录数组（或 {"data": [...]} 包装）
    ///
    /// # 规则
    /// - 只计入带 ITEM 键的对象（值可为空）
    /// - OBSERVACIONES 为文本且大写后恰为 CUMPLE → 合规
    pub fn from_json_records(document: &Value) -> ImportResult<Self> {
        let records = match document {
            Value::Array(records) => records,
            Value::Object(map) => map
                .get("data")
                .and_then(Value::as_array)
                .ok_or_else(|| ImportError::JsonParseError("JSON 对象缺少 data 数组".to_string()))?,
            _ => {
                return Err(ImportError::JsonParseError(
                    "JSON 顶层必须是记录数组".to_string(),
                ))
            }
        };

        let mut total = 0;
        let mut cumple = 0;
        for record in records {
            let Value::Object(map) = record else {
                continue;
            };
            if !map.contains_key(COMPLIANCE_KEY) {
                continue;
            }
            total += 1;
            let obs = map
                .get(COMPLIANCE_OBSERVATIONS)
                .and_then(Value::as_str)
                .map(str::to_uppercase)
                .unwrap_or_default();
            if obs == labels::CUMPLE {
                cumple += 1;
            }
        }
        Ok(Self::from_counts(total, cumple))
    }

    pub fn from_counts(total_codigos: usize, codigos_cumple: usize) -> Self {
        let codigos_revisados = total_codigos.saturating_sub(codigos_cumple);
        let pct = |n: usize| {
            if total_codigos == 0 {
                0.0
            } else {
                n as f64 / total_codigos as f64 * 100.0
            }
        };
        Self {
            total_codigos,
            codigos_cumple,
            codigos_revisados,
            porcentaje_cumple: pct(codigos_cumple),
            porcentaje_revisados: pct(codigos_revisados),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(item: i64, tipo: &str, criterio: &str) -> ResultRow {
        ResultRow {
            item,
            tipo_proceso: tipo.to_string(),
            norma: String::new(),
            criterio: criterio.to_string(),
            descripcion: String::new(),
        }
    }

    #[test]
    fn test_run_summary_counts() {
        let rows = vec![
            row(1, labels::COSTURA, ""),
            row(2, labels::COSTURA, labels::REVISADO),
            row(3, labels::CUMPLE, ""),
            row(4, labels::SIN_NORMA, "N/D"),
        ];
        let summary = RunSummary::from_rows(&rows);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.por_tipo.get(labels::COSTURA), Some(&2));
        assert_eq!(summary.por_tipo.get(labels::ADHERIBLE), None);
        assert_eq!(summary.criterio_revisado, 1);
        assert_eq!(summary.criterio_cumple, 0);
        assert_eq!(summary.por_criterio.get(""), Some(&2));
    }

    #[test]
    fn test_compliance_stats_from_table() {
        let mut table = Table::new(vec!["ITEM".to_string(), "OBSERVACIONES".to_string()]);
        for (item, obs) in [("1", "cumple"), ("2", "CUMPLE TOTAL"), ("3", ""), ("", "CUMPLE")] {
            table.push_row(vec![item.to_string(), obs.to_string()]);
        }
        let stats = ComplianceCatalogStats::from_table(&table).unwrap();

        assert_eq!(stats.total_codigos, 4);
        assert_eq!(stats.codigos_cumple, 2);
        assert_eq!(stats.codigos_revisados, 2);
        assert!((stats.porcentaje_cumple - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_compliance_stats_from_json_records() {
        let document = json!([
            {"ITEM": 1, "OBSERVACIONES": "cumple"},
            {"ITEM": 2, "OBSERVACIONES": " CUMPLE "},
            {"ITEM": "", "OBSERVACIONES": "CUMPLE"},
            {"ITEM": null},
            {"OBSERVACIONES": "CUMPLE"},
            "texto suelto"
        ]);
        let stats = ComplianceCatalogStats::from_json_records(&document).unwrap();

        // 空 ITEM 也计入;带空白的 " CUMPLE " 不算合规
        assert_eq!(stats.total_codigos, 4);
        assert_eq!(stats.codigos_cumple, 2);
        assert_eq!(stats.codigos_revisados, 2);

        let wrapped = json!({"columns": ["ITEM"], "data": [{"ITEM": 9, "OBSERVACIONES": "CUMPLE"}]});
        let stats = ComplianceCatalogStats::from_json_records(&wrapped).unwrap();
        assert_eq!((stats.total_codigos, stats.codigos_cumple), (1, 1));
    }

    #[test]
    fn test_compliance_stats_empty() {
        let stats = ComplianceCatalogStats::from_counts(0, 0);
        assert_eq!(stats.porcentaje_cumple, 0.0);
        assert_eq!(stats.porcentaje_revisados, 0.0);
    }
}
