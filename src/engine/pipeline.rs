// ==========================================
// TIPO DE PROCESO 分类系统 - 处理流水线
// ==========================================
// 流程: 字段解析 → 规则引擎 → 一致性协调 → 结果行
// 状态: 全部放在 PipelineContext,无模块级全局状态
// 进度: 可选 ProgressSink 回调（阶段 + 比例）,不依赖任何 UI
// 并发: 单线程、同步
// ==========================================

use crate::domain::records::ResultRow;
use crate::engine::field_resolver::FieldResolver;
use crate::engine::reconciler::Reconciler;
use crate::engine::rules::ClassificationRules;
use crate::importer::source_loader::LoadedSources;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

// ==========================================
// 进度回调
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Resolviendo,  // 字段解析 0% → 80%
    Clasificando, // 规则引擎 80% → 90%
    Conciliando,  // 一致性协调 90% → 100%
    Completado,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::Resolviendo => "Procesando items",
            PipelineStage::Clasificando => "Aplicando reglas",
            PipelineStage::Conciliando => "Aplicando reglas adicionales",
            PipelineStage::Completado => "¡Completado!",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineProgress {
    pub stage: PipelineStage,
    pub fraction: f64, // 0.0 ..= 1.0
    pub processed: usize,
    pub total: usize,
}

pub trait ProgressSink {
    fn report(&mut self, progress: PipelineProgress);
}

impl<F> ProgressSink for F
where
    F: FnMut(PipelineProgress),
{
    fn report(&mut self, progress: PipelineProgress) {
        self(progress)
    }
}

/// 不关心进度时使用
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _progress: PipelineProgress) {}
}

const RESOLVE_SHARE: f64 = 0.8;
const CLASSIFY_DONE: f64 = 0.9;

// ==========================================
// PipelineContext
// ==========================================
pub struct PipelineContext {
    pub sources: LoadedSources,
    pub rules: ClassificationRules,
}

impl PipelineContext {
    pub fn new(sources: LoadedSources, rules: ClassificationRules) -> Self {
        Self { sources, rules }
    }

    /// 执行整条流水线
    ///
    /// # 返回
    /// - 每个唯一零件号一行,按零件号升序
    #[instrument(skip_all, fields(items = self.sources.report.item_count()))]
    pub fn run(&self, sink: &mut dyn ProgressSink) -> Vec<ResultRow> {
        let total = self.sources.report.item_count();
        info!(total = total, "开始处理报表");

        // 1. 字段解析
        let resolver = FieldResolver::new(&self.sources);
        let mut rows = Vec::with_capacity(total);
        for (idx, item) in self.sources.report.items().enumerate() {
            rows.push(resolver.resolve(item));
            let processed = idx + 1;
            sink.report(PipelineProgress {
                stage: PipelineStage::Resolviendo,
                fraction: RESOLVE_SHARE * processed as f64 / total as f64,
                processed,
                total,
            });
        }
        debug!(rows = rows.len(), "字段解析完成");

        // 2. 规则引擎
        let mut rule_hits = std::collections::HashMap::new();
        let rows: Vec<ResultRow> = rows
            .into_iter()
            .map(|row| {
                let (fields, tag) = self.rules.apply(&row.process_fields());
                *rule_hits.entry(tag).or_insert(0usize) += 1;
                row.with_process_fields(fields)
            })
            .collect();
        debug!(rule_hits = ?rule_hits, "规则引擎完成");
        sink.report(PipelineProgress {
            stage: PipelineStage::Clasificando,
            fraction: CLASSIFY_DONE,
            processed: total,
            total,
        });

        // 3. 一致性协调
        let rows: Vec<ResultRow> = rows
            .into_iter()
            .map(|row| {
                let reconciled = Reconciler::reconcile(&row.process_fields());
                row.with_process_fields(reconciled.fields)
            })
            .collect();
        sink.report(PipelineProgress {
            stage: PipelineStage::Conciliando,
            fraction: 1.0,
            processed: total,
            total,
        });
        sink.report(PipelineProgress {
            stage: PipelineStage::Completado,
            fraction: 1.0,
            processed: total,
            total,
        });

        info!(rows = rows.len(), "报表处理完成");
        rows
    }

    /// 报表中不在通用目录的零件号（升序）
    pub fn new_items(&self) -> Vec<i64> {
        self.sources
            .report
            .items()
            .filter(|item| !self.sources.catalog.contains(&item.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Table;
    use crate::domain::types::labels;
    use crate::importer::source_loader::SourceLoader;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|v| v.to_string()).collect());
        }
        t
    }

    fn context() -> PipelineContext {
        let catalog = table(
            &["EAN", "DESCRIPTION", "CODIGO FORMATO"],
            &[&["123", "Gorra", "NOM004"], &["321", "Camisa", "NOM004"]],
        );
        let compliance = table(
            &["ITEM", "OBSERVACIONES", "CRITERIO"],
            &[&["456", "CUMPLE TOTAL", ""]],
        );
        let report = table(
            &["Num. Parte", "Descripción Agente Aduanal", "NOMs"],
            &[
                &["456", "Playera", "NOM-050-SCFI-2004"],
                &["123", "Gorra", "004"],
                &["ABC", "Sin numero", "050"],
                &["789", "Calcetin", "0"],
            ],
        );
        let sources = SourceLoader::new()
            .load_tables(&catalog, &compliance, &report)
            .unwrap();
        PipelineContext::new(sources, ClassificationRules::default())
    }

    #[test]
    fn test_run_orders_by_item() {
        let rows = context().run(&mut NoProgress);
        let items: Vec<i64> = rows.iter().map(|r| r.item).collect();
        assert_eq!(items, vec![123, 456, 789]);
    }

    #[test]
    fn test_run_end_to_end_values() {
        let rows = context().run(&mut NoProgress);

        assert_eq!(rows[0].tipo_proceso, labels::COSTURA);
        assert_eq!(rows[0].norma, "004");

        assert_eq!(rows[1].tipo_proceso, labels::ADHERIBLE);
        assert_eq!(rows[1].criterio, "");

        assert_eq!(rows[2].tipo_proceso, labels::SIN_NORMA);
        assert_eq!(rows[2].norma, labels::SIN_NORMA);
    }

    #[test]
    fn test_progress_is_monotonic_and_completes() {
        let mut seen = Vec::new();
        let mut sink = |p: PipelineProgress| seen.push(p);
        context().run(&mut sink);

        assert!(seen.windows(2).all(|w| w[0].fraction <= w[1].fraction));
        let last = seen.last().unwrap();
        assert_eq!(last.stage, PipelineStage::Completado);
        assert_eq!(last.fraction, 1.0);
    }

    #[test]
    fn test_new_items() {
        assert_eq!(context().new_items(), vec![456, 789]);
    }
}
