// ==========================================
// TIPO DE PROCESO 分类系统 - 引擎层
// ==========================================
// 职责: 字段解析、分类规则、一致性协调、历史合并
// 红线: 规则引擎与协调器为纯函数,不做 I/O
// ==========================================

pub mod field_resolver;
pub mod history_merger;
pub mod pipeline;
pub mod reconciler;
pub mod rules;
pub mod summary;

// 重导出核心引擎
pub use field_resolver::FieldResolver;
pub use history_merger::{merge_history, HistoryMerger, MergeOutcome};
pub use pipeline::{
    NoProgress, PipelineContext, PipelineProgress, PipelineStage, ProgressSink,
};
pub use reconciler::{ReconcileStep, Reconciler, Reconciliation, NORMAS_VALIDAS};
pub use rules::{
    normalize_norma, ClassificationRules, ProcessFields, RuleOptions, TipoDecision, TipoRule,
    TipoRuleTag,
};
pub use summary::{ComplianceCatalogStats, RunSummary};
