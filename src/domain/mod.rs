// ==========================================
// TIPO DE PROCESO 分类系统 - 领域层
// ==========================================
// 职责: 实体、类型、内存表
// ==========================================

pub mod records;
pub mod table;
pub mod types;

pub use records::{
    CatalogRecord, ComplianceRecord, HistoryRecord, ProcessedFile, ReportRow, ResultRow,
};
pub use table::Table;
pub use types::{labels, ReportLayout, SourceKind};
