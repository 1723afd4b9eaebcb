// ==========================================
// TIPO DE PROCESO 分类系统 - 导入层
// ==========================================
// 职责: 外部表格 → 内存索引
// 支持: Excel, CSV, JSON
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod layout;
pub mod source_loader;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, JsonParser, UniversalFileParser};
pub use importer_trait::FileParser;
pub use layout::{LayoutDetector, ReportColumns};
pub use source_loader::{
    CatalogIndex, ComplianceIndex, LoadedSources, ReportData, SourceLoader, SourcePaths,
};
