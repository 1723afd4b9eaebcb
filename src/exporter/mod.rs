// ==========================================
// TIPO DE PROCESO 分类系统 - 导出层
// ==========================================
// 职责: 结果表写出、目录格式转换
// ==========================================

pub mod catalog_converter;
pub mod error;
pub mod result_writer;

pub use catalog_converter::{CatalogConverter, ConversionSummary};
pub use error::{ExportError, ExportResult};
pub use result_writer::{ExportFormat, ResultWriter};
