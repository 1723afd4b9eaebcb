// ==========================================
// TIPO DE PROCESO 分类系统 - 持久化层
// ==========================================
// 职责: 历史表存储、已处理报表登记、目录维护
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod catalog_repo;
pub mod error;
pub mod history_repo;
pub mod processed_file_repo;

// 重导出核心仓储
pub use catalog_repo::{CatalogRepository, UpsertOutcome};
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::{
    open_history_store, CsvHistoryStore, HistoryStore, JsonHistoryStore, SqliteHistoryStore,
};
pub use processed_file_repo::{ProcessedFileRepository, ProcessedFileStats};
