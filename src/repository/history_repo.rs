// ==========================================
// TIPO DE PROCESO 分类系统 - 历史表仓储
// ==========================================
// 职责: 历史表的整表加载 / 整表覆写（ITEM 唯一）
// 实现: JSON 文件、CSV 文件、SQLite
// 红线: 仓储不含合并逻辑（见 engine::history_merger）
// ==========================================

mod csv_store;
mod json_store;
mod sqlite_store;

pub use csv_store::CsvHistoryStore;
pub use json_store::JsonHistoryStore;
pub use sqlite_store::SqliteHistoryStore;

use crate::domain::records::HistoryRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::path::Path;

// ==========================================
// HistoryStore Trait
// ==========================================
pub trait HistoryStore {
    /// 加载整张历史表（首次运行返回空表）
    fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>>;

    /// 整表覆写
    fn overwrite_all(&self, rows: &[HistoryRecord]) -> RepositoryResult<()>;

    /// 用于日志 / 运行报告
    fn describe(&self) -> String;
}

/// 按扩展名选择历史表实现
///
/// - .json → JsonHistoryStore
/// - .csv → CsvHistoryStore
/// - .db / .sqlite / .sqlite3 → SqliteHistoryStore
pub fn open_history_store(path: &Path) -> RepositoryResult<Box<dyn HistoryStore>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => Ok(Box::new(JsonHistoryStore::new(path))),
        "csv" => Ok(Box::new(CsvHistoryStore::new(path))),
        "db" | "sqlite" | "sqlite3" => Ok(Box::new(SqliteHistoryStore::new(path)?)),
        _ => Err(RepositoryError::UnsupportedStorage(ext)),
    }
}
