// ==========================================
// 历史表 - JSON 文件实现
// ==========================================
// 格式: 记录数组 [{"ITEM": 123, "TIPO DE PROCESO": ..., ...}]
// ==========================================

use super::HistoryStore;
use crate::domain::records::HistoryRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "历史表不存在,视为空表");
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| RepositoryError::io(&self.path, e))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn overwrite_all(&self, rows: &[HistoryRecord]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RepositoryError::io(parent, e))?;
            }
        }
        let body = serde_json::to_string_pretty(rows)?;
        fs::write(&self.path, body).map_err(|e| RepositoryError::io(&self.path, e))
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
