// ==========================================
// 历史表 - SQLite 实现
// ==========================================
// 表: historial_procesos（item INTEGER PRIMARY KEY）
// 顺序: seq 列保存整表覆写时的行位置
// ==========================================

use super::HistoryStore;
use crate::db::{ensure_history_schema, open_sqlite_connection};
use crate::domain::records::{HistoryRecord, ResultRow};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SqliteHistoryStore {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl SqliteHistoryStore {
    /// 打开数据库并确保表结构存在
    pub fn new(db_path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = db_path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| RepositoryError::io(parent, e))?;
            }
        }
        let conn = open_sqlite_connection(&path)?;
        ensure_history_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT item, tipo_proceso, norma, criterio, descripcion
            FROM historial_procesos
            ORDER BY seq ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ResultRow {
                    item: row.get(0)?,
                    tipo_proceso: row.get(1)?,
                    norma: row.get(2)?,
                    criterio: row.get(3)?,
                    descripcion: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn overwrite_all(&self, rows: &[HistoryRecord]) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let updated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        tx.execute("DELETE FROM historial_procesos", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT OR REPLACE INTO historial_procesos (
                    item, seq, tipo_proceso, norma, criterio, descripcion, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for (seq, row) in rows.iter().enumerate() {
                stmt.execute(params![
                    row.item,
                    seq as i64,
                    row.tipo_proceso,
                    row.norma,
                    row.criterio,
                    row.descripcion,
                    updated_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(item: i64, norma: &str) -> ResultRow {
        ResultRow {
            item,
            tipo_proceso: "COSTURA".to_string(),
            norma: norma.to_string(),
            criterio: String::new(),
            descripcion: "Gorra".to_string(),
        }
    }

    #[test]
    fn test_overwrite_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = SqliteHistoryStore::new(dir.path().join("historial.db")).unwrap();

        store.overwrite_all(&[row(9, "004"), row(1, "020")]).unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![row(9, "004"), row(1, "020")]);

        store.overwrite_all(&[row(5, "050")]).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![row(5, "050")]);
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datos").join("historial.sqlite");
        SqliteHistoryStore::new(&path)
            .unwrap()
            .overwrite_all(&[row(3, "004")])
            .unwrap();

        let reopened = SqliteHistoryStore::new(&path).unwrap();
        assert_eq!(reopened.load_all().unwrap(), vec![row(3, "004")]);
    }
}
