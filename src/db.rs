// ==========================================
// TIPO DE PROCESO 分类系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少偶发 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前历史表结构版本
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 创建历史表（幂等）并登记结构版本
pub fn ensure_history_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS historial_procesos (
            item         INTEGER PRIMARY KEY,
            seq          INTEGER NOT NULL,
            tipo_proceso TEXT NOT NULL DEFAULT '',
            norma        TEXT NOT NULL DEFAULT '',
            criterio     TEXT NOT NULL DEFAULT '',
            descripcion  TEXT NOT NULL DEFAULT '',
            updated_at   TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = open_sqlite_connection(Path::new(":memory:")).unwrap();
        ensure_history_schema(&conn).unwrap();
        ensure_history_schema(&conn).unwrap();

        let (count, version): (i64, i64) = conn
            .query_row("SELECT COUNT(*), MAX(version) FROM schema_version", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }
}
