// ==========================================
// TIPO DE PROCESO 分类系统 - 已处理报表登记仓储
// ==========================================
// 存储: archivos_procesados.json（ProcessedFile 数组）
// 规则: 同名报表只登记一次;文件不存在时视为空列表并创建
// ==========================================

use crate::domain::records::ProcessedFile;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 最近处理列表长度
pub const RECENT_FILES: usize = 5;

/// 无记录时 ultimo_proceso 的显示值
pub const NINGUNO: &str = "Ninguno";

/// 登记统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFileStats {
    pub total_archivos: usize,
    pub archivos_recientes: Vec<ProcessedFile>,
    pub ultimo_proceso: String,
}

pub struct ProcessedFileRepository {
    path: PathBuf,
}

impl ProcessedFileRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 加载登记列表,文件不存在时创建空列表
    pub fn load(&self) -> RepositoryResult<Vec<ProcessedFile>> {
        if !self.path.exists() {
            self.save(&[])?;
            debug!(path = %self.path.display(), "登记文件不存在,已创建空列表");
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| RepositoryError::io(&self.path, e))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// 登记一个已处理报表
    ///
    /// # 返回
    /// - Ok(true): 新登记
    /// - Ok(false): 同名报表已登记
    pub fn register(&self, nombre: &str, fecha_proceso: &str) -> RepositoryResult<bool> {
        let mut files = self.load()?;
        if files.iter().any(|f| f.nombre == nombre) {
            debug!(nombre = nombre, "报表已登记,跳过");
            return Ok(false);
        }

        files.push(ProcessedFile {
            nombre: nombre.to_string(),
            fecha_proceso: fecha_proceso.to_string(),
            fecha_archivo: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
        self.save(&files)?;
        info!(nombre = nombre, total = files.len(), "报表已登记");
        Ok(true)
    }

    pub fn stats(&self) -> RepositoryResult<ProcessedFileStats> {
        let files = self.load()?;
        let recent_start = files.len().saturating_sub(RECENT_FILES);
        Ok(ProcessedFileStats {
            total_archivos: files.len(),
            archivos_recientes: files[recent_start..].to_vec(),
            ultimo_proceso: files
                .last()
                .map(|f| f.fecha_proceso.clone())
                .unwrap_or_else(|| NINGUNO.to_string()),
        })
    }

    /// 清空登记列表
    pub fn clear(&self) -> RepositoryResult<()> {
        self.save(&[])?;
        info!(path = %self.path.display(), "登记列表已清空");
        Ok(())
    }

    fn save(&self, files: &[ProcessedFile]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RepositoryError::io(parent, e))?;
            }
        }
        let body = serde_json::to_string_pretty(files)?;
        fs::write(&self.path, body).map_err(|e| RepositoryError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_stats() {
        let dir = TempDir::new().unwrap();
        let repo = ProcessedFileRepository::new(dir.path().join("archivos_procesados.json"));
        let stats = repo.stats().unwrap();
        assert_eq!(stats.total_archivos, 0);
        assert_eq!(stats.ultimo_proceso, NINGUNO);
        assert!(dir.path().join("archivos_procesados.json").exists());
    }

    #[test]
    fn test_register_skips_duplicate_names() {
        let dir = TempDir::new().unwrap();
        let repo = ProcessedFileRepository::new(dir.path().join("a.json"));
        assert!(repo.register("reporte_fh.xlsx", "2026-01-02 10:00:00").unwrap());
        assert!(!repo.register("reporte_fh.xlsx", "2026-01-03 10:00:00").unwrap());
        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[test]
    fn test_stats_keeps_last_five() {
        let dir = TempDir::new().unwrap();
        let repo = ProcessedFileRepository::new(dir.path().join("a.json"));
        for i in 0..7 {
            repo.register(&format!("r{i}.xlsx"), &format!("2026-01-0{} 08:00:00", i + 1))
                .unwrap();
        }
        let stats = repo.stats().unwrap();
        assert_eq!(stats.total_archivos, 7);
        assert_eq!(stats.archivos_recientes.len(), 5);
        assert_eq!(stats.archivos_recientes[0].nombre, "r2.xlsx");
        assert_eq!(stats.ultimo_proceso, "2026-01-07 08:00:00");

        repo.clear().unwrap();
        assert_eq!(repo.stats().unwrap().total_archivos, 0);
    }
}
