// ==========================================
// 历史表 - CSV 文件实现
// ==========================================
// 说明: 读取时逐列按文本取值,避免 "004" 之类的标准代码被当作数字
// ==========================================

use super::HistoryStore;
use crate::domain::records::{HistoryRecord, ResultRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for CsvHistoryStore {
    fn load_all(&self) -> RepositoryResult<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let [item_col, tipo_col, norma_col, criterio_col, desc_col] =
            ResultRow::COLUMNS.map(column);
        let item_col = item_col.ok_or_else(|| {
            RepositoryError::DataFormatError(format!("历史表缺少 ITEM 列: {}", self.path.display()))
        })?;

        let cleaner = DataCleaner;
        let text = |record: &csv::StringRecord, col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(|v| cleaner.clean_cell(v))
                .unwrap_or_default()
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let raw_item = record.get(item_col).unwrap_or_default();
            if raw_item.trim().is_empty() {
                continue;
            }
            let item = cleaner.parse_part_number(raw_item).ok_or_else(|| {
                RepositoryError::DataFormatError(format!("历史表 ITEM 无法解析: {}", raw_item))
            })?;
            rows.push(ResultRow {
                item,
                tipo_proceso: text(&record, tipo_col),
                norma: text(&record, norma_col),
                criterio: text(&record, criterio_col),
                descripcion: text(&record, desc_col),
            });
        }
        Ok(rows)
    }

    fn overwrite_all(&self, rows: &[HistoryRecord]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| RepositoryError::io(parent, e))?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        if rows.is_empty() {
            writer.write_record(ResultRow::COLUMNS)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|e| RepositoryError::io(&self.path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_standard_codes_stay_text() {
        let dir = TempDir::new().unwrap();
        let store = CsvHistoryStore::new(dir.path().join("h.csv"));
        let row = ResultRow {
            item: 42,
            tipo_proceso: "COSTURA".to_string(),
            norma: "004".to_string(),
            criterio: String::new(),
            descripcion: "Gorra, roja".to_string(),
        };
        store.overwrite_all(std::slice::from_ref(&row)).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![row]);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.csv");
        CsvHistoryStore::new(&path).overwrite_all(&[]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ITEM,TIPO DE PROCESO,NORMA,CRITERIO,DESCRIPCION"));
        assert!(CsvHistoryStore::new(&path).load_all().unwrap().is_empty());
    }
}
