// ==========================================
// TIPO DE PROCESO 分类系统 - 目录维护 API
// ==========================================
// 职责: 向通用目录 / 合规代码目录登记零件号
// 说明: 仅支持 JSON 记录目录,Excel / CSV 目录需先转换
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use crate::repository::catalog_repo::{CatalogRepository, UpsertOutcome};
use crate::repository::error::RepositoryError;
use std::path::PathBuf;
use tracing::instrument;

pub struct CatalogApi<'a> {
    config: &'a ConfigManager,
}

impl<'a> CatalogApi<'a> {
    pub fn new(config: &'a ConfigManager) -> Self {
        Self { config }
    }

    /// 登记通用目录条目（EAN 已存在则替换）
    #[instrument(skip(self))]
    pub fn add_catalog_item(
        &self,
        item: i64,
        descripcion: &str,
        codigo_formato: &str,
    ) -> ApiResult<UpsertOutcome> {
        validate_item(item)?;
        if codigo_formato.trim().is_empty() {
            return Err(ApiError::InvalidInput("CODIGO FORMATO 不能为空".to_string()));
        }
        let repo = self.repository(config_keys::BASE_GENERAL)?;
        Ok(repo.upsert_catalog_item(item, descripcion, codigo_formato)?)
    }

    /// 登记合规代码条目（ITEM 已存在则替换）
    #[instrument(skip(self))]
    pub fn add_compliance_item(
        &self,
        item: i64,
        observaciones: &str,
        criterio: &str,
    ) -> ApiResult<UpsertOutcome> {
        validate_item(item)?;
        if observaciones.trim().is_empty() {
            return Err(ApiError::InvalidInput("OBSERVACIONES 不能为空".to_string()));
        }
        let repo = self.repository(config_keys::CODIGOS_CUMPLE)?;
        Ok(repo.upsert_compliance_item(item, observaciones, criterio)?)
    }

    fn repository(&self, key: &str) -> ApiResult<CatalogRepository> {
        let value = self.config.get_config_value(key).unwrap_or_default();
        if value.trim().is_empty() {
            return Err(ApiError::PathNotConfigured(key.to_string()));
        }
        CatalogRepository::new(PathBuf::from(value.trim())).map_err(|e| match e {
            RepositoryError::UnsupportedStorage(ext) => ApiError::InvalidInput(format!(
                "目录维护仅支持 .json 目录 ({}: .{})",
                key, ext
            )),
            other => other.into(),
        })
    }
}

fn validate_item(item: i64) -> ApiResult<()> {
    if item <= 0 {
        return Err(ApiError::InvalidInput(format!("零件号必须为正整数: {}", item)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with(base: &str, codigos: &str) -> ConfigManager {
        let mut config = ConfigManager::from_config(Default::default());
        config
            .set_config_value(config_keys::BASE_GENERAL, base)
            .unwrap();
        config
            .set_config_value(config_keys::CODIGOS_CUMPLE, codigos)
            .unwrap();
        config
    }

    #[test]
    fn test_rejects_non_positive_item() {
        let config = config_with("", "");
        let api = CatalogApi::new(&config);
        assert!(matches!(
            api.add_catalog_item(0, "X", "NOM004"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_requires_configured_path() {
        let config = config_with("", "");
        let api = CatalogApi::new(&config);
        assert!(matches!(
            api.add_compliance_item(5, "CUMPLE", ""),
            Err(ApiError::PathNotConfigured(_))
        ));
    }

    #[test]
    fn test_excel_catalog_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("BASE GENERAL.xlsx");
        let config = config_with(&base.to_string_lossy(), "");
        let api = CatalogApi::new(&config);
        assert!(matches!(
            api.add_catalog_item(5, "X", "NOM004"),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
