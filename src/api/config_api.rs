// ==========================================
// TIPO DE PROCESO 分类系统 - 配置管理 API
// ==========================================
// 职责: 配置查询、更新（立即落盘）、快照
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::{config_keys, ConfigManager};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

pub struct ConfigApi<'a> {
    config_manager: &'a mut ConfigManager,
}

impl<'a> ConfigApi<'a> {
    pub fn new(config_manager: &'a mut ConfigManager) -> Self {
        Self { config_manager }
    }

    /// 查询所有配置
    pub fn list_configs(&self) -> Vec<ConfigItem> {
        config_keys::ALL
            .iter()
            .map(|key| ConfigItem {
                key: key.to_string(),
                value: self
                    .config_manager
                    .get_config_value(key)
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// 查询单个配置
    pub fn get_config(&self, key: &str) -> ApiResult<String> {
        self.config_manager
            .get_config_value(key)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知配置键: {}", key)))
    }

    /// 更新单个配置并保存
    pub fn update_config(&mut self, key: &str, value: &str) -> ApiResult<()> {
        self.config_manager
            .set_config_value(key, value)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.config_manager
            .save()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        info!(key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 清空文件路径配置并保存
    pub fn clear_paths(&mut self) -> ApiResult<()> {
        self.config_manager.clear_rutas();
        self.config_manager
            .save()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        self.config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_update_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut manager = ConfigManager::load_or_init(&path).unwrap();

        let mut api = ConfigApi::new(&mut manager);
        api.update_config(config_keys::BASE_GENERAL, "base_general.json")
            .unwrap();
        assert_eq!(api.list_configs().len(), config_keys::ALL.len());
        assert!(api.update_config("reglas.otra", "x").is_err());

        let reloaded = ConfigManager::load_or_init(&path).unwrap();
        assert_eq!(reloaded.config().rutas.base_general, "base_general.json");
    }
}
