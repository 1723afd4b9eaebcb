// ==========================================
// TIPO DE PROCESO 分类系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config.json（rutas + reglas）
// 说明: 配置文件不存在时写入默认配置
// ==========================================

use crate::config::rule_config_trait::RuleConfigReader;
use crate::domain::types::labels;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 默认历史表文件名
pub const DEFAULT_HISTORY_FILE: &str = "HISTORIAL_PROCESOS.json";

/// 默认已处理报表登记文件名
pub const DEFAULT_PROCESSED_FILES_FILE: &str = "archivos_procesados.json";

// ==========================================
// AppConfig - 配置文档
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub rutas: Rutas,

    #[serde(default)]
    pub reglas: Reglas,
}

/// 文件路径配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rutas {
    #[serde(default)]
    pub base_general: String,

    #[serde(default)]
    pub codigos_cumple: String,

    /// 历史表路径（.json / .csv / .db）,空则放在配置目录下
    #[serde(default)]
    pub historial: String,

    #[serde(default)]
    pub archivos_procesados: String,
}

/// 分类规则开关
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reglas {
    #[serde(default = "default_texx_norma_tipo")]
    pub texx_norma_tipo: String,

    #[serde(default = "default_criterio_c_suelta")]
    pub criterio_c_suelta: bool,
}

fn default_texx_norma_tipo() -> String {
    labels::ADHERIBLE.to_string()
}

fn default_criterio_c_suelta() -> bool {
    true
}

impl Default for Reglas {
    fn default() -> Self {
        Self {
            texx_norma_tipo: default_texx_norma_tipo(),
            criterio_c_suelta: default_criterio_c_suelta(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: Option<PathBuf>,
    config: AppConfig,
}

impl ConfigManager {
    /// 加载配置文件,不存在时写入默认配置
    ///
    /// # 参数
    /// - path: config.json 路径
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref().to_path_buf();

        let config = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let config: AppConfig = serde_json::from_str(&raw)?;
            debug!(path = %path.display(), "配置已加载");
            config
        } else {
            let config = AppConfig::default();
            write_config(&path, &config)?;
            info!(path = %path.display(), "配置文件不存在,已创建默认配置");
            config
        };

        Ok(Self {
            path: Some(path),
            config,
        })
    }

    /// 从内存配置创建（不落盘）
    pub fn from_config(config: AppConfig) -> Self {
        Self { path: None, config }
    }

    /// 默认配置文件路径: <系统配置目录>/tipo-proceso/config.json
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tipo-proceso")
            .join("config.json")
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 数据目录: 配置文件所在目录（内存配置为当前目录）
    pub fn data_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// 历史表路径
    pub fn historial_path(&self) -> PathBuf {
        self.resolve_or_default(&self.config.rutas.historial, DEFAULT_HISTORY_FILE)
    }

    /// 已处理报表登记路径
    pub fn archivos_procesados_path(&self) -> PathBuf {
        self.resolve_or_default(
            &self.config.rutas.archivos_procesados,
            DEFAULT_PROCESSED_FILES_FILE,
        )
    }

    fn resolve_or_default(&self, configured: &str, default_name: &str) -> PathBuf {
        let configured = configured.trim();
        if configured.is_empty() {
            self.data_dir().join(default_name)
        } else {
            PathBuf::from(configured)
        }
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 未知键
    pub fn get_config_value(&self, key: &str) -> Option<String> {
        let c = &self.config;
        let value = match key {
            config_keys::BASE_GENERAL => c.rutas.base_general.clone(),
            config_keys::CODIGOS_CUMPLE => c.rutas.codigos_cumple.clone(),
            config_keys::HISTORIAL => c.rutas.historial.clone(),
            config_keys::ARCHIVOS_PROCESADOS => c.rutas.archivos_procesados.clone(),
            config_keys::TEXX_NORMA_TIPO => c.reglas.texx_norma_tipo.clone(),
            config_keys::CRITERIO_C_SUELTA => c.reglas.criterio_c_suelta.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// 更新配置值（仅内存,需调用 save 落盘）
    pub fn set_config_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let value = value.trim();
        let c = &mut self.config;
        match key {
            config_keys::BASE_GENERAL => c.rutas.base_general = value.to_string(),
            config_keys::CODIGOS_CUMPLE => c.rutas.codigos_cumple = value.to_string(),
            config_keys::HISTORIAL => c.rutas.historial = value.to_string(),
            config_keys::ARCHIVOS_PROCESADOS => c.rutas.archivos_procesados = value.to_string(),
            config_keys::TEXX_NORMA_TIPO => {
                let upper = value.to_uppercase();
                if upper != labels::ADHERIBLE && upper != labels::COSTURA {
                    return Err(format!(
                        "配置值格式错误 ({}): {}（仅支持 ADHERIBLE / COSTURA）",
                        key, value
                    )
                    .into());
                }
                c.reglas.texx_norma_tipo = upper;
            }
            config_keys::CRITERIO_C_SUELTA => {
                c.reglas.criterio_c_suelta = parse_bool(value)
                    .ok_or_else(|| format!("配置值格式错误 ({}): {}", key, value))?;
            }
            _ => return Err(format!("未知配置键: {}", key).into()),
        }
        Ok(())
    }

    /// 清空文件路径配置（规则开关保留）
    pub fn clear_rutas(&mut self) {
        self.config.rutas = Rutas::default();
    }

    /// 应用环境变量覆写
    ///
    /// - TIPO_PROCESO_BASE_GENERAL
    /// - TIPO_PROCESO_CODIGOS_CUMPLE
    /// - TIPO_PROCESO_HISTORIAL
    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            ("TIPO_PROCESO_BASE_GENERAL", config_keys::BASE_GENERAL),
            ("TIPO_PROCESO_CODIGOS_CUMPLE", config_keys::CODIGOS_CUMPLE),
            ("TIPO_PROCESO_HISTORIAL", config_keys::HISTORIAL),
        ];
        for (var, key) in overrides {
            if let Ok(value) = std::env::var(var) {
                if value.trim().is_empty() {
                    continue;
                }
                debug!(env = var, key = key, "环境变量覆写配置");
                if let Err(e) = self.set_config_value(key, &value) {
                    warn!(env = var, error = %e, "环境变量覆写失败");
                }
            }
        }
    }

    /// 保存配置
    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let path = self
            .path
            .as_deref()
            .ok_or("内存配置无文件路径,无法保存")?;
        write_config(path, &self.config)?;
        info!(path = %path.display(), "配置已保存");
        Ok(())
    }

    /// 获取配置快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" | "si" | "sí" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

// ==========================================
// RuleConfigReader Trait 实现
// ==========================================
impl RuleConfigReader for ConfigManager {
    fn get_texx_norma_tipo(&self) -> Result<String, Box<dyn Error>> {
        let value = self.config.reglas.texx_norma_tipo.trim().to_uppercase();
        if value == labels::ADHERIBLE || value == labels::COSTURA {
            Ok(value)
        } else {
            warn!(
                config_key = config_keys::TEXX_NORMA_TIPO,
                raw_value = %value,
                "TEXX 规则配置无效,使用 ADHERIBLE"
            );
            Ok(labels::ADHERIBLE.to_string())
        }
    }

    fn get_criterio_c_suelta(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self.config.reglas.criterio_c_suelta)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 文件路径
    pub const BASE_GENERAL: &str = "rutas.base_general";
    pub const CODIGOS_CUMPLE: &str = "rutas.codigos_cumple";
    pub const HISTORIAL: &str = "rutas.historial";
    pub const ARCHIVOS_PROCESADOS: &str = "rutas.archivos_procesados";

    // 分类规则
    pub const TEXX_NORMA_TIPO: &str = "reglas.texx_norma_tipo";
    pub const CRITERIO_C_SUELTA: &str = "reglas.criterio_c_suelta";

    pub const ALL: [&str; 6] = [
        BASE_GENERAL,
        CODIGOS_CUMPLE,
        HISTORIAL,
        ARCHIVOS_PROCESADOS,
        TEXX_NORMA_TIPO,
        CRITERIO_C_SUELTA,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_init_creates_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Guardar Configuracion").join("config.json");

        let manager = ConfigManager::load_or_init(&path).unwrap();

        assert!(path.exists());
        assert_eq!(manager.config(), &AppConfig::default());
        assert_eq!(
            manager.historial_path(),
            dir.path().join("Guardar Configuracion").join(DEFAULT_HISTORY_FILE)
        );
    }

    #[test]
    fn test_legacy_document_without_reglas() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"rutas": {"base_general": "base.json", "codigos_cumple": "codigos.xlsx"}}"#,
        )
        .unwrap();

        let manager = ConfigManager::load_or_init(&path).unwrap();
        assert_eq!(manager.config().rutas.base_general, "base.json");
        assert_eq!(manager.config().reglas, Reglas::default());
    }

    #[test]
    fn test_set_and_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut manager = ConfigManager::load_or_init(&path).unwrap();
        manager
            .set_config_value(config_keys::TEXX_NORMA_TIPO, "costura")
            .unwrap();
        manager
            .set_config_value(config_keys::CRITERIO_C_SUELTA, "false")
            .unwrap();
        manager.save().unwrap();

        let reloaded = ConfigManager::load_or_init(&path).unwrap();
        assert_eq!(reloaded.get_texx_norma_tipo().unwrap(), "COSTURA");
        assert!(!reloaded.get_criterio_c_suelta().unwrap());
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut manager = ConfigManager::from_config(AppConfig::default());
        assert!(manager
            .set_config_value(config_keys::TEXX_NORMA_TIPO, "SIN NORMA")
            .is_err());
        assert!(manager
            .set_config_value(config_keys::CRITERIO_C_SUELTA, "quizas")
            .is_err());
        assert!(manager.set_config_value("rutas.otra", "x").is_err());
    }

    #[test]
    fn test_get_config_value_all_keys() {
        let manager = ConfigManager::from_config(AppConfig::default());
        for key in config_keys::ALL {
            assert!(manager.get_config_value(key).is_some(), "key {key}");
        }
        assert_eq!(manager.get_config_value("desconocido"), None);
    }

    #[test]
    fn test_save_without_path_fails() {
        let manager = ConfigManager::from_config(AppConfig::default());
        assert!(manager.save().is_err());
    }

    #[test]
    fn test_clear_rutas_keeps_reglas() {
        let mut config = AppConfig::default();
        config.rutas.base_general = "base.json".to_string();
        config.reglas.criterio_c_suelta = false;
        let mut manager = ConfigManager::from_config(config);

        manager.clear_rutas();
        assert_eq!(manager.config().rutas, Rutas::default());
        assert!(!manager.config().reglas.criterio_c_suelta);
    }
}
