// ==========================================
// TIPO DE PROCESO 分类系统 - 配置层
// ==========================================
// 职责: 文件路径与分类规则开关
// 存储: config.json
// ==========================================

pub mod config_manager;
pub mod rule_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, AppConfig, ConfigManager, Reglas, Rutas};
pub use rule_config_trait::RuleConfigReader;
