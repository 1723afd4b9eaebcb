// ==========================================
// TIPO DE PROCESO 分类系统 - 规则配置读取 Trait
// ==========================================
// 职责: 定义分类引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// RuleConfigReader Trait
// ==========================================
// 用途: 分类引擎所需的配置读取接口
// 实现者: ConfigManager（从 config.json 读取）
pub trait RuleConfigReader {
    /// 获取 NORMA 含裸 "TEXX"（无 NOM004 前缀）时的 TIPO DE PROCESO
    ///
    /// # 返回
    /// - "ADHERIBLE" 或 "COSTURA"
    ///
    /// # 默认值
    /// - ADHERIBLE
    fn get_texx_norma_tipo(&self) -> Result<String, Box<dyn Error>>;

    /// CRITERIO 规整时是否启用单字母 "C" 子串匹配
    ///
    /// # 默认值
    /// - true（保持与既有报表一致）
    ///
    /// # 说明
    /// - 几乎所有非空文本都含字母 C,关闭后只匹配 CUMPLE / REVISADO
    fn get_criterio_c_suelta(&self) -> Result<bool, Box<dyn Error>>;
}
