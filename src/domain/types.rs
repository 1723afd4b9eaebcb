// ==========================================
// TIPO DE PROCESO 分类系统 - 领域类型定义
// ==========================================
// 职责: 分类标签常量、报表版式、数据源标识
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 分类标签 (TIPO DE PROCESO / NORMA / CRITERIO 取值)
// ==========================================
// 说明: TIPO DE PROCESO 允许原样透传目录中的格式代码,
// 因此以字符串承载,这里只定义固定取值
pub mod labels {
    pub const ADHERIBLE: &str = "ADHERIBLE"; // 粘贴标签工艺
    pub const COSTURA: &str = "COSTURA"; // 缝制标签工艺
    pub const SIN_NORMA: &str = "SIN NORMA"; // 无适用标准
    pub const CUMPLE: &str = "CUMPLE"; // 已合规
    pub const NO_CUMPLE: &str = "NO CUMPLE"; // 不合规
    pub const REVISADO: &str = "REVISADO"; // 待复核
    pub const NO_DISPONIBLE: &str = "N/D"; // 数据不可用
    pub const CERO: &str = "0"; // 源数据占位零值
}

// ==========================================
// 报表版式 (Report Layout)
// ==========================================
// 两种已知的商品报表: FH / MIMPO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportLayout {
    Fh,    // 列名 "Número de Parte"
    Mimpo, // 列名 "Num. Parte" 及其变体
}

impl fmt::Display for ReportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLayout::Fh => write!(f, "FH"),
            ReportLayout::Mimpo => write!(f, "MIMPO"),
        }
    }
}

// ==========================================
// 数据源标识 (Source Kind)
// ==========================================
// 用于错误上下文: 指明是哪一个输入出了问题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    BaseGeneral,   // 通用商品目录
    CodigosCumple, // 合规代码目录
    Reporte,       // 商品报表
    Historial,     // 历史表
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::BaseGeneral => write!(f, "BASE GENERAL"),
            SourceKind::CodigosCumple => write!(f, "CODIGOS CUMPLE"),
            SourceKind::Reporte => write!(f, "REPORTE DE MERCANCIA"),
            SourceKind::Historial => write!(f, "HISTORIAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_display() {
        assert_eq!(ReportLayout::Fh.to_string(), "FH");
        assert_eq!(ReportLayout::Mimpo.to_string(), "MIMPO");
    }

    #[test]
    fn test_layout_serde() {
        let json = serde_json::to_string(&ReportLayout::Mimpo).unwrap();
        assert_eq!(json, "\"MIMPO\"");
    }
}
