// ==========================================
// TIPO DE PROCESO 分类系统 - 记录实体
// ==========================================
// 职责: 三个数据源的记录结构 + 输出结果行 + 历史记录
// 红线: ITEM 始终为整数,任何持久化往返都不得变成浮点
// ==========================================

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CatalogRecord - 通用商品目录记录
// ==========================================
// 主键: EAN（按字符串精确比较）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub ean: String,
    pub descripcion: String,    // DESCRIPTION
    pub codigo_formato: String, // CODIGO FORMATO（如 NOM004TEXX）
}

// ==========================================
// ComplianceRecord - 合规代码目录记录
// ==========================================
// 主键: ITEM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRecord {
    pub item: String,
    pub observaciones: String, // OBSERVACIONES
    pub criterio: String,      // CRITERIO / INFORMACION FALTANTE
}

// ==========================================
// ReportRow - 商品报表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub item: i64,
    pub descripcion: String,
    pub norma: String,
}

// ==========================================
// ResultRow - 输出结果行
// ==========================================
// 列顺序: ITEM, TIPO DE PROCESO, NORMA, CRITERIO, DESCRIPCION
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "ITEM", deserialize_with = "deserialize_item")]
    pub item: i64,

    #[serde(rename = "TIPO DE PROCESO", default, deserialize_with = "deserialize_text")]
    pub tipo_proceso: String,

    #[serde(rename = "NORMA", default, deserialize_with = "deserialize_text")]
    pub norma: String,

    #[serde(rename = "CRITERIO", default, deserialize_with = "deserialize_text")]
    pub criterio: String,

    #[serde(rename = "DESCRIPCION", default, deserialize_with = "deserialize_text")]
    pub descripcion: String,
}

impl ResultRow {
    /// 输出表列名（固定顺序）
    pub const COLUMNS: [&'static str; 5] =
        ["ITEM", "TIPO DE PROCESO", "NORMA", "CRITERIO", "DESCRIPCION"];
}

/// 历史记录与结果行同构
pub type HistoryRecord = ResultRow;

// ==========================================
// ProcessedFile - 已处理报表登记
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFile {
    pub nombre: String,
    pub fecha_proceso: String, // YYYY-MM-DD HH:MM:SS
    pub fecha_archivo: String, // YYYY-MM-DD HH:MM:SS
}

// ==========================================
// 反序列化辅助
// ==========================================

/// ITEM 反序列化: 接受整数、无小数部分的浮点、以及对应文本
///
/// 电子表格往返后整数列常变成 `123.0`,这里统一还原为 i64
fn deserialize_item<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct ItemVisitor;

    impl<'de> Visitor<'de> for ItemVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("integer ITEM code")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("ITEM 超出范围: {}", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::custom(format!("ITEM 不是整数: {}", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            let trimmed = v.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(n);
            }
            match trimmed.parse::<f64>() {
                Ok(f) => self.visit_f64(f),
                Err(_) => Err(E::custom(format!("ITEM 无法解析: {}", v))),
            }
        }
    }

    deserializer.deserialize_any(ItemVisitor)
}

/// 文本列反序列化: 数字/布尔转文本, null 视为空串
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("text cell")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}
