// ==========================================
// TIPO DE PROCESO 分类系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 零件号数值解析 / 键值文本化 / 列名规整
// ==========================================

/// 被视为空值的文本占位符（电子表格导出残留）
const NULL_TOKENS: [&str; 4] = ["nan", "none", "null", "nat"];

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗单元格: 去首尾空白,空值占位符 → 空串
    pub fn clean_cell(&self, value: &str) -> String {
        let trimmed = value.trim().trim_start_matches('\u{feff}').trim();
        if NULL_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
        {
            String::new()
        } else {
            trimmed.to_string()
        }
    }

    /// 规整列名: 去空白 + 小写（用于不区分大小写的列名匹配）
    pub fn normalize_header(&self, header: &str) -> String {
        header
            .trim()
            .trim_start_matches('\u{feff}')
            .trim()
            .to_lowercase()
    }

    /// 解析零件号
    ///
    /// # 规则
    /// - 整数文本 → 原值
    /// - 有限小数 → 向零截断（`123.0` → 123, `12.7` → 12）
    /// - 空白/非数值/非有限值 → None（调用方静默丢弃该行）
    pub fn parse_part_number(&self, value: &str) -> Option<i64> {
        let cleaned = self.clean_cell(value);
        if cleaned.is_empty() {
            return None;
        }
        if let Ok(n) = cleaned.parse::<i64>() {
            return Some(n);
        }
        match cleaned.parse::<f64>() {
            Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Some(f.trunc() as i64),
            _ => None,
        }
    }

    /// 键值文本化: 目录键按字符串比较,但数值单元格不应带 `.0` 尾巴
    ///
    /// `"0123"` 保持不变（前导零有意义）,`"123.0"` → `"123"`
    pub fn key_text(&self, value: &str) -> String {
        let cleaned = self.clean_cell(value);
        if let Some(integral) = cleaned.strip_suffix(".0") {
            if !integral.is_empty()
                && integral
                    .strip_prefix('-')
                    .unwrap_or(integral)
                    .chars()
                    .all(|c| c.is_ascii_digit())
            {
                return integral.to_string();
            }
        }
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cell_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_cell("  NOM-004-SE-2021  "), "NOM-004-SE-2021");
        assert_eq!(cleaner.clean_cell("nan"), "");
        assert_eq!(cleaner.clean_cell("NaN"), "");
        assert_eq!(cleaner.clean_cell("   "), "");
        assert_eq!(cleaner.clean_cell("N/D"), "N/D");
    }

    #[test]
    fn test_normalize_header() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_header(" Num. Parte "), "num. parte");
        assert_eq!(
            cleaner.normalize_header("DESCRIPCIÓN AGENTE ADUANAL"),
            "descripción agente aduanal"
        );
        assert_eq!(cleaner.normalize_header("\u{feff}ITEM"), "item");
    }

    #[test]
    fn test_parse_part_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_part_number("999"), Some(999));
        assert_eq!(cleaner.parse_part_number(" 4500123.0 "), Some(4500123));
        assert_eq!(cleaner.parse_part_number("12.7"), Some(12));
        assert_eq!(cleaner.parse_part_number("-5"), Some(-5));
        assert_eq!(cleaner.parse_part_number("ABC"), None);
        assert_eq!(cleaner.parse_part_number(""), None);
        assert_eq!(cleaner.parse_part_number("nan"), None);
        assert_eq!(cleaner.parse_part_number("inf"), None);
    }

    #[test]
    fn test_key_text() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.key_text("123.0"), "123");
        assert_eq!(cleaner.key_text("0123"), "0123");
        assert_eq!(cleaner.key_text("12.5"), "12.5");
        assert_eq!(cleaner.key_text("ABC.0"), "ABC.0");
        assert_eq!(cleaner.key_text(" 789 "), "789");
    }
}
