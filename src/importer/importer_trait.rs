// ==========================================
// TIPO DE PROCESO 分类系统 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::table::Table;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser, JsonParser
pub trait FileParser: Send + Sync {
    /// 解析文件为内存表
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(Table): 表头取第一行（JSON 取记录键）,完全空白的行被跳过
    /// - Err: 文件读取错误、格式错误
    fn parse_to_table(&self, file_path: &Path) -> ImportResult<Table>;
}
