// ==========================================
// TIPO DE PROCESO 分类系统 - 内存表
// ==========================================
// 职责: 三个数据源的统一表格视图（有序表头 + 字符串行）
// 说明: 文件格式由解析器负责,引擎只依赖本结构
// ==========================================

/// 内存表
///
/// 每行的单元格数量始终与表头一致（不足补空,多余截断）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// 以表头创建空表
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// 追加一行
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 精确匹配列名
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 按谓词查找第一个匹配的列
    pub fn find_column<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&str) -> bool,
    {
        self.headers.iter().position(|h| predicate(h))
    }

    /// 读取单元格（越界返回空串）
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 遍历所有行
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec!["EAN".to_string(), "DESCRIPTION".to_string()]);
        table.push_row(vec!["123".to_string(), "Camiseta".to_string()]);
        table.push_row(vec!["456".to_string()]);
        table
    }

    #[test]
    fn test_push_row_pads_missing_cells() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), "");
    }

    #[test]
    fn test_push_row_truncates_extra_cells() {
        let mut table = Table::new(vec!["A".to_string()]);
        table.push_row(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.rows().next().unwrap().len(), 1);
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column_index("DESCRIPTION"), Some(1));
        assert_eq!(table.column_index("description"), None);
        assert_eq!(
            table.find_column(|h| h.eq_ignore_ascii_case("description")),
            Some(1)
        );
    }

    #[test]
    fn test_cell_out_of_range() {
        let table = sample();
        assert_eq!(table.cell(10, 0), "");
        assert_eq!(table.cell(0, 10), "");
    }
}
