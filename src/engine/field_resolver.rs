// ==========================================
// TIPO DE PROCESO 分类系统 - 字段解析器
// ==========================================
// 职责: 按零件号从三个索引查出四个独立字段
// - tipo_proceso: 通用目录 CODIGO FORMATO（EAN == str(item)）
// - norma: 报表 NORMA 列
// - descripcion: 报表优先,通用目录兜底
// - criterio: 合规目录（OBSERVACIONES 含 CUMPLE → CUMPLE）
// ==========================================

use crate::domain::records::ResultRow;
use crate::domain::types::labels;
use crate::engine::rules::ProcessFields;
use crate::importer::source_loader::LoadedSources;

pub struct FieldResolver<'a> {
    sources: &'a LoadedSources,
}

impl<'a> FieldResolver<'a> {
    pub fn new(sources: &'a LoadedSources) -> Self {
        Self { sources }
    }

    /// 解析单个零件号,返回未经规则处理的结果行
    pub fn resolve(&self, item: i64) -> ResultRow {
        let key = item.to_string();
        let catalog = self.sources.catalog.get(&key);
        let report = self.sources.report.get(item);

        let tipo_proceso = catalog
            .map(|c| c.codigo_formato.clone())
            .unwrap_or_default();

        let norma = report.map(|r| r.norma.clone()).unwrap_or_default();

        let descripcion = report
            .map(|r| r.descripcion.as_str())
            .filter(|d| !d.is_empty())
            .or_else(|| catalog.map(|c| c.descripcion.as_str()))
            .unwrap_or_default()
            .to_string();

        ResultRow {
            item,
            tipo_proceso,
            norma,
            criterio: self.resolve_criterio(&key),
            descripcion,
        }
    }

    fn resolve_criterio(&self, key: &str) -> String {
        match self.sources.compliance.get(key) {
            Some(record) if record.observaciones.to_uppercase().contains(labels::CUMPLE) => {
                labels::CUMPLE.to_string()
            }
            Some(record) => record.criterio.trim().to_string(),
            None => String::new(),
        }
    }
}

impl ResultRow {
    pub fn process_fields(&self) -> ProcessFields {
        ProcessFields {
            tipo_proceso: self.tipo_proceso.clone(),
            norma: self.norma.clone(),
            criterio: self.criterio.clone(),
        }
    }

    pub fn with_process_fields(mut self, fields: ProcessFields) -> Self {
        self.tipo_proceso = fields.tipo_proceso;
        self.norma = fields.norma;
        self.criterio = fields.criterio;
        self
    }
}
