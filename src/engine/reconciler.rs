// ==========================================
// TIPO DE PROCESO 分类系统 - 一致性协调器
// ==========================================
// 职责: 规则引擎输出后的跨字段约束
// 顺序: 1 → 2 → 3/4 → 5,不可调换
// - 步骤 1–4 读取进入协调器时的值
// - 步骤 5 读取步骤 3/4 处理后的 CRITERIO
// 说明: 步骤 3/5 之后不再复检 "SIN NORMA 成对出现"
// 红线: 纯函数,无 I/O
// ==========================================

use crate::domain::types::labels;
use crate::engine::rules::ProcessFields;
use serde::{Deserialize, Serialize};

/// 有效标准清单（NORMA 规整后逐字比较）
///
/// 短代码与完整编号并存: 报表中两种写法都会出现
pub const NORMAS_VALIDAS: [&str; 28] = [
    "003",
    "004",
    "NOM-004-SE-2021",
    "008",
    "015",
    "NOM-015-SCFI-2007",
    "020",
    "NOM-020-SCFI-1997",
    "024",
    "NOM-024-SCFI-2013",
    "035",
    "050",
    "NOM-050-SCFI-2004",
    "051",
    "116",
    "141",
    "NOM-141-SSA1/SCFI-2012",
    "142",
    "173",
    "185",
    "186",
    "189",
    "NOM-189-SSA1/SCFI-2018",
    "192",
    "199",
    "235",
    "NOM-115-STPS-2009",
    "NOM-121-SCFI-2004",
];

/// 步骤 5: 未合规时强制为 ADHERIBLE 的标准
pub const NORMAS_ADHERIBLE_FORZADA: [&str; 2] = ["NOM-050-SCFI-2004", "NOM-015-SCFI-2007"];

// ==========================================
// ReconcileStep - 命中的协调步骤
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileStep {
    NormaNoValida,         // 1. NORMA 不在有效清单
    TipoVacio,             // 2. tipo 为空,或 tipo/norma 同为 "0"
    CriterioCumple,        // 3. CRITERIO 含 CUMPLE
    CriterioRevisado,      // 4. 其他非空 CRITERIO
    NormaAdheribleForzada, // 5. NOM-050 / NOM-015 未合规
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub fields: ProcessFields,
    pub steps: Vec<ReconcileStep>,
}

// ==========================================
// Reconciler - 纯函数工具类
// ==========================================
pub struct Reconciler;

impl Reconciler {
    pub fn is_valid_norma(norma: &str) -> bool {
        NORMAS_VALIDAS.contains(&norma)
    }

    /// 协调单行
    ///
    /// # 规则
    /// 1. norma ∉ NORMAS_VALIDAS → tipo = SIN NORMA;norma 为 "" / "0" 时 norma 同置
    /// 2. tipo == "" 或 (tipo == "0" 且 norma == "0") → 两者均置 SIN NORMA
    /// 3. CRITERIO（大写）含 CUMPLE → tipo = CUMPLE,criterio 清空
    /// 4. 否则 CRITERIO 非空且 != "N/D" → criterio = REVISADO
    /// 5. norma ∈ {NOM-050-SCFI-2004, NOM-015-SCFI-2007} 且当前 criterio 不含 CUMPLE
    ///    → tipo = ADHERIBLE
    pub fn reconcile(fields: &ProcessFields) -> Reconciliation {
        let tipo = fields.tipo_proceso.trim();
        let norma = fields.norma.trim();
        let criterio = fields.criterio.trim().to_uppercase();

        let mut out = fields.clone();
        let mut steps = Vec::new();

        // 1. 有效标准清单
        if !Self::is_valid_norma(norma) {
            out.tipo_proceso = labels::SIN_NORMA.to_string();
            if norma.is_empty() || norma == labels::CERO {
                out.norma = labels::SIN_NORMA.to_string();
            }
            steps.push(ReconcileStep::NormaNoValida);
        }

        // 2. 空 tipo / 双零
        if tipo.is_empty() || (tipo == labels::CERO && norma == labels::CERO) {
            out.tipo_proceso = labels::SIN_NORMA.to_string();
            out.norma = labels::SIN_NORMA.to_string();
            steps.push(ReconcileStep::TipoVacio);
        }

        // 3/4. CRITERIO
        let mut criterio_actual = criterio.clone();
        if criterio.contains(labels::CUMPLE) {
            out.tipo_proceso = labels::CUMPLE.to_string();
            out.criterio = String::new();
            criterio_actual.clear();
            steps.push(ReconcileStep::CriterioCumple);
        } else if !criterio.is_empty() && criterio != labels::NO_DISPONIBLE {
            out.criterio = labels::REVISADO.to_string();
            criterio_actual = labels::REVISADO.to_string();
            steps.push(ReconcileStep::CriterioRevisado);
        }

        // 5. 读取步骤 3/4 之后的 criterio
        if NORMAS_ADHERIBLE_FORZADA.contains(&norma) && !criterio_actual.contains(labels::CUMPLE) {
            out.tipo_proceso = labels::ADHERIBLE.to_string();
            steps.push(ReconcileStep::NormaAdheribleForzada);
        }

        Reconciliation { fields: out, steps }
    }
}
