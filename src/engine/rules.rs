// ==========================================
// TIPO DE PROCESO 分类系统 - 分类规则引擎
// ==========================================
// 职责: (norma, tipo_proceso) → TIPO DE PROCESO
// 规则: 有序规则表,自上而下求值,首条命中即返回
// 附带: NORMA 规整、CRITERIO 规整
// 红线: 纯函数,不依赖 criterio,无 I/O
// ==========================================

use crate::config::rule_config_trait::RuleConfigReader;
use crate::domain::types::labels;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// 粘贴标签类标准（短代码 + 完整编号）
pub const ADHERIBLE_TOKENS: [&str; 10] = [
    "015",
    "050",
    "024",
    "141",
    "NOM-015-SCFI-2007",
    "NOM-050-SCFI-2004",
    "NOM-024-SCFI-2013",
    "NOM-141-SSA1/SCFI-2012",
    "NOM004TEXX",
    "NOM020INS",
];

/// 缝制标签类标准
pub const COSTURA_TOKENS: [&str; 6] = [
    "004",
    "020",
    "NOM004",
    "NOM020",
    "NOM-004-SE-2021",
    "NOM-020-SCFI-1997",
];

// ==========================================
// ProcessFields - 规则引擎 / 协调器的输入输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessFields {
    pub tipo_proceso: String,
    pub norma: String,
    pub criterio: String,
}

impl ProcessFields {
    pub fn new(
        tipo_proceso: impl Into<String>,
        norma: impl Into<String>,
        criterio: impl Into<String>,
    ) -> Self {
        Self {
            tipo_proceso: tipo_proceso.into(),
            norma: norma.into(),
            criterio: criterio.into(),
        }
    }
}

// ==========================================
// RuleOptions - 规则开关
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOptions {
    /// NORMA 含裸 TEXX 时的标签
    pub texx_norma_tipo: String,
    /// CRITERIO 是否匹配单字母 C
    pub criterio_c_suelta: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            texx_norma_tipo: labels::ADHERIBLE.to_string(),
            criterio_c_suelta: true,
        }
    }
}

impl RuleOptions {
    /// 从配置读取规则开关
    pub fn from_reader(reader: &dyn RuleConfigReader) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            texx_norma_tipo: reader.get_texx_norma_tipo()?,
            criterio_c_suelta: reader.get_criterio_c_suelta()?,
        })
    }
}

// ==========================================
// TipoRuleTag - 规则标签
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoRuleTag {
    Nom004TexxTipo,    // 1.  tipo 含 NOM004TEXX
    TexxNorma,         // 1b. norma 含裸 TEXX
    Nom004,            // 2.  tipo 或 norma 含 NOM004 / 004
    Nom020Ins,         // 3.  norma 含 NOM020INS
    ListaAdherible,    // 4.  norma 含粘贴类标准
    ListaCostura,      // 5.  norma 含缝制类标准
    NormaCero,         // 6.  norma == "0"
    NormaNoDisponible, // 7.  norma == "N/D"
    Fallback,          // 8.  透传 tipo
}

impl fmt::Display for TipoRuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TipoRuleTag::Nom004TexxTipo => "NOM004TEXX_TIPO",
            TipoRuleTag::TexxNorma => "TEXX_NORMA",
            TipoRuleTag::Nom004 => "NOM004",
            TipoRuleTag::Nom020Ins => "NOM020INS",
            TipoRuleTag::ListaAdherible => "LISTA_ADHERIBLE",
            TipoRuleTag::ListaCostura => "LISTA_COSTURA",
            TipoRuleTag::NormaCero => "NORMA_CERO",
            TipoRuleTag::NormaNoDisponible => "NORMA_NO_DISPONIBLE",
            TipoRuleTag::Fallback => "FALLBACK",
        };
        write!(f, "{}", name)
    }
}

/// 规则命中后的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipoOutcome {
    Label(String), // 固定标签
    Clear,         // 置空
    PassThrough,   // 透传原 tipo_proceso
}

/// 单条规则: (标签, 谓词, 动作)
#[derive(Debug, Clone)]
pub struct TipoRule {
    pub tag: TipoRuleTag,
    pub matches: fn(norma: &str, tipo: &str) -> bool,
    pub outcome: TipoOutcome,
}

/// 分类结果（附命中规则标签）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipoDecision {
    pub tipo_proceso: String,
    pub tag: TipoRuleTag,
}

// ==========================================
// 谓词
// ==========================================

fn contains_any(text: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| text.contains(t))
}

fn tipo_nom004texx(_norma: &str, tipo: &str) -> bool {
    tipo.contains("NOM004TEXX")
}

fn norma_texx(norma: &str, _tipo: &str) -> bool {
    norma.contains("TEXX")
}

fn nom004(norma: &str, tipo: &str) -> bool {
    contains_any(tipo, &["NOM004", "004"]) || contains_any(norma, &["NOM004", "004"])
}

fn norma_nom020ins(norma: &str, _tipo: &str) -> bool {
    norma.contains("NOM020INS")
}

fn norma_adherible(norma: &str, _tipo: &str) -> bool {
    contains_any(norma, &ADHERIBLE_TOKENS)
}

fn norma_costura(norma: &str, _tipo: &str) -> bool {
    contains_any(norma, &COSTURA_TOKENS)
}

fn norma_cero(norma: &str, _tipo: &str) -> bool {
    norma == labels::CERO
}

fn norma_no_disponible(norma: &str, _tipo: &str) -> bool {
    norma == labels::NO_DISPONIBLE
}

fn always(_norma: &str, _tipo: &str) -> bool {
    true
}

// ==========================================
// ClassificationRules - 有序规则表
// ==========================================
#[derive(Debug, Clone)]
pub struct ClassificationRules {
    tipo_rules: Vec<TipoRule>,
    criterio_c_suelta: bool,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

impl ClassificationRules {
    pub fn new(options: &RuleOptions) -> Self {
        let label = |l: &str| TipoOutcome::Label(l.to_string());
        let tipo_rules = vec![
            TipoRule {
                tag: TipoRuleTag::Nom004TexxTipo,
                matches: tipo_nom004texx,
                outcome: label(labels::COSTURA),
            },
            TipoRule {
                tag: TipoRuleTag::TexxNorma,
                matches: norma_texx,
                outcome: label(&options.texx_norma_tipo),
            },
            TipoRule {
                tag: TipoRuleTag::Nom004,
                matches: nom004,
                outcome: label(labels::COSTURA),
            },
            TipoRule {
                tag: TipoRuleTag::Nom020Ins,
                matches: norma_nom020ins,
                outcome: label(labels::ADHERIBLE),
            },
            TipoRule {
                tag: TipoRuleTag::ListaAdherible,
                matches: norma_adherible,
                outcome: label(labels::ADHERIBLE),
            },
            TipoRule {
                tag: TipoRuleTag::ListaCostura,
                matches: norma_costura,
                outcome: label(labels::COSTURA),
            },
            TipoRule {
                tag: TipoRuleTag::NormaCero,
                matches: norma_cero,
                outcome: label(labels::SIN_NORMA),
            },
            TipoRule {
                tag: TipoRuleTag::NormaNoDisponible,
                matches: norma_no_disponible,
                outcome: TipoOutcome::Clear,
            },
            TipoRule {
                tag: TipoRuleTag::Fallback,
                matches: always,
                outcome: TipoOutcome::PassThrough,
            },
        ];

        Self {
            tipo_rules,
            criterio_c_suelta: options.criterio_c_suelta,
        }
    }

    /// 规则表（按求值顺序）
    pub fn rules(&self) -> &[TipoRule] {
        &self.tipo_rules
    }

    /// 推导 TIPO DE PROCESO
    ///
    /// # 参数
    /// - norma: 规整前的 NORMA
    /// - tipo: 通用目录的 CODIGO FORMATO
    pub fn classify_tipo(&self, norma: &str, tipo: &str) -> TipoDecision {
        for rule in &self.tipo_rules {
            if (rule.matches)(norma, tipo) {
                let tipo_proceso = match &rule.outcome {
                    TipoOutcome::Label(l) => l.clone(),
                    TipoOutcome::Clear => String::new(),
                    TipoOutcome::PassThrough => tipo.to_string(),
                };
                return TipoDecision {
                    tipo_proceso,
                    tag: rule.tag,
                };
            }
        }
        // Fallback 恒命中,此处仅为穷尽
        TipoDecision {
            tipo_proceso: tipo.to_string(),
            tag: TipoRuleTag::Fallback,
        }
    }

    /// CRITERIO 规整
    ///
    /// # 规则
    /// - 大写后含 NO CUMPLE → 原样
    /// - 含 CUMPLE / REVISADO（启用时含单字母 C）→ CUMPLE
    /// - 否则原样
    pub fn normalize_criterio(&self, criterio: &str) -> String {
        let upper = criterio.trim().to_uppercase();
        if upper.contains(labels::NO_CUMPLE) {
            return criterio.to_string();
        }
        let hit = upper.contains(labels::CUMPLE)
            || upper.contains(labels::REVISADO)
            || (self.criterio_c_suelta && upper.contains('C'));
        if hit {
            labels::CUMPLE.to_string()
        } else {
            criterio.to_string()
        }
    }

    /// 规则引擎整体: tipo 推导 + NORMA 规整 + CRITERIO 规整
    ///
    /// tipo 推导读取规整前的 norma
    pub fn apply(&self, fields: &ProcessFields) -> (ProcessFields, TipoRuleTag) {
        let decision = self.classify_tipo(&fields.norma, &fields.tipo_proceso);
        let out = ProcessFields {
            tipo_proceso: decision.tipo_proceso,
            norma: normalize_norma(&fields.norma),
            criterio: self.normalize_criterio(&fields.criterio),
        };
        (out, decision.tag)
    }
}

/// NORMA 规整: "0" → SIN NORMA, "N/D" → "", 其余不变（幂等）
pub fn normalize_norma(norma: &str) -> String {
    match norma {
        labels::CERO => labels::SIN_NORMA.to_string(),
        labels::NO_DISPONIBLE => String::new(),
        other => other.to_string(),
    }
}
