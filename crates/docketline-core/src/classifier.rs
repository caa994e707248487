//! Keyword-table classification of docket movements.
//!
//! Three ordered tables drive everything, each evaluated first-match-wins:
//!
//! - **title rules** turn registry jargon into a short citizen-readable label
//! - **descriptions** explain a label in plain language
//! - **stage rules** infer the lifecycle stage from the whole set of titles,
//!   listed from the latest stage down so that later milestones subsume
//!   earlier ones
//!
//! Matching is a case-insensitive substring test.

use std::collections::HashMap;

use crate::docket::Severity;
use crate::stage::Stage;

/// Default title simplifications: registry pattern → citizen label.
pub const DEFAULT_TITLE_RULES: &[(&str, &str)] = &[
    (
        "audiência de conciliação designada",
        "Audiência de Conciliação Marcada",
    ),
    ("citação", "Citação do Réu Realizada"),
    ("distribuído por sorteio", "Processo Distribuído"),
    ("sentença registrada", "Sentença Publicada"),
    ("juntada de petição", "Novo Documento Adicionado"),
];

/// Default plain-language explanations keyed by citizen label.
pub const DEFAULT_DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "Audiência de Conciliação Marcada",
        "Sua audiência foi agendada. É uma reunião para tentar um acordo amigável. Sua presença é muito importante.",
    ),
    (
        "Citação do Réu Realizada",
        "A outra parte do processo foi oficialmente comunicada sobre a ação judicial. Agora, ela tem um prazo para apresentar sua defesa.",
    ),
    (
        "Sentença Publicada",
        "O juiz(a) analisou o caso e deu uma decisão. Verifique o conteúdo da sentença para saber o resultado.",
    ),
    (
        "Processo Distribuído",
        "Seu processo foi recebido pelo sistema de justiça e encaminhado para a vara responsável, onde será julgado.",
    ),
    (
        "Novo Documento Adicionado",
        "Um novo documento ou petição foi anexado ao processo pelas partes ou pelo juiz.",
    ),
];

pub const DEFAULT_FALLBACK_DESCRIPTION: &str = "Esta é uma atualização padrão do sistema. Para mais detalhes, consulte os autos do processo.";

/// Default stage triggers, highest stage first.
pub const DEFAULT_STAGE_RULES: &[(&[&str], Stage, Severity)] = &[
    (&["arquivado", "baixado"], Stage::Closed, Severity::Low),
    (&["sentença", "julgado"], Stage::Judgment, Severity::Low),
    (&["audiência"], Stage::Hearing, Severity::Medium),
    (&["citação"], Stage::Served, Severity::Medium),
];

/// One simplification rule. `pattern` is stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRule {
    pattern: String,
    label: String,
}

impl TitleRule {
    pub fn new(pattern: &str, label: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
            label: label.to_string(),
        }
    }
}

/// One stage trigger: any keyword in any title selects `stage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRule {
    keywords: Vec<String>,
    stage: Stage,
    severity: Severity,
}

impl StageRule {
    pub fn new(keywords: &[&str], stage: Stage, severity: Severity) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            stage,
            severity,
        }
    }

    fn matches(&self, title: &str) -> bool {
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

/// Inferred lifecycle position and the severity shown with the latest event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageClassification {
    pub stage: Stage,
    pub severity: Severity,
}

/// Table-driven classifier for docket movement titles.
///
/// [`Default`] carries the Portuguese tables used against the Datajud
/// registry; the `with_*` builders replace individual tables for other
/// registries or languages.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    title_rules: Vec<TitleRule>,
    descriptions: HashMap<String, String>,
    fallback_description: String,
    stage_rules: Vec<StageRule>,
    default_stage: StageClassification,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self {
            title_rules: DEFAULT_TITLE_RULES
                .iter()
                .map(|(p, l)| TitleRule::new(p, l))
                .collect(),
            descriptions: DEFAULT_DESCRIPTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fallback_description: DEFAULT_FALLBACK_DESCRIPTION.to_string(),
            stage_rules: DEFAULT_STAGE_RULES
                .iter()
                .map(|(kw, stage, sev)| StageRule::new(kw, *stage, *sev))
                .collect(),
            default_stage: StageClassification {
                stage: Stage::Filed,
                severity: Severity::Medium,
            },
        }
    }
}

impl EventClassifier {
    pub fn with_title_rules(mut self, rules: Vec<TitleRule>) -> Self {
        self.title_rules = rules;
        self
    }

    pub fn with_descriptions(
        mut self,
        descriptions: HashMap<String, String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.descriptions = descriptions;
        self.fallback_description = fallback.into();
        self
    }

    /// Replace the stage triggers. Rules are evaluated in the given order, so
    /// list the latest stage first.
    pub fn with_stage_rules(mut self, rules: Vec<StageRule>, default: StageClassification) -> Self {
        self.stage_rules = rules;
        self.default_stage = default;
        self
    }

    /// Map a raw registry title to its citizen label.
    ///
    /// Unmatched titles are returned verbatim.
    pub fn simplify_title(&self, raw: &str) -> String {
        let lower = raw.to_lowercase();
        self.title_rules
            .iter()
            .find(|rule| lower.contains(rule.pattern.as_str()))
            .map(|rule| rule.label.clone())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Plain-language explanation of a citizen label. Total: unknown labels
    /// get the fallback description.
    pub fn describe(&self, title: &str) -> &str {
        self.descriptions
            .get(title)
            .map(String::as_str)
            .unwrap_or(self.fallback_description.as_str())
    }

    /// Infer the lifecycle stage from every title in the docket.
    ///
    /// The result depends only on which titles are present, never on their
    /// order or count.
    pub fn classify_stage<I, S>(&self, titles: I) -> StageClassification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lowered: Vec<String> = titles
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();

        self.stage_rules
            .iter()
            .find(|rule| lowered.iter().any(|t| rule.matches(t)))
            .map(|rule| StageClassification {
                stage: rule.stage,
                severity: rule.severity,
            })
            .unwrap_or(self.default_stage)
    }
}
