//! The tip collaborator contract and its offline implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use docketline_core::{Case, Stage, StageNames};
use thiserror::Error;
use tracing::warn;

/// Shown when a tip source fails. Tips are advisory; a failure here must
/// never affect the case itself.
pub const FALLBACK_TIP: &str = "Não foi possível carregar a dica no momento. Lembre-se de sempre conversar com seu advogado(a) sobre qualquer dúvida.";

const DEFAULT_TIPS: &[(&str, &str)] = &[
    (
        "Início",
        "Seu processo começou! Agora é só aguardar os próximos passos. Mantenha seus documentos organizados.",
    ),
    (
        "Citação",
        "A outra parte está sendo notificada oficialmente sobre o processo. Isso garante que todos tenham a chance de se defender.",
    ),
    (
        "Audiência",
        "Prepare-se para a audiência. Anote os pontos importantes que você quer falar e chegue com antecedência no dia.",
    ),
    (
        "Sentença",
        "O juiz(a) está analisando tudo para tomar uma decisão. Esta é uma fase importante que exige paciência.",
    ),
    (
        "Finalizado",
        "O processo chegou ao fim. Verifique a decisão final para saber os próximos passos, como o recebimento de valores ou o cumprimento de obrigações.",
    ),
];

const DEFAULT_GENERIC_TIP: &str = "Mantenha a calma e confie no andamento do seu processo. Em caso de dúvidas, consulte seu advogado(a).";

#[derive(Debug, Error)]
pub enum TipError {
    #[cfg(feature = "gemini")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tip service returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("tip service returned no text")]
    Empty,

    #[error("tip service not configured")]
    NotConfigured,
}

/// Produces advice for a stage, keyed by its citizen-facing name.
#[async_trait]
pub trait TipSource: Send + Sync {
    async fn tip(&self, stage_name: &str) -> Result<String, TipError>;
}

#[async_trait]
impl<T: TipSource + ?Sized> TipSource for Box<T> {
    async fn tip(&self, stage_name: &str) -> Result<String, TipError> {
        self.as_ref().tip(stage_name).await
    }
}

/// Fixed tip table, used when no generative backend is configured.
#[derive(Debug, Clone)]
pub struct CannedTips {
    tips: HashMap<String, String>,
    generic: String,
}

impl Default for CannedTips {
    fn default() -> Self {
        Self {
            tips: DEFAULT_TIPS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            generic: DEFAULT_GENERIC_TIP.to_string(),
        }
    }
}

impl CannedTips {
    pub fn new(tips: HashMap<String, String>, generic: impl Into<String>) -> Self {
        Self {
            tips,
            generic: generic.into(),
        }
    }

    pub fn get(&self, stage_name: &str) -> &str {
        self.tips
            .get(stage_name)
            .map(String::as_str)
            .unwrap_or(self.generic.as_str())
    }
}

#[async_trait]
impl TipSource for CannedTips {
    async fn tip(&self, stage_name: &str) -> Result<String, TipError> {
        Ok(self.get(stage_name).to_string())
    }
}

/// Ask `source` for a tip, substituting [`FALLBACK_TIP`] on failure.
pub async fn tip_or_fallback(source: &dyn TipSource, stage_name: &str) -> String {
    match source.tip(stage_name).await {
        Ok(tip) => tip,
        Err(e) => {
            warn!(stage = stage_name, error = %e, "tip source failed");
            FALLBACK_TIP.to_string()
        }
    }
}

/// Requests a tip only when the observed stage changes.
pub struct TipAdvisor<T> {
    source: T,
    names: StageNames,
    last_stage: Option<Stage>,
}

impl<T: TipSource> TipAdvisor<T> {
    pub fn new(source: T, names: StageNames) -> Self {
        Self {
            source,
            names,
            last_stage: None,
        }
    }

    /// Returns a tip for `case` if its stage differs from the last case seen,
    /// `None` otherwise.
    pub async fn observe(&mut self, case: &Case) -> Option<String> {
        if self.last_stage == Some(case.current_stage) {
            return None;
        }
        self.last_stage = Some(case.current_stage);
        let name = self.names.name(case.current_stage);
        Some(tip_or_fallback(&self.source, name).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docketline_core::{DocketNormalizer, SyntheticDocket};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Broken;

    #[async_trait]
    impl TipSource for Broken {
        async fn tip(&self, _stage_name: &str) -> Result<String, TipError> {
            Err(TipError::Server {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    #[derive(Default)]
    struct Counting(AtomicUsize);

    #[async_trait]
    impl TipSource for Counting {
        async fn tip(&self, stage_name: &str) -> Result<String, TipError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("tip for {stage_name}"))
        }
    }

    fn hearing_case() -> Case {
        let raw = SyntheticDocket::default().for_query("0012345-67.2024.8.26.0001");
        DocketNormalizer::default().normalize(&raw).unwrap()
    }

    #[tokio::test]
    async fn canned_tip_per_stage() {
        let tips = CannedTips::default();
        let names = StageNames::default();
        for stage in Stage::ALL {
            let tip = tips.tip(names.name(stage)).await.unwrap();
            assert_ne!(tip, DEFAULT_GENERIC_TIP);
        }
        assert!(tips.get("Audiência").starts_with("Prepare-se"));
    }

    #[tokio::test]
    async fn canned_unknown_stage_is_generic() {
        let tip = CannedTips::default().tip("Recurso").await.unwrap();
        assert_eq!(tip, DEFAULT_GENERIC_TIP);
    }

    #[tokio::test]
    async fn failure_yields_fallback() {
        assert_eq!(tip_or_fallback(&Broken, "Audiência").await, FALLBACK_TIP);
    }

    #[tokio::test]
    async fn advisor_only_asks_on_stage_change() {
        let mut advisor = TipAdvisor::new(Counting::default(), StageNames::default());
        let case = hearing_case();

        assert_eq!(
            advisor.observe(&case).await.as_deref(),
            Some("tip for Audiência")
        );
        assert_eq!(advisor.observe(&case).await, None);
        assert_eq!(advisor.source.0.load(Ordering::SeqCst), 1);

        let mut closed = case.clone();
        closed.current_stage = Stage::Closed;
        assert_eq!(
            advisor.observe(&closed).await.as_deref(),
            Some("tip for Finalizado")
        );
        assert_eq!(advisor.source.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn advisor_failure_does_not_touch_case() {
        let mut advisor = TipAdvisor::new(Broken, StageNames::default());
        let case = hearing_case();
        let before = case.clone();
        assert_eq!(advisor.observe(&case).await.as_deref(), Some(FALLBACK_TIP));
        assert_eq!(case, before);
    }
}
