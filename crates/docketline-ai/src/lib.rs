//! Advisory layer: short, jargon-free tips for the citizen at each lifecycle stage.

mod tips;
pub use tips::{
    CannedTips, FALLBACK_TIP, TipAdvisor, TipError, TipSource, tip_or_fallback,
};

#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiTips};
