//! Terminal rendering of a normalized case as a progress card.

use std::fmt::Write;

use docketline_core::{Case, StageNames, StageState, stage_views};

pub const DEFAULT_HISTORY_ITEMS: usize = 3;

const SYNTHETIC_NOTICE: &str =
    "Registro indisponível no momento: exibindo dados de demonstração.";

/// Render `case` as a vertical card: stage timeline, latest movement, recent
/// history and an optional tip.
pub fn render_case(
    case: &Case,
    names: &StageNames,
    is_synthetic: bool,
    history_items: usize,
    tip: Option<&str>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Processo {} ===", case.case_number);
    if is_synthetic {
        let _ = writeln!(out, "(!) {SYNTHETIC_NOTICE}");
    }
    let _ = writeln!(out);

    // ── Timeline ──
    let _ = writeln!(out, "Andamento");
    for view in stage_views(case.current_stage, names) {
        let marker = match view.state {
            StageState::Completed => "[x]",
            StageState::Current => "[>]",
            StageState::Pending => "[ ]",
        };
        let _ = writeln!(out, "  {marker} {}", view.name);
    }
    let _ = writeln!(out);

    // ── Latest movement ──
    let latest = &case.latest_event;
    let _ = writeln!(out, "Última movimentação");
    let _ = write!(out, "  {:<40} {}", latest.title, latest.date);
    if let Some(severity) = latest.severity {
        let _ = write!(out, "  [{}]", severity.color());
    }
    let _ = writeln!(out);
    if let Some(description) = &latest.description {
        let _ = writeln!(out, "  {description}");
    }
    let _ = writeln!(out);

    // ── History ──
    if !case.history.is_empty() && history_items > 0 {
        let shown = case.history.len().min(history_items);
        let _ = writeln!(out, "Histórico ({shown} de {})", case.history.len());
        for event in case.history.iter().take(shown) {
            let _ = writeln!(out, "  {}  {}", event.date, event.title);
        }
        if case.history.len() > shown {
            let _ = writeln!(out, "  ... e mais {}", case.history.len() - shown);
        }
        let _ = writeln!(out);
    }

    // ── Tip ──
    if let Some(tip) = tip {
        let _ = writeln!(out, "Dica do advogado digital");
        let _ = writeln!(out, "  {tip}");
    }

    out
}
