//! The fixed five-stage case lifecycle and its timeline projection.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a case, ordered by progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Filed,
    Served,
    Hearing,
    Judgment,
    Closed,
}

impl Stage {
    /// All stages in lifecycle order.
    pub const ALL: [Stage; 5] = [
        Stage::Filed,
        Stage::Served,
        Stage::Hearing,
        Stage::Judgment,
        Stage::Closed,
    ];

    /// Ordinal position, 0 (`Filed`) through 4 (`Closed`).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Stage> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filed => "filed",
            Self::Served => "served",
            Self::Hearing => "hearing",
            Self::Judgment => "judgment",
            Self::Closed => "closed",
        }
    }
}

/// Display state of one stage relative to the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Completed,
    Current,
    Pending,
}

/// One step of the progress timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub name: String,
    pub state: StageState,
}

/// Citizen-facing names for each lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNames {
    names: [String; 5],
}

impl Default for StageNames {
    fn default() -> Self {
        Self::new(["Início", "Citação", "Audiência", "Sentença", "Finalizado"])
    }
}

impl StageNames {
    pub fn new(names: [&str; 5]) -> Self {
        Self {
            names: names.map(str::to_string),
        }
    }

    pub fn name(&self, stage: Stage) -> &str {
        &self.names[stage.index()]
    }
}

/// Project the lifecycle onto a timeline: every stage before `current` is
/// completed, `current` is current, everything after is pending.
pub fn stage_views(current: Stage, names: &StageNames) -> Vec<StageView> {
    Stage::ALL
        .iter()
        .map(|&stage| StageView {
            name: names.name(stage).to_string(),
            state: match stage.cmp(&current) {
                std::cmp::Ordering::Less => StageState::Completed,
                std::cmp::Ordering::Equal => StageState::Current,
                std::cmp::Ordering::Greater => StageState::Pending,
            },
        })
        .collect()
}
