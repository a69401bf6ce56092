//! Council stage identifiers

use serde::{Deserialize, Serialize};

/// Stage of a council run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Every council model answers the question
    One,
    /// Every council model ranks the anonymized answers
    Two,
    /// The chairman synthesizes the final answer
    Three,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::One => "stage1",
            Stage::Two => "stage2",
            Stage::Three => "stage3",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::One => "Stage 1: Collect Responses",
            Stage::Two => "Stage 2: Peer Rankings",
            Stage::Three => "Stage 3: Chairman Synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
