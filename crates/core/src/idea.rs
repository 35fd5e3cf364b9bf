//! The normalized idea record produced by generation and classification.

use serde::{Deserialize, Serialize};

/// Inclusive lower bound for every viability score.
pub const SCORE_MIN: i64 = 1;
/// Inclusive upper bound for every viability score.
pub const SCORE_MAX: i64 = 100;

/// `source` value for ideas generated on behalf of a signed-in user.
pub const SOURCE_USER: &str = "user";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Closed set of game categories an idea may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Video Game", alias = "VideoGame")]
    VideoGame,
    #[serde(rename = "Board Game", alias = "BoardGame")]
    BoardGame,
    #[serde(rename = "Card Game", alias = "CardGame")]
    CardGame,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::VideoGame,
        Category::BoardGame,
        Category::CardGame,
        Category::Other,
    ];

    /// Wire label, as emitted in JSON and stored in the `ideas.category` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::VideoGame => "Video Game",
            Category::BoardGame => "Board Game",
            Category::CardGame => "Card Game",
            Category::Other => "Other",
        }
    }

    /// Parse a wire label or its compact alias (`"VideoGame"`). Exact match only.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Video Game" | "VideoGame" => Some(Category::VideoGame),
            "Board Game" | "BoardGame" => Some(Category::BoardGame),
            "Card Game" | "CardGame" => Some(Category::CardGame),
            "Other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Comma-separated wire labels, for prompts and error messages.
    pub fn labels() -> String {
        Self::ALL
            .iter()
            .map(|c| format!("\"{}\"", c.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Per-dimension viability scores, each in `[SCORE_MIN, SCORE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityBreakdown {
    pub originality: i32,
    pub market_appeal: i32,
    pub scope: i32,
}

/// A validated game idea.
///
/// Only [`crate::normalizer`] constructs these from untrusted text, so every
/// instance in flight satisfies the score and category invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRecord {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub genre: String,
    pub viability: i32,
    pub viability_breakdown: ViabilityBreakdown,
    pub source: String,
}

/// Whether `score` lies within the inclusive viability range.
pub fn score_in_range(score: i64) -> bool {
    (SCORE_MIN..=SCORE_MAX).contains(&score)
}
