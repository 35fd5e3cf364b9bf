//! Public catalog entries.

use ideaforge_core::idea::{Category, IdeaRecord, ViabilityBreakdown};
use ideaforge_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `ideas` table.
#[derive(Debug, Clone, FromRow)]
pub struct Idea {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub genre: String,
    pub viability: i32,
    pub originality: i32,
    pub market_appeal: i32,
    pub scope: i32,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Idea {
    /// Convert the row back into the domain record.
    ///
    /// `ck_ideas_category` restricts the column to known labels.
    pub fn into_record(self) -> IdeaRecord {
        IdeaRecord {
            category: Category::from_label(&self.category).unwrap_or(Category::Other),
            name: self.name,
            description: self.description,
            genre: self.genre,
            viability: self.viability,
            viability_breakdown: ViabilityBreakdown {
                originality: self.originality,
                market_appeal: self.market_appeal,
                scope: self.scope,
            },
            source: self.source,
        }
    }
}
