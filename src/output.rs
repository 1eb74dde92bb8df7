//! Build results: the layout plus a per-card account of what happened.

use crate::error::CardError;
use crate::pipeline::layout::Layout;
use serde::{Deserialize, Serialize};

/// Everything a finished build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Rows of placements, as saved to the document.
    pub layout: Layout,
    /// One outcome per decklist entry, in decklist order.
    pub cards: Vec<CardOutcome>,
    pub stats: BuildStats,
}

/// What happened to one decklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOutcome {
    pub card_name: String,
    pub quantity: u32,
    pub status: CardStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CardStatus {
    /// The image was placed `copies` times.
    Placed { image_url: String, copies: u32 },
    /// The entry contributed nothing to the document.
    Skipped { error: CardError },
}

impl CardOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self.status, CardStatus::Placed { .. })
    }
}

/// Aggregate numbers for a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub total_entries: usize,
    pub placed_entries: usize,
    pub skipped_entries: usize,
    pub total_placements: usize,
    pub rows: usize,
    pub duration_ms: u64,
}

impl BuildStats {
    pub fn from_outcomes(cards: &[CardOutcome], layout: &Layout, duration_ms: u64) -> Self {
        let placed_entries = cards.iter().filter(|c| c.is_placed()).count();
        Self {
            total_entries: cards.len(),
            placed_entries,
            skipped_entries: cards.len() - placed_entries,
            total_placements: layout.total_placements(),
            rows: layout.rows.len(),
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupStage;

    #[test]
    fn outcome_serialises_with_status_tag() {
        let o = CardOutcome {
            card_name: "Hyper Beast".into(),
            quantity: 2,
            status: CardStatus::Skipped {
                error: CardError::NotFound {
                    card: "Hyper Beast".into(),
                    stage: LookupStage::Search,
                },
            },
        };
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["status"]["status"], "skipped");
        assert_eq!(json["card_name"], "Hyper Beast");
    }

    #[test]
    fn stats_count_placed_and_skipped() {
        let cards = vec![
            CardOutcome {
                card_name: "A".into(),
                quantity: 1,
                status: CardStatus::Placed {
                    image_url: "u".into(),
                    copies: 1,
                },
            },
            CardOutcome {
                card_name: "B".into(),
                quantity: 1,
                status: CardStatus::Skipped {
                    error: CardError::NotFound {
                        card: "B".into(),
                        stage: LookupStage::ArtworkPage,
                    },
                },
            },
        ];
        let stats = BuildStats::from_outcomes(&cards, &Layout::default(), 5);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.placed_entries, 1);
        assert_eq!(stats.skipped_entries, 1);
        assert_eq!(stats.rows, 0);
    }
}
