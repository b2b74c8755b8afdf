use crate::model::card::Card;
use crate::model::suit::{Suit, SuitMap};
use serde::{Deserialize, Serialize};

/// One card laid into a trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub player: usize,
    pub card: Card,
}

/// The linear game log: resolved tricks, each year's closing work-hour
/// totals, and the requisition outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryRecord {
    Trick {
        year: u32,
        winner: usize,
        plays: Vec<TrickPlay>,
        assignments: Vec<(Card, Suit)>,
    },
    Jobs {
        year: u32,
        hours: SuitMap<u32>,
    },
    Requisition {
        year: u32,
        seizures: Vec<String>,
    },
}
