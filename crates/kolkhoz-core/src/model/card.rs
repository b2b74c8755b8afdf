use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub const fn is_worker(self) -> bool {
        self.rank.is_worker()
    }

    /// Stable key used in the exile log, e.g. `"Hearts-11"`.
    pub fn key(self) -> String {
        format!("{}-{}", self.suit.name(), self.rank.value())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (suit, value) = key.split_once('-')?;
        let suit = Suit::from_name(suit)?;
        let rank = Rank::from_value(value.parse().ok()?)?;
        Some(Card::new(suit, rank))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.rank, self.suit)
    }
}
