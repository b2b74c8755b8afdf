use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Names drawn for the automated opponents.
pub const OPPONENT_NAMES: [&str; 6] = [
    "Ivan",
    "Dmitri",
    "Alyosha",
    "Fyodor",
    "Grushenka",
    "Katerina",
];

pub const DEFAULT_HUMAN_NAME: &str = "Player";

/// Default the human carried in saves from the pre-localization builds.
pub const LEGACY_HUMAN_NAME: &str = "игрок";

/// A completed-job stack in the orden variant: the lowest card of the job
/// bucket sits face-up as the marker, the rest lie hidden beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    pub suit: Option<Suit>,
    pub revealed: Vec<Card>,
    pub hidden: Vec<Card>,
}

impl Stack {
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty() && self.hidden.is_empty()
    }
}

/// A player's personal plot: the revealed (public) and hidden (private)
/// stash, the permanent medal total, and any completed-job stacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    pub revealed: Vec<Card>,
    pub hidden: Vec<Card>,
    #[serde(default)]
    pub medals: u32,
    #[serde(default)]
    pub stacks: Vec<Stack>,
}

impl Plot {
    /// Drops stacks that no longer hold any card.
    pub fn prune_stacks(&mut self) {
        self.stacks.retain(|stack| !stack.is_empty());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(alias = "idx")]
    pub index: usize,
    pub is_human: bool,
    pub name: String,
    pub hand: Hand,
    pub plot: Plot,
    #[serde(default)]
    pub brigade_leader: bool,
    #[serde(default, alias = "hasWonTrickThisYear")]
    pub won_trick_this_year: bool,
    #[serde(default, alias = "medals")]
    pub medals_this_year: u32,
}

impl Player {
    pub fn new(index: usize, is_human: bool, name: impl Into<String>) -> Self {
        Self {
            index,
            is_human,
            name: name.into(),
            hand: Hand::new(),
            plot: Plot::default(),
            brigade_leader: false,
            won_trick_this_year: false,
            medals_this_year: 0,
        }
    }

    /// Clears the per-year flags and, when the medals variant is on, rolls
    /// this year's medals into the permanent plot total.
    pub fn reset_for_new_year(&mut self, medals_count: bool) {
        if medals_count {
            self.plot.medals += self.medals_this_year;
        }
        self.medals_this_year = 0;
        self.won_trick_this_year = false;
        self.brigade_leader = false;
    }
}
