use crate::game::history::{HistoryRecord, TrickPlay};
use crate::game::state::{GameState, Phase};
use crate::model::card::Card;
use crate::model::player::{DEFAULT_HUMAN_NAME, LEGACY_HUMAN_NAME, Player};
use crate::model::suit::{Suit, SuitMap};
use crate::model::variants::VariantConfig;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Current snapshot format. Snapshots written before versioning carry no
/// field at all and read back as version zero.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot version {0} is not supported")]
    UnsupportedVersion(u32),

    #[error("malformed exile entry {0:?}")]
    MalformedExile(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A suit's revealed jobs on disk. Early saves wrote a bare card instead of
/// a list when only one job was face up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum JobReveal {
    Many(Vec<Card>),
    One(Card),
}

impl Default for JobReveal {
    fn default() -> Self {
        JobReveal::Many(Vec::new())
    }
}

impl JobReveal {
    fn into_cards(self) -> Vec<Card> {
        match self {
            JobReveal::Many(cards) => cards,
            JobReveal::One(card) => vec![card],
        }
    }
}

/// Exile log on disk: card keys per year. Early saves stored one flat list,
/// which reads back attributed to the first year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ExileLog {
    ByYear(BTreeMap<u32, Vec<String>>),
    Flat(Vec<String>),
}

impl Default for ExileLog {
    fn default() -> Self {
        ExileLog::ByYear(BTreeMap::new())
    }
}

impl ExileLog {
    fn into_cards(self) -> Result<BTreeMap<u32, Vec<Card>>, SnapshotError> {
        let by_year = match self {
            ExileLog::ByYear(map) => map,
            ExileLog::Flat(keys) if keys.is_empty() => BTreeMap::new(),
            ExileLog::Flat(keys) => BTreeMap::from([(1, keys)]),
        };
        let mut out = BTreeMap::new();
        for (year, keys) in by_year {
            let mut cards = Vec::with_capacity(keys.len());
            for key in keys {
                let card =
                    Card::from_key(&key).ok_or_else(|| SnapshotError::MalformedExile(key))?;
                cards.push(card);
            }
            out.insert(year, cards);
        }
        Ok(out)
    }
}

fn default_hand_size() -> usize {
    crate::model::deck::FULL_HAND_SIZE
}

/// Plain serializable image of a game. The generator is not stored; a
/// restored game reseeds from the recorded seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default)]
    pub version: u32,
    pub seed: u64,
    pub players: Vec<Player>,
    pub lead: usize,
    pub year: u32,
    pub trump: Option<Suit>,
    pub job_piles: SuitMap<Vec<Card>>,
    revealed_jobs: SuitMap<JobReveal>,
    #[serde(default)]
    pub claimed_jobs: Vec<Suit>,
    #[serde(default, alias = "accumulatedJobCards")]
    pub accumulated_unclaimed: SuitMap<Vec<Card>>,
    pub work_hours: SuitMap<u32>,
    pub job_buckets: SuitMap<Vec<Card>>,
    #[serde(default)]
    pub current_trick: Vec<TrickPlay>,
    #[serde(default)]
    pub last_trick: Vec<TrickPlay>,
    #[serde(default)]
    pub last_winner: Option<usize>,
    #[serde(default)]
    pub trick_count: u32,
    pub phase: Phase,
    #[serde(default)]
    exiled: ExileLog,
    #[serde(default)]
    pub current_swap_player: Option<usize>,
    pub workers_deck: Vec<Card>,
    #[serde(default)]
    pub is_famine: bool,
    #[serde(default = "default_hand_size")]
    pub starting_hand_size: usize,
    #[serde(default, alias = "trickHistory")]
    pub history: Vec<HistoryRecord>,
    #[serde(alias = "gameVariants")]
    pub variants: VariantConfig,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let exiled = ExileLog::ByYear(
            state
                .exiled
                .iter()
                .map(|(year, cards)| (*year, cards.iter().map(|card| card.key()).collect()))
                .collect(),
        );
        Self {
            version: SNAPSHOT_VERSION,
            seed: state.seed,
            players: state.players.clone(),
            lead: state.lead,
            year: state.year,
            trump: state.trump,
            job_piles: state.job_piles.clone(),
            revealed_jobs: SuitMap::from_fn(|suit| {
                JobReveal::Many(state.revealed_jobs[suit].clone())
            }),
            claimed_jobs: Suit::ALL
                .iter()
                .copied()
                .filter(|suit| state.claimed_jobs[*suit])
                .collect(),
            accumulated_unclaimed: state.accumulated_unclaimed.clone(),
            work_hours: state.work_hours,
            job_buckets: state.job_buckets.clone(),
            current_trick: state.current_trick.clone(),
            last_trick: state.last_trick.clone(),
            last_winner: state.last_winner,
            trick_count: state.trick_count,
            phase: state.phase,
            exiled,
            current_swap_player: state.current_swap_player,
            workers_deck: state.workers_deck.clone(),
            is_famine: state.is_famine,
            starting_hand_size: state.starting_hand_size,
            history: state.history.clone(),
            variants: state.variants,
        }
    }

    pub fn restore(self) -> Result<GameState, SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        let mut players = self.players;
        for player in &mut players {
            if player.is_human && player.name == LEGACY_HUMAN_NAME {
                player.name = DEFAULT_HUMAN_NAME.to_owned();
            }
        }
        let mut claimed_jobs = SuitMap::new();
        for suit in self.claimed_jobs {
            claimed_jobs[suit] = true;
        }
        let mut revealed_jobs: SuitMap<Vec<Card>> = SuitMap::new();
        for (suit, reveal) in self.revealed_jobs.iter() {
            revealed_jobs[suit] = reveal.clone().into_cards();
        }
        let rng = StdRng::seed_from_u64(self.seed);
        Ok(GameState {
            variants: self.variants,
            players,
            lead: self.lead,
            year: self.year,
            trump: self.trump,
            job_piles: self.job_piles,
            revealed_jobs,
            claimed_jobs,
            accumulated_unclaimed: self.accumulated_unclaimed,
            work_hours: self.work_hours,
            job_buckets: self.job_buckets,
            current_trick: self.current_trick,
            last_trick: self.last_trick,
            last_winner: self.last_winner,
            trick_count: self.trick_count,
            phase: self.phase,
            exiled: self.exiled.into_cards()?,
            current_swap_player: self.current_swap_player,
            workers_deck: self.workers_deck,
            is_famine: self.is_famine,
            starting_hand_size: self.starting_hand_size,
            history: self.history,
            seed: self.seed,
            rng,
        })
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
