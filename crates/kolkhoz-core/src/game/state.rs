use crate::MAX_YEARS;
use crate::game::error::GameError;
use crate::game::history::{HistoryRecord, TrickPlay};
use crate::model::card::Card;
use crate::model::deck::DeckComposer;
use crate::model::player::{DEFAULT_HUMAN_NAME, OPPONENT_NAMES, Player};
use crate::model::rank::Rank;
use crate::model::suit::{Suit, SuitMap};
use crate::model::variants::VariantConfig;
use core::fmt;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// The one active stage of the year's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Swap,
    Trick,
    Assignment,
    Requisition,
    GameOver,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Swap => "swap",
            Phase::Trick => "trick",
            Phase::Assignment => "assignment",
            Phase::Requisition => "requisition",
            Phase::GameOver => "game_over",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate root of one game, mutated in place by every operation. All
/// randomness flows through the owned seeded generator so a seed reproduces
/// a whole game.
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) variants: VariantConfig,
    pub(crate) players: Vec<Player>,
    pub(crate) lead: usize,
    pub(crate) year: u32,
    pub(crate) trump: Option<Suit>,
    pub(crate) job_piles: SuitMap<Vec<Card>>,
    pub(crate) revealed_jobs: SuitMap<Vec<Card>>,
    pub(crate) claimed_jobs: SuitMap<bool>,
    pub(crate) accumulated_unclaimed: SuitMap<Vec<Card>>,
    pub(crate) work_hours: SuitMap<u32>,
    pub(crate) job_buckets: SuitMap<Vec<Card>>,
    pub(crate) current_trick: Vec<TrickPlay>,
    pub(crate) last_trick: Vec<TrickPlay>,
    pub(crate) last_winner: Option<usize>,
    pub(crate) trick_count: u32,
    pub(crate) phase: Phase,
    pub(crate) exiled: BTreeMap<u32, Vec<Card>>,
    pub(crate) current_swap_player: Option<usize>,
    pub(crate) workers_deck: Vec<Card>,
    pub(crate) is_famine: bool,
    pub(crate) starting_hand_size: usize,
    pub(crate) history: Vec<HistoryRecord>,
    pub(crate) seed: u64,
    pub(crate) rng: StdRng,
}

impl GameState {
    pub fn new(num_players: usize, variants: VariantConfig) -> Self {
        Self::with_seed(num_players, variants, rand::random())
    }

    pub fn with_seed(num_players: usize, variants: VariantConfig, seed: u64) -> Self {
        let num_players = num_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut names: Vec<&'static str> = OPPONENT_NAMES.to_vec();
        let mut players = Vec::with_capacity(num_players);
        players.push(Player::new(0, true, DEFAULT_HUMAN_NAME));
        for index in 1..num_players {
            let pick = rng.gen_range(0..names.len());
            players.push(Player::new(index, false, names.remove(pick)));
        }

        let composer = DeckComposer::new(variants);
        let mut job_piles = composer.prepare_job_piles(&mut rng);
        let mut accumulated_unclaimed = SuitMap::new();
        let revealed_jobs = composer.reveal_jobs(&mut job_piles, &mut accumulated_unclaimed);
        let exiled = BTreeMap::new();
        let mut workers_deck = composer.prepare_workers_deck(&players, &exiled, &mut rng);
        let (starting_hand_size, is_famine) = composer.deal_hands(&mut players, &mut workers_deck);
        let lead = rng.gen_range(0..num_players);

        Self {
            variants,
            players,
            lead,
            year: 1,
            trump: None,
            job_piles,
            revealed_jobs,
            claimed_jobs: SuitMap::new(),
            accumulated_unclaimed,
            work_hours: SuitMap::new(),
            job_buckets: SuitMap::new(),
            current_trick: Vec::new(),
            last_trick: Vec::new(),
            last_winner: None,
            trick_count: 0,
            phase: Phase::Planning,
            exiled,
            current_swap_player: None,
            workers_deck,
            is_famine,
            starting_hand_size,
            history: Vec::new(),
            seed,
            rng,
        }
    }

    /// Assigns the trump suit for the year and opens the trick phase. With
    /// `None`, a suit is drawn among those whose job pile still holds cards;
    /// in the final full-deck year none do and the year plays without trump.
    pub fn set_trump(&mut self, suit: Option<Suit>) -> Result<(), GameError> {
        if self.phase != Phase::Planning {
            return Err(GameError::WrongPhase {
                op: "set_trump",
                phase: self.phase,
            });
        }
        self.trump = match suit {
            Some(suit) => Some(suit),
            None => self.random_trump(),
        };
        self.phase = Phase::Trick;
        Ok(())
    }

    pub(crate) fn random_trump(&mut self) -> Option<Suit> {
        let available: Vec<Suit> = Suit::ALL
            .iter()
            .copied()
            .filter(|suit| !self.job_piles[*suit].is_empty())
            .collect();
        if available.is_empty() {
            None
        } else {
            Some(available[self.rng.gen_range(0..available.len())])
        }
    }

    /// Exchanges one hidden plot card for one hand card during the swap
    /// phase. The swap turn stays with the player until `complete_swap`.
    pub fn swap_card(
        &mut self,
        player: usize,
        hidden_index: usize,
        hand_index: usize,
    ) -> Result<(), GameError> {
        let Some(expected) = self.current_swap_player else {
            return Err(GameError::WrongPhase {
                op: "swap_card",
                phase: self.phase,
            });
        };
        if expected != player {
            return Err(GameError::OutOfTurn {
                expected,
                actual: player,
            });
        }
        let plot_len = self.players[player].plot.hidden.len();
        if hidden_index >= plot_len {
            return Err(GameError::InvalidIndex {
                what: "hidden plot",
                index: hidden_index,
            });
        }
        let Some(hand_card) = self.players[player].hand.get(hand_index) else {
            return Err(GameError::InvalidIndex {
                what: "hand",
                index: hand_index,
            });
        };
        let plot = &mut self.players[player].plot;
        let hidden_card = plot.hidden[hidden_index];
        plot.hidden[hidden_index] = hand_card;
        if let Some(slot) = self.players[player].hand.get_mut(hand_index) {
            *slot = hidden_card;
        }
        Ok(())
    }

    /// Ends the player's swap turn. After the last player, trump is drawn
    /// and the trick phase begins.
    pub fn complete_swap(&mut self, player: usize) -> Result<(), GameError> {
        let Some(expected) = self.current_swap_player else {
            return Err(GameError::WrongPhase {
                op: "complete_swap",
                phase: self.phase,
            });
        };
        if expected != player {
            return Err(GameError::OutOfTurn {
                expected,
                actual: player,
            });
        }
        let next = expected + 1;
        if next >= self.players.len() {
            self.current_swap_player = None;
            self.trump = self.random_trump();
            self.phase = Phase::Trick;
        } else {
            self.current_swap_player = Some(next);
        }
        Ok(())
    }

    /// Moves the card at `from` so it sits at `to` in the player's hand.
    /// Purely cosmetic; allowed in any phase.
    pub fn reorder_hand(&mut self, player: usize, from: usize, to: usize) -> Result<(), GameError> {
        let Some(p) = self.players.get_mut(player) else {
            return Err(GameError::InvalidIndex {
                what: "player",
                index: player,
            });
        };
        if !p.hand.reorder(from, to) {
            return Err(GameError::InvalidIndex {
                what: "hand",
                index: from.max(to),
            });
        }
        Ok(())
    }

    /// Hand indices a follow-suit player would be allowed to play. The trick
    /// engine itself does not enforce this; it exists for strategy and UI
    /// collaborators.
    pub fn valid_plays(&self, player: usize) -> Result<Vec<usize>, GameError> {
        let Some(p) = self.players.get(player) else {
            return Err(GameError::InvalidIndex {
                what: "player",
                index: player,
            });
        };
        if let Some(first) = self.current_trick.first() {
            let lead = first.card.suit;
            let following: Vec<usize> = p
                .hand
                .iter()
                .enumerate()
                .filter(|(_, card)| card.suit == lead)
                .map(|(index, _)| index)
                .collect();
            if !following.is_empty() {
                return Ok(following);
            }
        }
        Ok((0..p.hand.len()).collect())
    }

    /// Whose action the current phase is waiting on, if any.
    pub fn current_player(&self) -> Option<usize> {
        match self.phase {
            Phase::Trick => Some((self.lead + self.current_trick.len()) % self.players.len()),
            Phase::Swap => self.current_swap_player,
            Phase::Assignment => self.last_winner,
            _ => None,
        }
    }

    /// Running scores: revealed plot cards, stack markers, and medals when
    /// the medals variant is on.
    pub fn scores(&self) -> Vec<u32> {
        self.players
            .iter()
            .map(|p| {
                let mut score: u32 = p
                    .plot
                    .revealed
                    .iter()
                    .map(|card| u32::from(card.rank.value()))
                    .sum();
                for stack in &p.plot.stacks {
                    score += stack
                        .revealed
                        .iter()
                        .map(|card| u32::from(card.rank.value()))
                        .sum::<u32>();
                }
                if self.variants.medals_count {
                    score += p.plot.medals + p.medals_this_year;
                }
                score
            })
            .collect()
    }

    /// Final scores additionally count the hidden plot.
    pub fn final_scores(&self) -> Vec<u32> {
        let mut scores = self.scores();
        for (score, p) in scores.iter_mut().zip(&self.players) {
            *score += p
                .plot
                .hidden
                .iter()
                .map(|card| u32::from(card.rank.value()))
                .sum::<u32>();
        }
        scores
    }

    /// Checks that every worker card sits in exactly one location: a hand,
    /// a plot, a stack, a job bucket, the open or just-resolved trick, the
    /// undealt deck, or (when exiles stay out of play) the exile log.
    pub fn verify_card_conservation(&self) -> Result<(), GameError> {
        let mut counts: BTreeMap<Card, u32> = BTreeMap::new();
        let mut note = |card: Card| {
            if card.is_worker() {
                *counts.entry(card).or_insert(0) += 1;
            }
        };
        for p in &self.players {
            for card in p.hand.iter() {
                note(*card);
            }
            for card in &p.plot.revealed {
                note(*card);
            }
            for card in &p.plot.hidden {
                note(*card);
            }
            for stack in &p.plot.stacks {
                for card in &stack.revealed {
                    note(*card);
                }
                for card in &stack.hidden {
                    note(*card);
                }
            }
        }
        for (_, bucket) in self.job_buckets.iter() {
            for card in bucket {
                note(*card);
            }
        }
        for card in &self.workers_deck {
            note(*card);
        }
        for play in &self.current_trick {
            note(play.card);
        }
        // a resolved trick awaiting assignment only exists here
        for play in &self.last_trick {
            note(play.card);
        }
        if !self.variants.orden_enabled() {
            for cards in self.exiled.values() {
                for card in cards {
                    note(*card);
                }
            }
        }

        for suit in Suit::ALL {
            for rank in Rank::WORKERS {
                let card = Card::new(suit, rank);
                match counts.get(&card).copied().unwrap_or(0) {
                    1 => {}
                    n => {
                        return Err(GameError::InconsistentState(format!(
                            "{card} appears in {n} places"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Tricks played per year: one fewer than the starting hand size, capped
    /// at three in the final year.
    pub(crate) fn tricks_per_year(&self) -> u32 {
        let cap = if self.year >= MAX_YEARS { 3 } else { 4 };
        cap.min(self.starting_hand_size.saturating_sub(1) as u32)
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn variants(&self) -> &VariantConfig {
        &self.variants
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    pub fn lead(&self) -> usize {
        self.lead
    }

    pub fn trick_count(&self) -> u32 {
        self.trick_count
    }

    pub fn current_trick(&self) -> &[TrickPlay] {
        &self.current_trick
    }

    pub fn last_trick(&self) -> &[TrickPlay] {
        &self.last_trick
    }

    pub fn last_winner(&self) -> Option<usize> {
        self.last_winner
    }

    pub fn work_hours(&self) -> &SuitMap<u32> {
        &self.work_hours
    }

    pub fn job_buckets(&self) -> &SuitMap<Vec<Card>> {
        &self.job_buckets
    }

    pub fn job_piles(&self) -> &SuitMap<Vec<Card>> {
        &self.job_piles
    }

    pub fn revealed_jobs(&self) -> &SuitMap<Vec<Card>> {
        &self.revealed_jobs
    }

    pub fn is_claimed(&self, suit: Suit) -> bool {
        self.claimed_jobs[suit]
    }

    pub fn exiled(&self) -> &BTreeMap<u32, Vec<Card>> {
        &self.exiled
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_famine(&self) -> bool {
        self.is_famine
    }

    pub fn starting_hand_size(&self) -> usize {
        self.starting_hand_size
    }

    pub fn current_swap_player(&self) -> Option<usize> {
        self.current_swap_player
    }

    pub fn workers_remaining(&self) -> usize {
        self.workers_deck.len()
    }
}
