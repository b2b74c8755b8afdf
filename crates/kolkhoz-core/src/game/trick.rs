use crate::THRESHOLD;
use crate::game::error::GameError;
use crate::game::history::{HistoryRecord, TrickPlay};
use crate::game::state::{GameState, Phase};
use crate::model::card::Card;
use crate::model::player::Stack;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// What a single `play_card` call did to the trick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The trick is still open.
    Played,
    /// The last card closed the trick.
    TrickResolved {
        winner: usize,
        /// True when every card shared a suit and the assignment was made
        /// without consulting the winner.
        auto_assigned: bool,
    },
}

impl GameState {
    /// Plays the card at `hand_index` into the open trick. When the trick
    /// fills it resolves immediately, and unless every card shares a suit
    /// the winner must follow up with `apply_assignments`.
    pub fn play_card(&mut self, player: usize, hand_index: usize) -> Result<PlayOutcome, GameError> {
        if self.phase != Phase::Trick {
            return Err(GameError::WrongPhase {
                op: "play_card",
                phase: self.phase,
            });
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidIndex {
                what: "player",
                index: player,
            });
        }
        let expected = (self.lead + self.current_trick.len()) % self.players.len();
        if player != expected {
            return Err(GameError::OutOfTurn {
                expected,
                actual: player,
            });
        }
        let Some(card) = self.players[player].hand.take(hand_index) else {
            return Err(GameError::InvalidIndex {
                what: "hand",
                index: hand_index,
            });
        };
        self.current_trick.push(TrickPlay { player, card });

        if self.current_trick.len() == self.players.len() {
            self.resolve_trick()
        } else {
            Ok(PlayOutcome::Played)
        }
    }

    /// Trump cards beat everything else; within the deciding suit the
    /// highest rank wins, and on a tie in trump absence the earliest play
    /// keeps the trick.
    fn resolve_trick(&mut self) -> Result<PlayOutcome, GameError> {
        let lead_suit = self.current_trick[0].card.suit;
        let deciding = match self.trump {
            Some(trump)
                if self
                    .current_trick
                    .iter()
                    .any(|play| play.card.suit == trump) =>
            {
                trump
            }
            _ => lead_suit,
        };

        let mut winner = self.current_trick[0].player;
        let mut best: Option<Rank> = None;
        for play in &self.current_trick {
            if play.card.suit == deciding {
                let beats = match best {
                    None => true,
                    Some(rank) => play.card.rank.value() > rank.value(),
                };
                if beats {
                    best = Some(play.card.rank);
                    winner = play.player;
                }
            }
        }

        // the trick leaves the table at resolution; it lives on as the
        // last trick until its cards are assigned
        self.last_trick = std::mem::take(&mut self.current_trick);
        self.last_winner = Some(winner);
        self.trick_count += 1;
        self.lead = winner;
        for p in &mut self.players {
            p.brigade_leader = false;
        }
        self.players[winner].brigade_leader = true;
        self.players[winner].won_trick_this_year = true;
        self.players[winner].medals_this_year += 1;

        let homogeneous = self
            .last_trick
            .iter()
            .all(|play| play.card.suit == lead_suit);
        if homogeneous {
            let assignments: Vec<(Card, Suit)> = self
                .last_trick
                .iter()
                .map(|play| (play.card, play.card.suit))
                .collect();
            self.apply_assignments_unchecked(winner, assignments)?;
            Ok(PlayOutcome::TrickResolved {
                winner,
                auto_assigned: true,
            })
        } else {
            self.phase = Phase::Assignment;
            Ok(PlayOutcome::TrickResolved {
                winner,
                auto_assigned: false,
            })
        }
    }

    /// The trick winner distributes the won cards over the jobs. Every card
    /// of the trick must appear exactly once, and each target suit must be
    /// represented among the trick's cards.
    pub fn apply_assignments(&mut self, assignments: &[(Card, Suit)]) -> Result<(), GameError> {
        if self.phase != Phase::Assignment {
            return Err(GameError::WrongPhase {
                op: "apply_assignments",
                phase: self.phase,
            });
        }
        let Some(winner) = self.last_winner else {
            return Err(GameError::InconsistentState(
                "assignment phase with no trick winner".to_owned(),
            ));
        };
        if assignments.len() != self.last_trick.len() {
            return Err(GameError::InvalidAssignment);
        }
        let trick_suits: Vec<Suit> = self
            .last_trick
            .iter()
            .map(|play| play.card.suit)
            .collect();
        let mut remaining: Vec<Card> = self.last_trick.iter().map(|play| play.card).collect();
        for (card, target) in assignments {
            let Some(pos) = remaining.iter().position(|c| c == card) else {
                return Err(GameError::InvalidAssignment);
            };
            remaining.swap_remove(pos);
            if !trick_suits.contains(target) {
                return Err(GameError::InvalidAssignment);
            }
        }
        self.apply_assignments_unchecked(winner, assignments.to_vec())
    }

    /// Books the hours, records the trick, completes any job that crossed
    /// the threshold, and either opens the next trick or closes the year.
    pub(crate) fn apply_assignments_unchecked(
        &mut self,
        winner: usize,
        assignments: Vec<(Card, Suit)>,
    ) -> Result<(), GameError> {
        let before = self.work_hours;
        for (card, target) in &assignments {
            self.job_buckets[*target].push(*card);
            self.work_hours[*target] += self.card_hours(*card);
        }

        self.history.push(HistoryRecord::Trick {
            year: self.year,
            winner,
            plays: std::mem::take(&mut self.last_trick),
            assignments: assignments.clone(),
        });

        for suit in Suit::ALL {
            if self.work_hours[suit] >= THRESHOLD
                && before[suit] < THRESHOLD
                && !self.claimed_jobs[suit]
            {
                self.complete_job(suit, winner);
            }
        }

        self.last_winner = None;

        if self.trick_count >= self.tricks_per_year() {
            for p in &mut self.players {
                let leftovers = p.hand.drain_all();
                p.plot.hidden.extend(leftovers);
            }
            self.perform_requisition();
            self.phase = Phase::Requisition;
        } else {
            self.phase = Phase::Trick;
        }
        Ok(())
    }

    /// Hours a worker contributes: its face value, except the drunkard (the
    /// trump Jack under face effects), who contributes nothing.
    pub(crate) fn card_hours(&self, card: Card) -> u32 {
        if self.variants.face_effects()
            && self.trump == Some(card.suit)
            && card.rank == Rank::Jack
        {
            0
        } else {
            u32::from(card.rank.value())
        }
    }

    /// A finished job pays out. Under the orden variant the winner builds a
    /// stack from the bucket; with the full deck the revealed job cards go
    /// to the winner's plot; the reduced deck without orden only marks the
    /// suit as claimed.
    fn complete_job(&mut self, suit: Suit, winner: usize) {
        self.claimed_jobs[suit] = true;
        if self.variants.orden_enabled() {
            let mut bucket = std::mem::take(&mut self.job_buckets[suit]);
            bucket.sort_by_key(|card| card.rank.value());
            if bucket.is_empty() {
                return;
            }
            let marker = bucket.remove(0);
            self.players[winner].plot.stacks.push(Stack {
                suit: Some(suit),
                revealed: vec![marker],
                hidden: bucket,
            });
        } else if !self.variants.is_reduced_deck() {
            let reward = std::mem::take(&mut self.revealed_jobs[suit]);
            self.players[winner].plot.revealed.extend(reward);
            self.accumulated_unclaimed[suit].clear();
        }
    }
}
