use crate::MAX_YEARS;
use crate::game::error::GameError;
use crate::game::state::{GameState, Phase};
use crate::model::deck::DeckComposer;
use crate::model::suit::Suit;
use rand::Rng;

impl GameState {
    /// Rolls the calendar over: settles unclaimed rewards, reveals the next
    /// jobs, recomposes the play deck, and deals. After the fifth year the
    /// game is over instead.
    pub fn next_year(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Requisition {
            return Err(GameError::WrongPhase {
                op: "next_year",
                phase: self.phase,
            });
        }

        self.settle_unclaimed_rewards();

        self.year += 1;
        if self.year > MAX_YEARS {
            self.phase = Phase::GameOver;
            return Ok(());
        }

        self.trick_count = 0;
        self.current_trick.clear();
        self.last_trick.clear();
        self.last_winner = None;
        self.work_hours = crate::model::suit::SuitMap::new();

        let composer = DeckComposer::new(self.variants);
        self.revealed_jobs =
            composer.reveal_jobs(&mut self.job_piles, &mut self.accumulated_unclaimed);

        // stacks dissolve at year end: faces become plot wealth, the hidden
        // cards go unheld and recycle into the deck
        for player in &mut self.players {
            let stacks = std::mem::take(&mut player.plot.stacks);
            for stack in stacks {
                player.plot.revealed.extend(stack.revealed);
            }
        }

        for suit in Suit::ALL {
            self.job_buckets[suit].clear();
            self.claimed_jobs[suit] = false;
        }

        let medals_count = self.variants.medals_count;
        for player in &mut self.players {
            let leftovers = player.hand.drain_all();
            player.plot.hidden.extend(leftovers);
            player.reset_for_new_year(medals_count);
        }

        self.workers_deck =
            composer.prepare_workers_deck(&self.players, &self.exiled, &mut self.rng);
        let (hand_size, famine) = composer.deal_hands(&mut self.players, &mut self.workers_deck);
        self.starting_hand_size = hand_size;
        self.is_famine = famine;
        self.verify_card_conservation()?;

        self.lead = self.rng.gen_range(0..self.players.len());
        self.trump = None;

        // with every worker stranded in exile no trick can be played, so the
        // year forfeits straight into the next requisition
        if hand_size == 0 {
            self.perform_requisition();
            self.phase = Phase::Requisition;
            return Ok(());
        }

        if self.variants.allow_swap {
            self.current_swap_player = Some(0);
            self.phase = Phase::Swap;
        } else {
            self.current_swap_player = None;
            self.phase = Phase::Planning;
        }
        Ok(())
    }

    /// Rewards nobody earned this year either roll forward, vanish with the
    /// closing year, or never existed, depending on the deck and variants.
    fn settle_unclaimed_rewards(&mut self) {
        if !self.variants.carries_unclaimed_rewards() {
            return;
        }
        for suit in Suit::ALL {
            if self.claimed_jobs[suit] {
                continue;
            }
            // job markers never rejoin the piles; without the accumulate
            // variant they leave play with the year
            let leftover = std::mem::take(&mut self.revealed_jobs[suit]);
            if self.variants.accumulate_unclaimed_jobs {
                self.accumulated_unclaimed[suit].extend(leftover);
            }
        }
    }
}
