use crate::THRESHOLD;
use crate::game::history::HistoryRecord;
use crate::game::state::GameState;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

impl GameState {
    /// Settles the year's unmet jobs. Runs once the trick quota is reached,
    /// before `next_year` rolls the calendar over.
    pub(crate) fn perform_requisition(&mut self) {
        self.history.push(HistoryRecord::Jobs {
            year: self.year,
            hours: self.work_hours,
        });

        let mut seizures = Vec::new();
        if self.fallback_applies() {
            self.global_fallback_seizure(&mut seizures);
        } else {
            for suit in Suit::ALL {
                if !self.suit_unmet(suit) {
                    continue;
                }
                if self.drunkard_absorbs(suit) {
                    self.exile_drunkard(suit, &mut seizures);
                    continue;
                }
                if self.variants.mice_enabled() {
                    self.mice_seizure(suit, &mut seizures);
                } else if self.variants.orden_enabled() {
                    self.orden_seizure(suit, &mut seizures);
                } else {
                    self.standard_seizure(suit, &mut seizures);
                }
            }
        }

        self.history.push(HistoryRecord::Requisition {
            year: self.year,
            seizures,
        });
    }

    fn suit_unmet(&self, suit: Suit) -> bool {
        !self.claimed_jobs[suit] && self.work_hours[suit] < THRESHOLD
    }

    fn bucket_has_trump(&self, suit: Suit, rank: Rank) -> bool {
        if !self.variants.face_effects() {
            return false;
        }
        let Some(trump) = self.trump else {
            return false;
        };
        self.job_buckets[suit]
            .iter()
            .any(|card| card.suit == trump && card.rank == rank)
    }

    fn drunkard_absorbs(&self, suit: Suit) -> bool {
        self.bucket_has_trump(suit, Rank::Jack)
    }

    /// The drunkard takes the blame for the whole suit and leaves with the
    /// convoy himself: the trump Jack goes from the bucket to the exile log.
    fn exile_drunkard(&mut self, suit: Suit, seizures: &mut Vec<String>) {
        seizures.push(format!("The drunkard absorbs the requisition for {suit}"));
        let Some(trump) = self.trump else {
            return;
        };
        if let Some(index) = self.job_buckets[suit]
            .iter()
            .position(|card| card.suit == trump && card.rank == Rank::Jack)
        {
            let card = self.job_buckets[suit].remove(index);
            seizures.push(format!("The drunkard sent to the North: {card}"));
            self.exiled.entry(self.year).or_default().push(card);
        }
    }

    fn informant_watches(&self, suit: Suit) -> bool {
        self.bucket_has_trump(suit, Rank::Queen)
    }

    fn official_presides(&self, suit: Suit) -> bool {
        self.bucket_has_trump(suit, Rank::King)
    }

    /// Base rules: players who won a trick this year pay for each unmet
    /// suit, and an informant in the bucket widens that to everyone.
    fn standard_seizure(&mut self, suit: Suit, seizures: &mut Vec<String>) {
        let informant = self.informant_watches(suit);
        let official = self.official_presides(suit);
        for player in 0..self.players.len() {
            if !(self.players[player].won_trick_this_year || informant) {
                continue;
            }
            self.reveal_highest_hidden(player, suit);
            self.seize_highest_revealed(player, suit, seizures, false);
            if official {
                self.seize_highest_revealed(player, suit, seizures, true);
            }
        }
    }

    /// Mice rules: every matching hidden card in every plot is exposed, but
    /// only the single highest card of the suit is taken.
    fn mice_seizure(&mut self, suit: Suit, seizures: &mut Vec<String>) {
        for player in &mut self.players {
            let mut index = 0;
            while index < player.plot.hidden.len() {
                if player.plot.hidden[index].suit == suit {
                    let card = player.plot.hidden.remove(index);
                    player.plot.revealed.push(card);
                } else {
                    index += 1;
                }
            }
        }
        self.seize_globally_highest(Some(suit), seizures, false);
        if self.official_presides(suit) {
            self.seize_globally_highest(Some(suit), seizures, true);
        }
    }

    /// Orden rules: stack holders are the visible kulaks. Stack contents
    /// count both as hiding places and as seizable wealth.
    fn orden_seizure(&mut self, suit: Suit, seizures: &mut Vec<String>) {
        let informant = self.informant_watches(suit);
        let official = self.official_presides(suit);
        for player in 0..self.players.len() {
            if !(informant || !self.players[player].plot.stacks.is_empty()) {
                continue;
            }
            self.reveal_highest_stashed(player, suit);
            self.seize_highest_stacked(player, suit, seizures, false);
            if official {
                self.seize_highest_stacked(player, suit, seizures, true);
            }
        }
    }

    /// Flips the player's single highest hidden card of the suit face up.
    fn reveal_highest_hidden(&mut self, player: usize, suit: Suit) {
        let plot = &mut self.players[player].plot;
        let mut best: Option<usize> = None;
        for (index, card) in plot.hidden.iter().enumerate() {
            if card.suit == suit
                && best.is_none_or(|b| card.rank.value() > plot.hidden[b].rank.value())
            {
                best = Some(index);
            }
        }
        if let Some(index) = best {
            let card = plot.hidden.remove(index);
            plot.revealed.push(card);
        }
    }

    /// Takes the player's highest revealed card of the suit. A player with
    /// nothing left to give loses nothing.
    fn seize_highest_revealed(
        &mut self,
        player: usize,
        suit: Suit,
        seizures: &mut Vec<String>,
        by_official: bool,
    ) {
        let plot = &self.players[player].plot;
        let mut best: Option<usize> = None;
        for (index, card) in plot.revealed.iter().enumerate() {
            if card.suit == suit
                && best.is_none_or(|b| card.rank.value() > plot.revealed[b].rank.value())
            {
                best = Some(index);
            }
        }
        if let Some(index) = best {
            let card = self.players[player].plot.revealed.remove(index);
            self.record_seizure(player, card, seizures, by_official);
        }
    }

    fn reveal_highest_stashed(&mut self, player: usize, suit: Suit) {
        enum Source {
            PlotHidden(usize),
            StackHidden(usize, usize),
        }

        let plot = &mut self.players[player].plot;
        let mut best: Option<(Source, u8)> = None;
        for (index, card) in plot.hidden.iter().enumerate() {
            if card.suit == suit && best.as_ref().is_none_or(|(_, v)| card.rank.value() > *v) {
                best = Some((Source::PlotHidden(index), card.rank.value()));
            }
        }
        for (si, stack) in plot.stacks.iter().enumerate() {
            for (ci, card) in stack.hidden.iter().enumerate() {
                if card.suit == suit
                    && best.as_ref().is_none_or(|(_, v)| card.rank.value() > *v)
                {
                    best = Some((Source::StackHidden(si, ci), card.rank.value()));
                }
            }
        }
        match best {
            Some((Source::PlotHidden(index), _)) => {
                let card = plot.hidden.remove(index);
                plot.revealed.push(card);
            }
            Some((Source::StackHidden(si, ci), _)) => {
                let card = plot.stacks[si].hidden.remove(ci);
                plot.stacks[si].revealed.push(card);
            }
            None => {}
        }
    }

    /// Like `seize_highest_revealed` but stack faces are fair game too.
    fn seize_highest_stacked(
        &mut self,
        player: usize,
        suit: Suit,
        seizures: &mut Vec<String>,
        by_official: bool,
    ) {
        enum Source {
            PlotRevealed(usize),
            StackRevealed(usize, usize),
        }

        let plot = &self.players[player].plot;
        let mut best: Option<(Source, u8)> = None;
        for (index, card) in plot.revealed.iter().enumerate() {
            if card.suit == suit && best.as_ref().is_none_or(|(_, v)| card.rank.value() > *v) {
                best = Some((Source::PlotRevealed(index), card.rank.value()));
            }
        }
        for (si, stack) in plot.stacks.iter().enumerate() {
            for (ci, card) in stack.revealed.iter().enumerate() {
                if card.suit == suit
                    && best.as_ref().is_none_or(|(_, v)| card.rank.value() > *v)
                {
                    best = Some((Source::StackRevealed(si, ci), card.rank.value()));
                }
            }
        }
        let card = match best {
            Some((Source::PlotRevealed(index), _)) => {
                self.players[player].plot.revealed.remove(index)
            }
            Some((Source::StackRevealed(si, ci), _)) => {
                let card = self.players[player].plot.stacks[si].revealed.remove(ci);
                self.players[player].plot.prune_stacks();
                card
            }
            None => return,
        };
        self.record_seizure(player, card, seizures, by_official);
    }

    /// Takes the single highest revealed card across all plots, optionally
    /// restricted to one suit.
    fn seize_globally_highest(
        &mut self,
        suit: Option<Suit>,
        seizures: &mut Vec<String>,
        by_official: bool,
    ) {
        let mut best: Option<(usize, usize, u8)> = None;
        for (player, p) in self.players.iter().enumerate() {
            for (index, card) in p.plot.revealed.iter().enumerate() {
                if suit.is_none_or(|s| card.suit == s)
                    && best.is_none_or(|(_, _, v)| card.rank.value() > v)
                {
                    best = Some((player, index, card.rank.value()));
                }
            }
        }
        if let Some((player, index, _)) = best {
            let card = self.players[player].plot.revealed.remove(index);
            self.record_seizure(player, card, seizures, by_official);
        }
    }

    /// Base rules only: a year where every job failed, nobody won a trick,
    /// and no informant surfaced still costs the village its single best
    /// card, hidden or not.
    fn fallback_applies(&self) -> bool {
        if self.variants.mice_enabled() || self.variants.orden_enabled() {
            return false;
        }
        Suit::ALL.iter().all(|suit| self.suit_unmet(*suit))
            && self.players.iter().all(|p| !p.won_trick_this_year)
            && !Suit::ALL.iter().any(|suit| self.informant_watches(*suit))
    }

    fn global_fallback_seizure(&mut self, seizures: &mut Vec<String>) {
        enum Spot {
            Hidden(usize),
            Revealed(usize),
        }

        let mut best: Option<(usize, Spot, u8)> = None;
        for (player, p) in self.players.iter().enumerate() {
            for (index, card) in p.plot.hidden.iter().enumerate() {
                if best.as_ref().is_none_or(|(_, _, v)| card.rank.value() > *v) {
                    best = Some((player, Spot::Hidden(index), card.rank.value()));
                }
            }
            for (index, card) in p.plot.revealed.iter().enumerate() {
                if best.as_ref().is_none_or(|(_, _, v)| card.rank.value() > *v) {
                    best = Some((player, Spot::Revealed(index), card.rank.value()));
                }
            }
        }
        let Some((player, spot, _)) = best else {
            return;
        };
        let card = match spot {
            Spot::Hidden(index) => self.players[player].plot.hidden.remove(index),
            Spot::Revealed(index) => self.players[player].plot.revealed.remove(index),
        };
        self.record_seizure(player, card, seizures, false);

        let official = Suit::ALL
            .iter()
            .any(|suit| self.suit_unmet(*suit) && self.official_presides(*suit));
        if official {
            self.seize_globally_highest(None, seizures, true);
        }
    }

    fn record_seizure(
        &mut self,
        player: usize,
        card: Card,
        seizures: &mut Vec<String>,
        by_official: bool,
    ) {
        let name = self.players[player].name.clone();
        let line = if by_official {
            format!("Party official: {name} sent to the North: {card}")
        } else {
            format!("{name} sent to the North: {card}")
        };
        seizures.push(line);
        self.exiled.entry(self.year).or_default().push(card);
    }
}
