use kolkhoz_core::THRESHOLD;
use kolkhoz_core::game::state::GameState;
use kolkhoz_core::model::card::Card;
use kolkhoz_core::model::suit::Suit;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};

/// One hidden-for-hand exchange during the swap phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChoice {
    pub hidden_index: usize,
    pub hand_index: usize,
}

/// Unified interface for automated players.
pub trait Strategy: Send {
    /// Choose the hand index to play into the open trick.
    fn choose_play(&mut self, state: &GameState, player: usize) -> usize;

    /// Distribute the won trick's cards over the job buckets.
    fn choose_assignments(&mut self, state: &GameState, player: usize) -> Vec<(Card, Suit)>;

    /// Optional: exchange a hidden plot card for a hand card.
    fn choose_swap(&mut self, state: &GameState, player: usize) -> Option<SwapChoice> {
        let _ = (state, player);
        None
    }
}

/// Uniformly random legal moves; the baseline opponent.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn choose_play(&mut self, state: &GameState, player: usize) -> usize {
        let legal = state.valid_plays(player).unwrap_or_default();
        if legal.is_empty() {
            return 0;
        }
        legal[self.rng.gen_range(0..legal.len())]
    }

    fn choose_assignments(&mut self, state: &GameState, _player: usize) -> Vec<(Card, Suit)> {
        let suits = trick_suits(state);
        state
            .last_trick()
            .iter()
            .map(|play| {
                let target = suits[self.rng.gen_range(0..suits.len())];
                (play.card, target)
            })
            .collect()
    }

    fn choose_swap(&mut self, state: &GameState, player: usize) -> Option<SwapChoice> {
        let p = state.player(player)?;
        if p.plot.hidden.is_empty() || p.hand.is_empty() || self.rng.gen_bool(0.5) {
            return None;
        }
        Some(SwapChoice {
            hidden_index: self.rng.gen_range(0..p.plot.hidden.len()),
            hand_index: self.rng.gen_range(0..p.hand.len()),
        })
    }
}

/// Deterministic one-ply heuristic: wins tricks as cheaply as possible and
/// steers hours toward jobs that can still be finished.
pub struct GreedyStrategy;

impl GreedyStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for GreedyStrategy {
    fn choose_play(&mut self, state: &GameState, player: usize) -> usize {
        let legal = state.valid_plays(player).unwrap_or_default();
        let Some(p) = state.player(player) else {
            return 0;
        };

        let mut cheapest_winner: Option<(usize, u8)> = None;
        let mut cheapest: Option<(usize, u8)> = None;
        for &index in &legal {
            let Some(card) = p.hand.get(index) else {
                continue;
            };
            let value = card.rank.value();
            if cheapest.is_none_or(|(_, v)| value < v) {
                cheapest = Some((index, value));
            }
            if would_win(state, card) && cheapest_winner.is_none_or(|(_, v)| value < v) {
                cheapest_winner = Some((index, value));
            }
        }

        let (index, _) = cheapest_winner.or(cheapest).unwrap_or((0, 0));
        log_play_decision(state, player, &legal, index, cheapest_winner.is_some());
        index
    }

    fn choose_assignments(&mut self, state: &GameState, player: usize) -> Vec<(Card, Suit)> {
        let suits = trick_suits(state);
        state
            .last_trick()
            .iter()
            .map(|play| {
                let target = suits
                    .iter()
                    .copied()
                    .max_by_key(|suit| score_assignment(state, player, play.card, *suit))
                    .unwrap_or(play.card.suit);
                (play.card, target)
            })
            .collect()
    }

    /// Buries the strongest hand card when the plot hides something weaker:
    /// plot cards are end-game points, hand cards are spent on tricks.
    fn choose_swap(&mut self, state: &GameState, player: usize) -> Option<SwapChoice> {
        let p = state.player(player)?;
        let (hand_index, hand_card) = p
            .hand
            .iter()
            .enumerate()
            .max_by_key(|(_, card)| card.rank.value())
            .map(|(index, card)| (index, *card))?;
        let (hidden_index, hidden_card) = p
            .plot
            .hidden
            .iter()
            .enumerate()
            .min_by_key(|(_, card)| card.rank.value())
            .map(|(index, card)| (index, *card))?;
        if hand_card.rank.value() > hidden_card.rank.value() {
            Some(SwapChoice {
                hidden_index,
                hand_index,
            })
        } else {
            None
        }
    }
}

/// Suits represented in the resolved trick; the only legal assignment
/// targets.
fn trick_suits(state: &GameState) -> Vec<Suit> {
    let mut suits: Vec<Suit> = state
        .last_trick()
        .iter()
        .map(|play| play.card.suit)
        .collect();
    suits.sort_unstable();
    suits.dedup();
    suits
}

/// Would `card` take the trick as it stands, assuming nobody after us beats
/// it? Mirrors the resolver: trump outranks the lead suit, higher rank wins
/// within the deciding suit, a tie stays with the earlier play.
fn would_win(state: &GameState, card: Card) -> bool {
    let trick = state.current_trick();
    let Some(first) = trick.first() else {
        // leading: a trump or any card leads the trick as its current winner
        return true;
    };
    let lead = first.card.suit;
    let trump = state.trump();
    let trump_in_play = |suit: Suit| trump == Some(suit);

    let deciding = if trump_in_play(card.suit)
        || trick.iter().any(|play| trump_in_play(play.card.suit))
    {
        match trump {
            Some(t) => t,
            None => lead,
        }
    } else {
        lead
    };

    if card.suit != deciding {
        return false;
    }
    trick
        .iter()
        .filter(|play| play.card.suit == deciding)
        .all(|play| card.rank.value() > play.card.rank.value())
}

/// Relative value of booking `card` onto `target`. Finishing a job dominates,
/// topping up a job past the halfway mark comes next, and pouring hours into
/// a claimed or hopeless job is discouraged.
fn score_assignment(state: &GameState, player: usize, card: Card, target: Suit) -> i32 {
    if state.is_claimed(target) {
        return -20;
    }
    let at_risk = i32::from(
        state
            .player(player)
            .is_some_and(|p| p.won_trick_this_year),
    );
    let hours = state.work_hours()[target] as i32;
    let card_hours = card_hours(state, card) as i32;
    let threshold = THRESHOLD as i32;

    let mut score = if hours + card_hours >= threshold {
        100 + at_risk * 30
    } else if hours >= 20 {
        40 + (hours - 20) + at_risk * 15
    } else if hours >= 10 {
        15 + at_risk * 10
    } else {
        -10 + at_risk * 8
    };
    if card_hours >= 10 && hours >= 25 {
        score += 20;
    }
    if card.suit == target && hours < 20 {
        score -= 5;
    }
    score
}

fn card_hours(state: &GameState, card: Card) -> u32 {
    let drunkard = state.variants().face_effects()
        && state.trump() == Some(card.suit)
        && card.rank == kolkhoz_core::model::rank::Rank::Jack;
    if drunkard {
        0
    } else {
        u32::from(card.rank.value())
    }
}

fn log_play_decision(
    state: &GameState,
    player: usize,
    legal: &[usize],
    chosen: usize,
    winning: bool,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let card = state
        .player(player)
        .and_then(|p| p.hand.get(chosen))
        .map(|card| card.to_string())
        .unwrap_or_default();

    event!(
        target: "kolkhoz_bot::play",
        Level::DEBUG,
        player,
        year = state.year(),
        trick_cards = state.current_trick().len(),
        legal_count = legal.len(),
        chosen = %card,
        winning,
    );
}

#[cfg(test)]
mod tests {
    use super::{GreedyStrategy, RandomStrategy, Strategy};
    use kolkhoz_core::game::state::{GameState, Phase};
    use kolkhoz_core::model::suit::Suit;
    use kolkhoz_core::model::variants::VariantConfig;

    fn start(seed: u64) -> GameState {
        let mut state = GameState::with_seed(4, VariantConfig::default(), seed);
        state.set_trump(None).unwrap();
        state
    }

    #[test]
    fn random_plays_stay_legal() {
        let mut strategy = RandomStrategy::with_seed(7);
        for seed in 0..20 {
            let state = start(seed);
            let player = state.current_player().unwrap();
            let index = strategy.choose_play(&state, player);
            assert!(state.valid_plays(player).unwrap().contains(&index));
        }
    }

    #[test]
    fn greedy_plays_stay_legal() {
        let mut strategy = GreedyStrategy::new();
        for seed in 0..20 {
            let mut state = start(seed);
            let leader = state.current_player().unwrap();
            let lead_index = strategy.choose_play(&state, leader);
            state.play_card(leader, lead_index).unwrap();

            let follower = state.current_player().unwrap();
            let index = strategy.choose_play(&state, follower);
            assert!(state.valid_plays(follower).unwrap().contains(&index));
        }
    }

    #[test]
    fn assignments_cover_the_trick_with_legal_targets() {
        let mut bot = GreedyStrategy::new();
        let mut rnd = RandomStrategy::with_seed(3);
        for seed in 0..20 {
            let mut state = start(seed);
            while state.phase() == Phase::Trick {
                let player = state.current_player().unwrap();
                let index = rnd.choose_play(&state, player);
                state.play_card(player, index).unwrap();
            }
            if state.phase() != Phase::Assignment {
                continue;
            }
            let winner = state.current_player().unwrap();
            for strategy in [&mut bot as &mut dyn Strategy, &mut rnd as &mut dyn Strategy] {
                let assignments = strategy.choose_assignments(&state, winner);
                assert_eq!(assignments.len(), state.last_trick().len());
                let trick_suits: Vec<Suit> = state
                    .last_trick()
                    .iter()
                    .map(|play| play.card.suit)
                    .collect();
                for (card, target) in &assignments {
                    assert!(state.last_trick().iter().any(|play| play.card == *card));
                    assert!(trick_suits.contains(target));
                }
            }
        }
    }

    #[test]
    fn greedy_buries_high_cards_when_it_can() {
        let variants = VariantConfig {
            allow_swap: true,
            ..VariantConfig::default()
        };
        let mut state = GameState::with_seed(4, variants, 11);
        // reach a swap phase by finishing year one
        let mut guard = 0;
        let mut bot = GreedyStrategy::new();
        while state.phase() != Phase::Swap {
            guard += 1;
            assert!(guard < 1000);
            match state.phase() {
                Phase::Planning => state.set_trump(None).unwrap(),
                Phase::Trick => {
                    let player = state.current_player().unwrap();
                    let index = bot.choose_play(&state, player);
                    state.play_card(player, index).unwrap();
                }
                Phase::Assignment => {
                    let winner = state.current_player().unwrap();
                    let assignments = bot.choose_assignments(&state, winner);
                    state.apply_assignments(&assignments).unwrap();
                }
                Phase::Requisition => state.next_year().unwrap(),
                _ => unreachable!(),
            }
        }

        let player = state.current_swap_player().unwrap();
        if let Some(choice) = bot.choose_swap(&state, player) {
            let p = state.player(player).unwrap();
            let hand = p.hand.get(choice.hand_index).unwrap();
            let hidden = p.plot.hidden[choice.hidden_index];
            assert!(hand.rank.value() > hidden.rank.value());
        }
    }
}
