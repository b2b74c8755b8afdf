use crate::model::card::Card;
use crate::model::player::Player;
use crate::model::rank::Rank;
use crate::model::suit::{Suit, SuitMap};
use crate::model::variants::VariantConfig;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};

pub const FULL_HAND_SIZE: usize = 5;

/// Builds the job piles, composes each year's play deck around the cards
/// already in circulation, and deals hands.
#[derive(Debug, Clone, Copy)]
pub struct DeckComposer {
    variants: VariantConfig,
}

impl DeckComposer {
    pub fn new(variants: VariantConfig) -> Self {
        Self { variants }
    }

    /// Full deck: Ace through Five shuffled per suit, one reveal per year.
    /// Reduced deck: a single Ace marks each pile and is never consumed.
    pub fn prepare_job_piles<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> SuitMap<Vec<Card>> {
        SuitMap::from_fn(|suit| {
            if self.variants.is_reduced_deck() {
                vec![Card::new(suit, Rank::Ace)]
            } else {
                let mut pile: Vec<Card> = Rank::JOB_MARKERS
                    .iter()
                    .map(|rank| Card::new(suit, *rank))
                    .collect();
                pile.shuffle(rng);
                pile
            }
        })
    }

    /// Reveals the next job card for every suit. Accumulated unclaimed cards
    /// are drained into the reveal so they cannot be counted twice.
    pub fn reveal_jobs(
        &self,
        job_piles: &mut SuitMap<Vec<Card>>,
        accumulated: &mut SuitMap<Vec<Card>>,
    ) -> SuitMap<Vec<Card>> {
        SuitMap::from_fn(|suit| {
            if self.variants.is_reduced_deck() {
                job_piles[suit].clone()
            } else {
                let mut reveal = if self.variants.accumulate_unclaimed_jobs {
                    std::mem::take(&mut accumulated[suit])
                } else {
                    Vec::new()
                };
                if let Some(card) = job_piles[suit].pop() {
                    reveal.push(card);
                }
                reveal
            }
        })
    }

    /// Shuffles every worker card not currently held anywhere into a fresh
    /// play deck. Exiled cards stay out, except under the orden variant where
    /// they return to circulation.
    pub fn prepare_workers_deck<R: rand::Rng + ?Sized>(
        &self,
        players: &[Player],
        exiled: &BTreeMap<u32, Vec<Card>>,
        rng: &mut R,
    ) -> Vec<Card> {
        let mut used: HashSet<Card> = HashSet::new();
        for player in players {
            used.extend(player.hand.iter().copied());
            used.extend(player.plot.revealed.iter().copied());
            used.extend(player.plot.hidden.iter().copied());
            for stack in &player.plot.stacks {
                used.extend(stack.revealed.iter().copied());
                used.extend(stack.hidden.iter().copied());
            }
        }
        if !self.variants.orden_enabled() {
            for cards in exiled.values() {
                used.extend(cards.iter().copied());
            }
        }

        let mut deck = Vec::with_capacity(Suit::ALL.len() * Rank::WORKERS.len());
        for suit in Suit::ALL {
            for rank in Rank::WORKERS {
                let card = Card::new(suit, rank);
                if !used.contains(&card) {
                    deck.push(card);
                }
            }
        }
        deck.shuffle(rng);
        deck
    }

    /// Deals round-robin, never unevenly: when the deck cannot supply five
    /// cards per player, everyone gets the same smaller hand and the year is
    /// a famine. Returns the dealt hand size and the famine flag.
    pub fn deal_hands(&self, players: &mut [Player], deck: &mut Vec<Card>) -> (usize, bool) {
        let per_player = FULL_HAND_SIZE.min(deck.len() / players.len().max(1));
        for _ in 0..per_player {
            for player in players.iter_mut() {
                if let Some(card) = deck.pop() {
                    player.hand.push(card);
                }
            }
        }
        (per_player, per_player < FULL_HAND_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::{DeckComposer, FULL_HAND_SIZE};
    use crate::model::card::Card;
    use crate::model::player::Player;
    use crate::model::rank::Rank;
    use crate::model::suit::{Suit, SuitMap};
    use crate::model::variants::{DeckType, VariantConfig};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn players(count: usize) -> Vec<Player> {
        (0..count)
            .map(|index| Player::new(index, index == 0, format!("P{index}")))
            .collect()
    }

    #[test]
    fn full_deck_piles_hold_five_markers_each() {
        let composer = DeckComposer::new(VariantConfig::default());
        let mut rng = StdRng::seed_from_u64(1);
        let piles = composer.prepare_job_piles(&mut rng);
        for (_, pile) in piles.iter() {
            assert_eq!(pile.len(), 5);
            assert!(pile.iter().all(|card| !card.is_worker()));
        }
    }

    #[test]
    fn reduced_deck_piles_hold_a_single_ace() {
        let variants = VariantConfig {
            deck_type: DeckType::Reduced36,
            ..VariantConfig::default()
        };
        let composer = DeckComposer::new(variants);
        let mut rng = StdRng::seed_from_u64(1);
        let piles = composer.prepare_job_piles(&mut rng);
        for (suit, pile) in piles.iter() {
            assert_eq!(pile, &vec![Card::new(suit, Rank::Ace)]);
        }
    }

    #[test]
    fn reveal_drains_accumulated_cards() {
        let variants = VariantConfig {
            accumulate_unclaimed_jobs: true,
            ..VariantConfig::default()
        };
        let composer = DeckComposer::new(variants);
        let mut rng = StdRng::seed_from_u64(3);
        let mut piles = composer.prepare_job_piles(&mut rng);
        let mut accumulated: SuitMap<Vec<Card>> = SuitMap::new();
        accumulated[Suit::Clubs].push(Card::new(Suit::Clubs, Rank::Two));

        let revealed = composer.reveal_jobs(&mut piles, &mut accumulated);

        assert_eq!(revealed[Suit::Clubs].len(), 2);
        assert!(accumulated[Suit::Clubs].is_empty());
        assert_eq!(revealed[Suit::Hearts].len(), 1);
        assert_eq!(piles[Suit::Hearts].len(), 4);
    }

    #[test]
    fn workers_deck_excludes_held_and_exiled_cards() {
        let composer = DeckComposer::new(VariantConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        let mut players = players(2);
        players[0].hand.push(Card::new(Suit::Hearts, Rank::King));
        players[1]
            .plot
            .hidden
            .push(Card::new(Suit::Spades, Rank::Six));
        let mut exiled = BTreeMap::new();
        exiled.insert(1, vec![Card::new(Suit::Clubs, Rank::Ten)]);

        let deck = composer.prepare_workers_deck(&players, &exiled, &mut rng);

        assert_eq!(deck.len(), 29);
        assert!(!deck.contains(&Card::new(Suit::Hearts, Rank::King)));
        assert!(!deck.contains(&Card::new(Suit::Spades, Rank::Six)));
        assert!(!deck.contains(&Card::new(Suit::Clubs, Rank::Ten)));
    }

    #[test]
    fn orden_variant_returns_exiles_to_circulation() {
        let variants = VariantConfig {
            deck_type: DeckType::Reduced36,
            orden_nachalniku: true,
            ..VariantConfig::default()
        };
        let composer = DeckComposer::new(variants);
        let mut rng = StdRng::seed_from_u64(5);
        let mut exiled = BTreeMap::new();
        exiled.insert(1, vec![Card::new(Suit::Clubs, Rank::Ten)]);

        let deck = composer.prepare_workers_deck(&players(2), &exiled, &mut rng);

        assert_eq!(deck.len(), 32);
        assert!(deck.contains(&Card::new(Suit::Clubs, Rank::Ten)));
    }

    #[test]
    fn short_deck_deals_equal_hands_and_flags_famine() {
        let composer = DeckComposer::new(VariantConfig::default());
        let mut players = players(3);
        // 11 cards for 3 players: everyone gets 3, two stay undealt
        let mut deck: Vec<Card> = Suit::ALL
            .iter()
            .flat_map(|suit| {
                Rank::WORKERS
                    .iter()
                    .map(|rank| Card::new(*suit, *rank))
                    .collect::<Vec<_>>()
            })
            .take(11)
            .collect();

        let (hand_size, famine) = composer.deal_hands(&mut players, &mut deck);

        assert_eq!(hand_size, 3);
        assert!(famine);
        assert!(players.iter().all(|p| p.hand.len() == 3));
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn full_deal_gives_five_each() {
        let composer = DeckComposer::new(VariantConfig::default());
        let mut rng = StdRng::seed_from_u64(9);
        let mut players = players(4);
        let mut deck = composer.prepare_workers_deck(&players, &BTreeMap::new(), &mut rng);

        let (hand_size, famine) = composer.deal_hands(&mut players, &mut deck);

        assert_eq!(hand_size, FULL_HAND_SIZE);
        assert!(!famine);
        assert_eq!(deck.len(), 32 - 4 * FULL_HAND_SIZE);
    }
}
