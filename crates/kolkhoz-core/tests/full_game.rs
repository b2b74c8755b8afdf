//! Drives whole games to completion under every variant mix and checks the
//! engine's bookkeeping along the way.

use kolkhoz_core::MAX_YEARS;
use kolkhoz_core::game::state::{GameState, Phase};
use kolkhoz_core::model::suit::Suit;
use kolkhoz_core::model::variants::{DeckType, VariantConfig};

fn run_to_completion(mut state: GameState) -> GameState {
    let mut steps = 0;
    while state.phase() != Phase::GameOver {
        steps += 1;
        assert!(steps < 10_000, "game did not terminate");
        match state.phase() {
            Phase::Planning => state.set_trump(None).unwrap(),
            Phase::Swap => {
                let player = state.current_swap_player().unwrap();
                let can_swap = !state.players()[player].plot.hidden.is_empty()
                    && !state.players()[player].hand.is_empty();
                if can_swap {
                    state.swap_card(player, 0, 0).unwrap();
                }
                state.complete_swap(player).unwrap();
            }
            Phase::Trick => {
                let player = state.current_player().unwrap();
                state.play_card(player, 0).unwrap();
            }
            Phase::Assignment => {
                let assignments: Vec<(kolkhoz_core::model::card::Card, Suit)> = state
                    .last_trick()
                    .iter()
                    .map(|play| (play.card, play.card.suit))
                    .collect();
                state.apply_assignments(&assignments).unwrap();
            }
            Phase::Requisition => state.next_year().unwrap(),
            Phase::GameOver => unreachable!(),
        }
    }
    state
}

fn variant_matrix() -> Vec<(&'static str, VariantConfig)> {
    vec![
        ("default", VariantConfig::default()),
        (
            "reduced_orden",
            VariantConfig {
                deck_type: DeckType::Reduced36,
                orden_nachalniku: true,
                ..VariantConfig::default()
            },
        ),
        (
            "mice",
            VariantConfig {
                mice_variant: true,
                ..VariantConfig::default()
            },
        ),
        (
            "accumulate_medals",
            VariantConfig {
                accumulate_unclaimed_jobs: true,
                medals_count: true,
                ..VariantConfig::default()
            },
        ),
        (
            "swap_nomenclature",
            VariantConfig {
                allow_swap: true,
                nomenclature: true,
                special_effects: false,
                ..VariantConfig::default()
            },
        ),
        (
            "northern",
            VariantConfig {
                northern_style: true,
                deck_type: DeckType::Reduced36,
                ..VariantConfig::default()
            },
        ),
    ]
}

#[test]
fn every_variant_mix_plays_out_five_years() {
    for (label, variants) in variant_matrix() {
        for seed in [1, 17, 4242] {
            let state = run_to_completion(GameState::with_seed(4, variants, seed));
            assert_eq!(state.year(), MAX_YEARS + 1, "{label} seed {seed}");
            assert_eq!(state.final_scores().len(), 4, "{label} seed {seed}");
        }
    }
}

#[test]
fn two_and_three_player_games_terminate() {
    for players in [2, 3] {
        let state = run_to_completion(GameState::with_seed(
            players,
            VariantConfig::default(),
            99,
        ));
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.final_scores().len(), players);
    }
}

#[test]
fn history_covers_every_year() {
    use kolkhoz_core::game::history::HistoryRecord;

    let state = run_to_completion(GameState::with_seed(4, VariantConfig::default(), 7));
    for year in 1..=MAX_YEARS {
        assert!(
            state
                .history()
                .iter()
                .any(|r| matches!(r, HistoryRecord::Jobs { year: y, .. } if *y == year)),
            "no jobs record for year {year}"
        );
        assert!(
            state
                .history()
                .iter()
                .any(|r| matches!(r, HistoryRecord::Requisition { year: y, .. } if *y == year)),
            "no requisition record for year {year}"
        );
    }
}

#[test]
fn final_scores_include_the_hidden_plot() {
    let state = run_to_completion(GameState::with_seed(4, VariantConfig::default(), 31));
    let running = state.scores();
    let fin = state.final_scores();
    for (player, (r, f)) in running.iter().zip(&fin).enumerate() {
        let hidden: u32 = state.players()[player]
            .plot
            .hidden
            .iter()
            .map(|card| u32::from(card.rank.value()))
            .sum();
        assert_eq!(r + hidden, *f);
    }
}

#[test]
fn seeded_games_replay_identically() {
    let a = run_to_completion(GameState::with_seed(4, VariantConfig::default(), 1234));
    let b = run_to_completion(GameState::with_seed(4, VariantConfig::default(), 1234));
    assert_eq!(a.final_scores(), b.final_scores());
    assert_eq!(a.history(), b.history());
    assert_eq!(a.exiled(), b.exiled());
}
