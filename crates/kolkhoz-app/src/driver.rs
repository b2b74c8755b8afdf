use kolkhoz_bot::Strategy;
use kolkhoz_core::game::error::GameError;
use kolkhoz_core::game::state::{GameState, Phase};

/// Plays a game through to the end of the five-year plan, all seats driven
/// by the given strategy.
pub fn drive_to_completion(
    state: &mut GameState,
    strategy: &mut dyn Strategy,
) -> Result<(), GameError> {
    let mut steps: u32 = 0;
    while state.phase() != Phase::GameOver {
        steps += 1;
        if steps > 100_000 {
            return Err(GameError::InconsistentState(
                "game failed to terminate".to_owned(),
            ));
        }
        match state.phase() {
            Phase::Planning => state.set_trump(None)?,
            Phase::Swap => {
                let Some(player) = state.current_swap_player() else {
                    return Err(GameError::InconsistentState(
                        "swap phase with no swap player".to_owned(),
                    ));
                };
                if let Some(choice) = strategy.choose_swap(state, player) {
                    state.swap_card(player, choice.hidden_index, choice.hand_index)?;
                }
                state.complete_swap(player)?;
            }
            Phase::Trick => {
                let Some(player) = state.current_player() else {
                    return Err(GameError::InconsistentState(
                        "trick phase with no player to act".to_owned(),
                    ));
                };
                let index = strategy.choose_play(state, player);
                state.play_card(player, index)?;
            }
            Phase::Assignment => {
                let Some(winner) = state.current_player() else {
                    return Err(GameError::InconsistentState(
                        "assignment phase with no trick winner".to_owned(),
                    ));
                };
                let assignments = strategy.choose_assignments(state, winner);
                state.apply_assignments(&assignments)?;
            }
            Phase::Requisition => state.next_year()?,
            Phase::GameOver => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::drive_to_completion;
    use kolkhoz_bot::{GreedyStrategy, RandomStrategy};
    use kolkhoz_core::MAX_YEARS;
    use kolkhoz_core::game::state::{GameState, Phase};
    use kolkhoz_core::model::variants::VariantConfig;

    #[test]
    fn greedy_games_run_to_the_end() {
        let mut state = GameState::with_seed(4, VariantConfig::default(), 1);
        drive_to_completion(&mut state, &mut GreedyStrategy::new()).unwrap();
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.year(), MAX_YEARS + 1);
    }

    #[test]
    fn random_games_run_to_the_end() {
        let variants = VariantConfig {
            allow_swap: true,
            medals_count: true,
            ..VariantConfig::default()
        };
        let mut state = GameState::with_seed(3, variants, 2);
        drive_to_completion(&mut state, &mut RandomStrategy::with_seed(5)).unwrap();
        assert_eq!(state.phase(), Phase::GameOver);
    }
}
