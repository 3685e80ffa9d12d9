mod common;

use common::{config, drag, CANVAS};
use merge_idle::model::GameState;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Step {
    Tick(u8),
    Buy,
    Drag(usize, usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u8..60).prop_map(Step::Tick),
        Just(Step::Buy),
        (0usize..10, 0usize..10).prop_map(|(a, b)| Step::Drag(a, b)),
    ]
}

proptest! {
    #[test]
    fn board_stays_consistent(seed in any::<u64>(), steps in prop::collection::vec(step(), 1..40)) {
        let mut state = GameState::new_game(config(), CANVAS, seed);
        let mut high = state.progression().high_score();
        let mut now = 0u64;
        for s in steps {
            now += 1_000;
            match s {
                Step::Tick(n) => (0..n).for_each(|_| state.tick_second()),
                Step::Buy => {
                    state.handle_add_card(state.add_card_price());
                }
                Step::Drag(from, to) => {
                    drag(&mut state, from, to, now);
                    if let Some(token) = state.interaction().pending_pulse() {
                        state.pulse_elapsed(token);
                    }
                }
            }
            prop_assert!(state.board().has_unique_slots());
            prop_assert!(state.board().len() <= state.capacity());
            prop_assert!(state.board().cards().iter().all(|c| !c.is_matched && c.place_order < state.capacity()));
            prop_assert!(state.progression().high_score() >= high);
            prop_assert!(state.progression().high_score() >= state.progression().score());
            prop_assert!((state.progression().score_per_second() - state.board().score_per_second()).abs() < 1e-6);
            high = state.progression().high_score();
        }
    }
}
