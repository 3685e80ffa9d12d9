mod common;

use common::{drag, restore, slot_center, snapshot};
use merge_idle::model::{render_board, Card, CardId, InteractionState, PointerOutcome, Point, Rect, Renderer};

#[test]
fn buying_a_card_spends_score_and_raises_the_price() {
    let mut state = restore(snapshot(0, 150.0, &[]));
    assert!(state.board().is_empty());
    let price = state.add_card_price();
    assert_eq!(price, 100.0);

    assert!(state.handle_add_card(price));
    assert_eq!(state.progression().score(), 50.0);
    assert_eq!(state.board().len(), 1);
    assert_eq!(state.board().cards()[0].level(), 1);
    assert_eq!(state.board().cards()[0].place_order, 0);
    assert_eq!(state.add_card_price(), 140.0);
    assert_eq!(state.progression().score_per_second(), state.board().score_per_second());
}

#[test]
fn refused_purchase_changes_nothing() {
    let mut state = restore(snapshot(0, 99.0, &[("a", 0, 1, 2)]));
    let before = state.clone();
    assert!(!state.handle_add_card(state.add_card_price()));
    assert_eq!(state, before);

    // Full board: enough score but no free slot
    let cards: Vec<(String, usize)> = (0..10).map(|i| (format!("c{i}"), i)).collect();
    let refs: Vec<(&str, usize, u32, u8)> = cards.iter().map(|(id, s)| (id.as_str(), *s, 1, 1)).collect();
    let mut state = restore(snapshot(0, 1_000.0, &refs));
    let before = state.clone();
    assert!(!state.handle_add_card(100.0));
    assert_eq!(state, before);
}

#[test]
fn equal_cards_merge_into_the_target() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3), ("b", 1, 1, 3)]));
    let out = drag(&mut state, 0, 1, 1_000);
    assert_eq!(
        out,
        PointerOutcome::Merged { survivor: CardId::new("b"), removed: CardId::new("a"), level: 2 }
    );
    let cards = state.board().cards();
    assert_eq!(cards.len(), 1);
    assert_eq!((cards[0].level(), cards[0].value(), cards[0].place_order), (2, 3, 1));
    assert_eq!(cards[0].image_key(), "cards/2/3");
    assert!((state.progression().score_per_second() - 6.75).abs() < 1e-9);
    assert_eq!(state.interaction().state(), &InteractionState::Idle);
}

#[test]
fn unequal_tiers_reject_and_settle_on_their_token() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3), ("b", 1, 2, 3)]));
    let home = slot_center(&state, 0);
    let PointerOutcome::Rejected { token, duration_ms, .. } = drag(&mut state, 0, 1, 1_000) else {
        panic!("expected a rejection");
    };
    assert_eq!(duration_ms, 250);
    assert!(state.board().cards().iter().all(|c| c.is_not_matched));
    assert_eq!(state.interaction().pending_pulse(), Some(token));

    assert_eq!(state.pulse_elapsed(token), PointerOutcome::PulseSettled);
    let a = state.board().get(&CardId::new("a")).unwrap();
    assert!(!a.is_not_matched);
    assert!(a.is_point_inside(home.x, home.y));
    assert_eq!(a.place_order, 0);
    // a second delivery of the same timer is stale
    assert_eq!(state.pulse_elapsed(token), PointerOutcome::Ignored);
    assert_eq!(state.board().len(), 2);
}

#[test]
fn new_press_during_pulse_settles_it_and_old_timer_is_ignored() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3), ("b", 1, 1, 4)]));
    let PointerOutcome::Rejected { token, .. } = drag(&mut state, 0, 1, 1_000) else {
        panic!("expected a rejection");
    };
    let at = slot_center(&state, 1);
    state.pointer_down(at, 2_000);
    assert!(state.board().cards().iter().all(|c| !c.is_not_matched));
    assert_eq!(state.pulse_elapsed(token), PointerOutcome::Ignored);
    assert!(matches!(state.interaction().state(), InteractionState::PressStarted { .. }));
}

#[test]
fn dropping_on_an_empty_slot_relocates() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3)]));
    let out = drag(&mut state, 0, 6, 1_000);
    assert_eq!(out, PointerOutcome::Relocated { card: CardId::new("a"), slot: 6 });
    let a = &state.board().cards()[0];
    assert_eq!(Some((a.x, a.y)), state.grid().position_for(6));
    assert_eq!((a.original_x, a.original_y), (a.x, a.y));
}

#[test]
fn dropping_off_the_grid_snaps_back() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3)]));
    let start = slot_center(&state, 0);
    state.pointer_down(start, 0);
    state.pointer_move(Point::new(5.0, 5.0));
    let out = state.pointer_up(Point::new(5.0, 5.0), 500);
    assert_eq!(out, PointerOutcome::SnappedBack(CardId::new("a")));
    assert_eq!(Some((state.board().cards()[0].x, state.board().cards()[0].y)), state.grid().position_for(0));
}

#[test]
fn click_selects_and_info_button_opens_details() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3), ("b", 1, 1, 3)]));
    let at = slot_center(&state, 0);
    state.pointer_down(at, 0);
    let out = state.pointer_up(at, 50);
    assert_eq!(out, PointerOutcome::SelectionToggled { card: CardId::new("a"), selected: true });

    let button = state.board().cards()[0].info_button().unwrap();
    let tap = Point::new(button.x + button.width / 2.0, button.y + button.height / 2.0);
    state.pointer_down(tap, 100);
    assert_eq!(state.pointer_up(tap, 150), PointerOutcome::InfoRequested(CardId::new("a")));
    assert_eq!(state.info_card().map(|c| c.id.clone()), Some(CardId::new("a")));
    state.close_card_info();
    assert!(state.info_card().is_none());

    // slow press is neither click nor drag
    state.pointer_down(at, 1_000);
    assert_eq!(state.pointer_up(at, 1_500), PointerOutcome::Ignored);
}

#[test]
fn score_ticks_use_the_live_card_set() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3), ("b", 1, 1, 3)]));
    state.tick_second();
    assert_eq!(state.progression().score(), 6.0);
    drag(&mut state, 0, 1, 1_000);
    state.tick_second();
    assert!((state.progression().score() - 12.75).abs() < 1e-9);
    for _ in 0..500 {
        state.tick_display();
    }
    assert!(state.progression().display_score() <= state.progression().score() + state.progression().score_per_second());
}

#[derive(Debug, PartialEq)]
enum Op {
    Clear,
    Slot,
    Card(String),
}

#[derive(Default)]
struct Recorder(Vec<Op>);

impl Renderer for Recorder {
    fn clear(&mut self, _width: f64, _height: f64) {
        self.0.push(Op::Clear);
    }

    fn draw_slot(&mut self, _rect: Rect) {
        self.0.push(Op::Slot);
    }

    fn draw_card(&mut self, card: &Card) {
        self.0.push(Op::Card(card.id.as_str().to_string()));
    }
}

#[test]
fn dragged_card_is_drawn_last() {
    let mut state = restore(snapshot(0, 0.0, &[("a", 0, 1, 3), ("b", 1, 1, 4), ("c", 2, 1, 5)]));
    let start = slot_center(&state, 0);
    state.pointer_down(start, 0);
    state.pointer_move(Point::new(start.x + 40.0, start.y + 40.0));

    let mut rec = Recorder::default();
    render_board(&state, &mut rec);
    assert_eq!(rec.0[0], Op::Clear);
    let slots = rec.0.iter().filter(|op| **op == Op::Slot).count();
    assert_eq!(slots, state.capacity());
    let cards: Vec<&Op> = rec.0.iter().filter(|op| matches!(op, Op::Card(_))).collect();
    assert_eq!(cards, vec![&Op::Card("b".into()), &Op::Card("c".into()), &Op::Card("a".into())]);
}
