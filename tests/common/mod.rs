#![allow(dead_code)]

use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use merge_idle::config::{GameConfig, SAVE_VERSION};
use merge_idle::model::{CardId, GameState, GridLayout, Player, Point};
use merge_idle::persistence::{CardRecord, GameSnapshot};

pub const CANVAS: (f64, f64) = (400.0, 400.0);

pub fn config() -> Rc<GameConfig> {
    Rc::new(GameConfig::default())
}

/// Drives a future whose collaborators all answer synchronously.
pub fn now_or_never<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    match fut.as_mut().poll(&mut cx) {
        Poll::Ready(v) => v,
        Poll::Pending => panic!("future was not ready"),
    }
}

pub fn player(id: &str) -> Player {
    Player { id: id.to_string(), name: "Tester".to_string(), is_name_editable: true }
}

/// Snapshot with `cards` given as `(id, slot, level, value)`.
pub fn snapshot(timestamp: u64, score: f64, cards: &[(&str, usize, u32, u8)]) -> GameSnapshot {
    let cfg = config();
    let grid = GridLayout::from_config(&cfg, CANVAS, cfg.capacity(0));
    GameSnapshot {
        version: SAVE_VERSION.to_string(),
        timestamp,
        player: player("player-1"),
        high_score: score,
        score,
        cards: cards
            .iter()
            .map(|&(id, slot, level, value)| {
                let (x, y) = grid.position_for(slot).unwrap();
                CardRecord {
                    id: CardId::new(id),
                    x,
                    y,
                    width: cfg.card_width,
                    height: cfg.card_height,
                    level,
                    value,
                    original_x: x,
                    original_y: y,
                    place_order: slot,
                }
            })
            .collect(),
        additional_slot_rows: 0,
        total_draw_cards: 0,
        pending_offline_earnings: 0.0,
    }
}

pub fn restore(snap: GameSnapshot) -> GameState {
    snap.restore(config(), CANVAS, 7)
}

pub fn slot_center(state: &GameState, slot: usize) -> Point {
    let r = state.grid().slot_rect(slot).unwrap();
    Point::new(r.x + r.width / 2.0, r.y + r.height / 2.0)
}

/// Press on `from`, drag past the threshold and release over `to`.
pub fn drag(state: &mut GameState, from: usize, to: usize, now_ms: u64) -> merge_idle::model::PointerOutcome {
    let start = slot_center(state, from);
    let end = slot_center(state, to);
    state.pointer_down(start, now_ms);
    state.pointer_move(Point::new(start.x + 30.0, start.y + 30.0));
    state.pointer_move(end);
    state.pointer_up(end, now_ms + 400)
}
