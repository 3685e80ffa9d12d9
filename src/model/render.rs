use crate::model::card::{Card, Rect};
use crate::model::game::GameState;

/// Drawing backend. Implemented by the canvas view; the core only decides what and in which order.
pub trait Renderer {
    fn clear(&mut self, width: f64, height: f64);
    fn draw_slot(&mut self, rect: Rect);
    fn draw_card(&mut self, card: &Card);
}

/// Empty slots first, then resting cards in board order, the dragged card last so it stays on top.
pub fn render_board<R: Renderer + ?Sized>(state: &GameState, renderer: &mut R) {
    let grid = state.grid();
    renderer.clear(grid.canvas_width, grid.canvas_height);
    for slot in 0..grid.capacity {
        if let Some(rect) = grid.slot_rect(slot) {
            renderer.draw_slot(rect);
        }
    }
    let dragged = state.interaction().dragged_card();
    let mut top = None;
    for card in state.board().cards() {
        if Some(&card.id) == dragged {
            top = Some(card);
        } else {
            renderer.draw_card(card);
        }
    }
    if let Some(card) = top {
        renderer.draw_card(card);
    }
}
