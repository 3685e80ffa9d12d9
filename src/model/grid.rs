//! Slot layout: maps a card's `place_order` to canvas coordinates and back.

use crate::config::GameConfig;
use crate::model::card::{Card, Rect};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub padding: f64,
    pub capacity: usize,
    pub cols: usize,
    pub rows: usize,
    start_x: f64,
    start_y: f64,
}

impl GridLayout {
    pub fn new(
        (canvas_width, canvas_height): (f64, f64),
        (card_width, card_height): (f64, f64),
        padding: f64,
        capacity: usize,
    ) -> Self {
        let capacity = capacity.max(1);
        let cols = (capacity as f64).sqrt().ceil() as usize;
        let rows = capacity.div_ceil(cols);
        let grid_width = cols as f64 * (card_width + padding) - padding;
        let grid_height = rows as f64 * (card_height + padding) - padding;
        Self {
            canvas_width,
            canvas_height,
            card_width,
            card_height,
            padding,
            capacity,
            cols,
            rows,
            start_x: (canvas_width - grid_width) / 2.0,
            start_y: (canvas_height - grid_height) / 2.0,
        }
    }

    pub fn from_config(cfg: &GameConfig, canvas: (f64, f64), capacity: usize) -> Self {
        Self::new(canvas, (cfg.card_width, cfg.card_height), cfg.card_padding, capacity)
    }

    pub fn card_size(&self) -> (f64, f64) {
        (self.card_width, self.card_height)
    }

    /// Top-left corner of slot `place_order`, or `None` past capacity.
    pub fn position_for(&self, place_order: usize) -> Option<(f64, f64)> {
        if place_order >= self.capacity {
            return None;
        }
        let row = place_order / self.cols;
        let col = place_order % self.cols;
        Some((
            self.start_x + col as f64 * (self.card_width + self.padding),
            self.start_y + row as f64 * (self.card_height + self.padding),
        ))
    }

    pub fn slot_rect(&self, place_order: usize) -> Option<Rect> {
        self.position_for(place_order).map(|(x, y)| Rect {
            x,
            y,
            width: self.card_width,
            height: self.card_height,
        })
    }

    /// Drop-target resolution. A point in an inner padding gutter belongs to the slot on its
    /// left/top; the outer edge of the grid ends at the last card.
    pub fn slot_at(&self, x: f64, y: f64) -> Option<usize> {
        let (dx, dy) = (x - self.start_x, y - self.start_y);
        let col = (dx / (self.card_width + self.padding)).floor();
        let row = (dy / (self.card_height + self.padding)).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let in_cell_x = dx - col as f64 * (self.card_width + self.padding);
        let in_cell_y = dy - row as f64 * (self.card_height + self.padding);
        if (col == self.cols - 1 && in_cell_x > self.card_width)
            || (row == self.rows - 1 && in_cell_y > self.card_height)
        {
            return None;
        }
        let slot = row * self.cols + col;
        (slot < self.capacity).then_some(slot)
    }

    /// First slot no active card claims.
    pub fn find_free_slot(&self, cards: &[Card]) -> Option<usize> {
        let mut taken = vec![false; self.capacity];
        for c in cards.iter().filter(|c| !c.is_matched) {
            if let Some(t) = taken.get_mut(c.place_order) {
                *t = true;
            }
        }
        taken.iter().position(|t| !t)
    }
}
