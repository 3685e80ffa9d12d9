use crate::config::GameConfig;
use crate::model::board::Board;

/// Score bookkeeping. The display score is cosmetic and re-synced to the real score every tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Progression {
    score: f64,
    display_score: f64,
    high_score: f64,
    score_per_second: f64,
    pub cards_purchased: u32,
    pub slot_rows_purchased: u32,
}

impl Progression {
    pub fn restore(score: f64, high_score: f64, cards_purchased: u32, slot_rows_purchased: u32) -> Self {
        let score = sanitize(score);
        Self {
            score,
            display_score: score,
            high_score: sanitize(high_score).max(score),
            score_per_second: 0.0,
            cards_purchased,
            slot_rows_purchased,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn display_score(&self) -> f64 {
        self.display_score
    }

    pub fn high_score(&self) -> f64 {
        self.high_score
    }

    pub fn score_per_second(&self) -> f64 {
        self.score_per_second
    }

    /// Re-reads `Σ point` from the live card set.
    pub fn recompute_rate(&mut self, board: &Board) {
        self.score_per_second = board.score_per_second();
    }

    /// One real-score tick: adds a full second of earnings.
    pub fn tick_second(&mut self) {
        self.credit(self.score_per_second);
    }

    /// Fine-grained cosmetic tick. Never runs more than one second ahead of the real score.
    pub fn tick_display(&mut self, tick_ms: u32) {
        let step = self.score_per_second * f64::from(tick_ms) / 1000.0;
        self.display_score = (self.display_score + step).min(self.score + self.score_per_second);
    }

    pub fn credit(&mut self, amount: f64) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        self.score += amount;
        self.display_score = self.score;
        self.high_score = self.high_score.max(self.score);
    }

    /// Deducts `price` from both scores if affordable.
    pub fn spend(&mut self, price: f64) -> bool {
        if !price.is_finite() || price < 0.0 || self.score < price {
            return false;
        }
        self.score = (self.score - price).max(0.0);
        self.display_score = (self.display_score - price).max(0.0).min(self.score);
        true
    }

    pub fn card_price(&self, cfg: &GameConfig) -> f64 {
        cfg.card_price(self.cards_purchased)
    }

    pub fn slot_row_price(&self, cfg: &GameConfig) -> f64 {
        cfg.slot_row_price(self.slot_rows_purchased)
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
