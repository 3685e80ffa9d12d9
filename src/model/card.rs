use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 5;

const INFO_BUTTON_SIZE: f64 = 16.0;
const INFO_BUTTON_INSET: f64 = 4.0;

/// Opaque unique card token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(format!("{:032x}", rng.r#gen::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub x: f64,
    pub y: f64,
    pub original_x: f64,
    pub original_y: f64,
    pub width: f64,
    pub height: f64,
    level: u32,
    value: u8,
    point: f64,
    pub place_order: usize,
    /// Hover highlight while another card is dragged over this one.
    pub is_flipped: bool,
    pub is_matched: bool,
    /// Reject pulse after a failed merge.
    pub is_not_matched: bool,
    pub is_selected: bool,
}

impl Card {
    /// Builds a card resting at `(x, y)`. `level` is clamped to at least 1, `value` into 1..=5.
    pub fn new(
        id: CardId,
        place_order: usize,
        (x, y): (f64, f64),
        (width, height): (f64, f64),
        level: u32,
        value: u8,
        point_rate: f64,
    ) -> Self {
        let level = level.max(1);
        let value = value.clamp(MIN_VALUE, MAX_VALUE);
        Self {
            id,
            x,
            y,
            original_x: x,
            original_y: y,
            width,
            height,
            level,
            value,
            point: point_for(value, level, point_rate),
            place_order,
            is_flipped: false,
            is_matched: false,
            is_not_matched: false,
            is_selected: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Passive points per second contributed by this card.
    pub fn point(&self) -> f64 {
        self.point
    }

    /// Bumps the level by one and refreshes the derived point value.
    pub fn level_up(&mut self, point_rate: f64) {
        self.level = self.level.saturating_add(1);
        self.point = point_for(self.value, self.level, point_rate);
    }

    pub fn is_point_inside(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Equal tiers merge: both value and level must match.
    pub fn can_merge_with(&self, other: &Card) -> bool {
        self.value == other.value && self.level == other.level
    }

    pub fn place_at(&mut self, place_order: usize, (x, y): (f64, f64)) {
        self.place_order = place_order;
        self.x = x;
        self.y = y;
        self.original_x = x;
        self.original_y = y;
    }

    pub fn snap_back(&mut self) {
        self.x = self.original_x;
        self.y = self.original_y;
    }

    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }

    /// Asset key for the renderer; changes whenever the level does.
    pub fn image_key(&self) -> String {
        format!("cards/{}/{}", self.level, self.value)
    }

    /// Top-right info affordance, only live while selected.
    pub fn info_button(&self) -> Option<Rect> {
        if !self.is_selected {
            return None;
        }
        Some(Rect {
            x: self.x + self.width - INFO_BUTTON_SIZE - INFO_BUTTON_INSET,
            y: self.y + INFO_BUTTON_INSET,
            width: INFO_BUTTON_SIZE,
            height: INFO_BUTTON_SIZE,
        })
    }

    pub fn is_info_button_hit(&self, x: f64, y: f64) -> bool {
        let Some(b) = self.info_button() else { return false };
        let r = b.width / 2.0;
        let dx = x - (b.x + r);
        let dy = y - (b.y + r);
        dx * dx + dy * dy <= r * r
    }
}

pub fn point_for(value: u8, level: u32, point_rate: f64) -> f64 {
    value as f64 * point_rate.powi(level.saturating_sub(1) as i32)
}

pub fn random_value<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(MIN_VALUE..=MAX_VALUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(level: u32, value: u8) -> Card {
        Card::new(CardId::new("c"), 0, (10.0, 20.0), (60.0, 65.0), level, value, 2.25)
    }

    #[test]
    fn point_grows_with_level() {
        let mut c = card(1, 3);
        assert_eq!(c.point(), 3.0);
        c.level_up(2.25);
        assert_eq!(c.level(), 2);
        assert_eq!(c.point(), 6.75);
        assert_eq!(c.image_key(), "cards/2/3");
    }

    #[test]
    fn bounding_box_is_inclusive() {
        let c = card(1, 1);
        assert!(c.is_point_inside(10.0, 20.0));
        assert!(c.is_point_inside(70.0, 85.0));
        assert!(!c.is_point_inside(70.1, 50.0));
        assert!(!c.is_point_inside(9.9, 50.0));
    }

    #[test]
    fn construction_clamps_out_of_range_fields() {
        let c = card(0, 9);
        assert_eq!(c.level(), 1);
        assert_eq!(c.value(), 5);
    }

    #[test]
    fn merge_needs_value_and_level() {
        let a = card(1, 3);
        let mut b = card(1, 3);
        assert!(a.can_merge_with(&b));
        b.level_up(2.25);
        assert!(!a.can_merge_with(&b));
        assert!(!a.can_merge_with(&card(1, 4)));
    }

    #[test]
    fn info_button_only_when_selected() {
        let mut c = card(1, 1);
        // button centre: x = 10 + 60 - 16 - 4 + 8 = 58, y = 20 + 4 + 8 = 32
        assert!(!c.is_info_button_hit(58.0, 32.0));
        c.is_selected = true;
        assert!(c.is_info_button_hit(58.0, 32.0));
        assert!(!c.is_info_button_hit(20.0, 70.0));
    }
}
