//! Tunable constants for the board, progression curves and timers.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Schema tag written into every snapshot. Saves carrying any other tag are discarded.
pub const SAVE_VERSION: &str = "1.0";

/// localStorage key holding the sealed snapshot.
pub const SAVE_KEY: &str = "merge_idle_save";

/// Largest delay a browser timer accepts.
pub const MAX_TIMER_MS: u32 = i32::MAX as u32;

const FALLBACK_SAVE_SECRET: &str = "merge-idle/local-save/v1";

/// Secret used to seal saves at rest. Baked in at build time when available.
pub fn save_secret() -> &'static str {
    option_env!("MERGE_IDLE_SAVE_SECRET").unwrap_or(FALLBACK_SAVE_SECRET)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Multiplier applied per level: `point = value * point_rate^(level-1)`.
    pub point_rate: f64,
    pub initial_cards: usize,
    pub base_slots: usize,
    pub slots_per_row: usize,
    pub max_additional_slot_rows: u32,

    pub card_width: f64,
    pub card_height: f64,
    pub card_padding: f64,

    pub base_card_price: f64,
    pub card_price_growth: f64,
    pub base_slot_price: f64,
    pub slot_price_growth: f64,

    pub drag_threshold_px: f64,
    pub click_max_ms: u64,
    pub click_max_px: f64,
    pub reject_pulse_ms: u32,

    pub display_tick_ms: u32,
    pub score_tick_ms: u32,
    pub save_tick_ms: u32,
    /// Every Nth periodic save is also pushed to the remote store.
    pub cloud_sync_every_saves: u32,

    pub max_offline_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            point_rate: 2.25,
            initial_cards: 4,
            base_slots: 10,
            slots_per_row: 5,
            max_additional_slot_rows: 5,
            card_width: 60.0,
            card_height: 65.0,
            card_padding: 4.0,
            base_card_price: 100.0,
            card_price_growth: 1.4,
            base_slot_price: 100_000.0,
            slot_price_growth: 2.25,
            drag_threshold_px: 20.0,
            click_max_ms: 200,
            click_max_px: 5.0,
            reject_pulse_ms: 250,
            display_tick_ms: 10,
            score_tick_ms: 1000,
            save_tick_ms: 5000,
            cloud_sync_every_saves: 12,
            max_offline_ms: 2 * 60 * 60 * 1000,
        }
    }
}

impl GameConfig {
    /// Parses a partial JSON override on top of the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("pointRate", self.point_rate),
            ("cardWidth", self.card_width),
            ("cardHeight", self.card_height),
            ("baseCardPrice", self.base_card_price),
            ("baseSlotPrice", self.base_slot_price),
            ("dragThresholdPx", self.drag_threshold_px),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.card_price_growth < 1.0 || self.slot_price_growth < 1.0 {
            return Err(ConfigError::ShrinkingPrice);
        }
        if self.base_slots == 0 || self.slots_per_row == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.initial_cards > self.base_slots {
            return Err(ConfigError::TooManyInitialCards {
                initial: self.initial_cards,
                slots: self.base_slots,
            });
        }
        if self.click_max_px >= self.drag_threshold_px {
            return Err(ConfigError::ClickExceedsDrag);
        }
        if self.card_padding < 0.0 {
            return Err(ConfigError::NotPositive { field: "cardPadding", value: self.card_padding });
        }
        // Timers feed `setInterval`/`setTimeout`, which take an i32 delay
        let timers = [
            ("displayTickMs", self.display_tick_ms),
            ("scoreTickMs", self.score_tick_ms),
            ("saveTickMs", self.save_tick_ms),
            ("rejectPulseMs", self.reject_pulse_ms),
        ];
        for (field, value) in timers {
            if value == 0 || value > MAX_TIMER_MS {
                return Err(ConfigError::TimerOutOfRange { field, value, max: MAX_TIMER_MS });
            }
        }
        Ok(())
    }

    /// Slots available with `additional_rows` purchased rows.
    pub fn capacity(&self, additional_rows: u32) -> usize {
        let rows = additional_rows.min(self.max_additional_slot_rows) as usize;
        self.base_slots + rows * self.slots_per_row
    }

    pub fn max_capacity(&self) -> usize {
        self.capacity(self.max_additional_slot_rows)
    }

    pub fn card_price(&self, purchases: u32) -> f64 {
        (self.base_card_price * self.card_price_growth.powi(purchases as i32)).round()
    }

    pub fn slot_row_price(&self, purchased_rows: u32) -> f64 {
        (self.base_slot_price * self.slot_price_growth.powi(purchased_rows as i32)).round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"pointRate": 1.5, "maxAdditionalSlotRows": 2}"#).unwrap();
        assert_eq!(cfg.point_rate, 1.5);
        assert_eq!(cfg.max_additional_slot_rows, 2);
        assert_eq!(cfg.base_slots, 10);
        assert_eq!(cfg.max_capacity(), 20);
    }

    #[test]
    fn rejects_bad_override() {
        assert!(matches!(
            GameConfig::from_json(r#"{"cardWidth": 0}"#),
            Err(ConfigError::NotPositive { field: "cardWidth", .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"cardPriceGrowth": 0.5}"#),
            Err(ConfigError::ShrinkingPrice)
        ));
        assert!(matches!(GameConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn timers_must_fit_a_browser_delay() {
        assert!(matches!(
            GameConfig::from_json(r#"{"displayTickMs": 0}"#),
            Err(ConfigError::TimerOutOfRange { field: "displayTickMs", value: 0, .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"saveTickMs": 3000000000}"#),
            Err(ConfigError::TimerOutOfRange { field: "saveTickMs", .. })
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"rejectPulseMs": 0}"#),
            Err(ConfigError::TimerOutOfRange { field: "rejectPulseMs", .. })
        ));
        let edge = format!(r#"{{"scoreTickMs": {MAX_TIMER_MS}}}"#);
        assert_eq!(GameConfig::from_json(&edge).unwrap().score_tick_ms, MAX_TIMER_MS);
    }

    #[test]
    fn prices_follow_growth_curve() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.card_price(0), 100.0);
        assert_eq!(cfg.card_price(1), 140.0);
        assert_eq!(cfg.card_price(2), 196.0);
        assert_eq!(cfg.slot_row_price(1), 225_000.0);
    }

    #[test]
    fn capacity_is_bounded() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.capacity(0), 10);
        assert_eq!(cfg.capacity(2), 20);
        assert_eq!(cfg.capacity(99), cfg.max_capacity());
    }
}
