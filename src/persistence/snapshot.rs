//! Persisted save schema and the strict parse that guards it.

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, SAVE_VERSION};
use crate::error::SnapshotError;
use crate::model::card::{Card, CardId, MAX_VALUE, MIN_VALUE};
use crate::model::game::GameState;
use crate::model::player::{Player, NAME_MAX_CHARS, NAME_MIN_CHARS};
use crate::model::progression::Progression;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardRecord {
    pub id: CardId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub level: u32,
    pub value: u8,
    pub original_x: f64,
    pub original_y: f64,
    pub place_order: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GameSnapshot {
    pub version: String,
    /// Wall-clock milliseconds at capture.
    pub timestamp: u64,
    pub player: Player,
    pub high_score: f64,
    pub score: f64,
    pub cards: Vec<CardRecord>,
    pub additional_slot_rows: u32,
    /// Card purchases so far; the card price is derived from this.
    pub total_draw_cards: u32,
    #[serde(default)]
    pub pending_offline_earnings: f64,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: Option<String>,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, timestamp: u64) -> Self {
        let progression = state.progression();
        Self {
            version: SAVE_VERSION.to_string(),
            timestamp,
            player: state.player().clone(),
            high_score: progression.high_score(),
            score: progression.score(),
            cards: state
                .board()
                .cards()
                .iter()
                .filter(|c| !c.is_matched)
                .map(|c| CardRecord {
                    id: c.id.clone(),
                    x: c.original_x,
                    y: c.original_y,
                    width: c.width,
                    height: c.height,
                    level: c.level(),
                    value: c.value(),
                    original_x: c.original_x,
                    original_y: c.original_y,
                    place_order: c.place_order,
                })
                .collect(),
            additional_slot_rows: progression.slot_rows_purchased,
            total_draw_cards: progression.cards_purchased,
            pending_offline_earnings: state.pending_offline_earnings(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and validates a snapshot. A foreign `version` fails before any other field is read.
    pub fn parse(json: &str) -> Result<Self, SnapshotError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        let found = probe.version.unwrap_or_default();
        if found != SAVE_VERSION {
            return Err(SnapshotError::VersionMismatch { found, expected: SAVE_VERSION });
        }
        let snap: GameSnapshot = serde_json::from_str(json)?;
        snap.validate()?;
        Ok(snap)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (field, v) in [
            ("score", self.score),
            ("highScore", self.high_score),
            ("pendingOfflineEarnings", self.pending_offline_earnings),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(field, format!("{v} is not a non-negative number")));
            }
        }
        if self.player.id.trim().is_empty() {
            return Err(invalid("player.id", "empty".into()));
        }
        let name_chars = self.player.name.trim().chars().count();
        if name_chars < NAME_MIN_CHARS {
            return Err(invalid("player.name", "too short".into()));
        }
        if name_chars > NAME_MAX_CHARS {
            return Err(invalid("player.name", "too long".into()));
        }
        let mut seen = HashSet::with_capacity(self.cards.len());
        for card in &self.cards {
            if !seen.insert(card.id.as_str()) {
                return Err(invalid("cards.id", format!("card {} appears twice", card.id)));
            }
            if card.level == 0 {
                return Err(invalid("cards.level", format!("card {} has level 0", card.id)));
            }
            if !(MIN_VALUE..=MAX_VALUE).contains(&card.value) {
                return Err(invalid("cards.value", format!("card {} has value {}", card.id, card.value)));
            }
            if card.id.as_str().is_empty() {
                return Err(invalid("cards.id", "empty".into()));
            }
        }
        Ok(())
    }

    /// Rebuilds live state. Prices come from the purchase counters, positions from slots.
    pub fn restore(self, config: Rc<GameConfig>, canvas: (f64, f64), seed: u64) -> GameState {
        let size = (config.card_width, config.card_height);
        let cards = self
            .cards
            .into_iter()
            .map(|r| Card::new(r.id, r.place_order, (r.original_x, r.original_y), size, r.level, r.value, config.point_rate))
            .collect();
        let progression = Progression::restore(self.score, self.high_score, self.total_draw_cards, self.additional_slot_rows);
        GameState::assemble(config, canvas, seed, self.player, cards, progression, self.pending_offline_earnings)
    }
}

fn invalid(field: &'static str, reason: String) -> SnapshotError {
    SnapshotError::Invalid { field, reason }
}
