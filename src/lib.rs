//! Merge-card idle game core: board model, pointer interaction, progression and
//! save reconciliation. The yew shell in `main.rs` drives it through [`GameAction`].

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod util;

pub use config::GameConfig;
pub use model::game::{GameAction, GameState};
