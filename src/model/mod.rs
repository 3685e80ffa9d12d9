pub mod board;
pub mod card;
pub mod game;
pub mod grid;
pub mod interaction;
pub mod player;
pub mod progression;
pub mod render;

pub use board::Board;
pub use card::{Card, CardId, Point, Rect};
pub use game::{GameAction, GameState};
pub use grid::GridLayout;
pub use interaction::{InteractionState, PointerOutcome, PulseToken};
pub use player::Player;
pub use progression::Progression;
pub use render::{render_board, Renderer};
