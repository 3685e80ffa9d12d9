//! Owned game state and the reducer the yew shell drives it through.

use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use yew::Reducible;

use crate::config::GameConfig;
use crate::error::NameError;
use crate::model::board::Board;
use crate::model::card::{random_value, Card, CardId, Point};
use crate::model::grid::GridLayout;
use crate::model::interaction::{Interaction, PointerOutcome, PulseToken};
use crate::model::player::Player;
use crate::model::progression::Progression;

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    config: Rc<GameConfig>,
    player: Player,
    board: Board,
    grid: GridLayout,
    interaction: Interaction,
    progression: Progression,
    pending_offline_earnings: f64,
    info_card: Option<CardId>,
    rng: ChaCha8Rng,
    /// Bumped on every mutation; the view keys redraw effects on it.
    pub revision: u64,
}

impl GameState {
    /// Fresh board with the initial deal.
    pub fn new_game(config: Rc<GameConfig>, canvas: (f64, f64), seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let player = Player::generate(&mut rng);
        Self::fresh_with_player(config, canvas, rng, player)
    }

    fn fresh_with_player(config: Rc<GameConfig>, canvas: (f64, f64), rng: ChaCha8Rng, player: Player) -> Self {
        let grid = GridLayout::from_config(&config, canvas, config.capacity(0));
        let mut state = Self {
            config,
            player,
            board: Board::default(),
            grid,
            interaction: Interaction::default(),
            progression: Progression::default(),
            pending_offline_earnings: 0.0,
            info_card: None,
            rng,
            revision: 0,
        };
        for slot in 0..state.config.initial_cards.min(state.grid.capacity) {
            if let Some(pos) = state.grid.position_for(slot) {
                let card = state.deal_card(slot, pos);
                state.board.push(card);
            }
        }
        state.progression.recompute_rate(&state.board);
        info!(player = %state.player.id, cards = state.board.len(), "new_game");
        state
    }

    /// Rebuilds a state from persisted parts. Positions are re-derived from slots and
    /// conflicting slots repaired.
    pub(crate) fn assemble(
        config: Rc<GameConfig>,
        canvas: (f64, f64),
        seed: u64,
        player: Player,
        cards: Vec<Card>,
        progression: Progression,
        pending_offline_earnings: f64,
    ) -> Self {
        let mut progression = progression;
        progression.slot_rows_purchased =
            progression.slot_rows_purchased.min(config.max_additional_slot_rows);
        let grid = GridLayout::from_config(&config, canvas, config.capacity(progression.slot_rows_purchased));
        let mut board = Board::new(cards);
        board.repair_slots(&grid);
        board.relayout(&grid, None);
        progression.recompute_rate(&board);
        Self {
            config,
            player,
            board,
            grid,
            interaction: Interaction::default(),
            progression,
            pending_offline_earnings,
            info_card: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            revision: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Rc<GameConfig> {
        self.config.clone()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn capacity(&self) -> usize {
        self.grid.capacity
    }

    pub fn add_card_price(&self) -> f64 {
        self.progression.card_price(&self.config)
    }

    pub fn add_slot_price(&self) -> f64 {
        self.progression.slot_row_price(&self.config)
    }

    pub fn can_add_slot_row(&self) -> bool {
        self.progression.slot_rows_purchased < self.config.max_additional_slot_rows
    }

    pub fn pending_offline_earnings(&self) -> f64 {
        self.pending_offline_earnings
    }

    /// Card whose detail view was requested through its info button.
    pub fn info_card(&self) -> Option<&Card> {
        self.info_card.as_ref().and_then(|id| self.board.get(id))
    }

    /// Draws fresh entropy from the game RNG, e.g. for sealing nonces.
    pub fn next_random(&mut self) -> u64 {
        use rand::RngCore;
        self.rng.next_u64()
    }

    pub fn pointer_down(&mut self, at: Point, now_ms: u64) -> PointerOutcome {
        let out = self.interaction.pointer_down(&mut self.board, at, now_ms);
        self.after_pointer(&out);
        out
    }

    pub fn pointer_move(&mut self, at: Point) -> PointerOutcome {
        let out = self.interaction.pointer_move(&mut self.board, &self.config, at);
        self.after_pointer(&out);
        out
    }

    pub fn pointer_up(&mut self, at: Point, now_ms: u64) -> PointerOutcome {
        let out = self.interaction.pointer_up(&mut self.board, &self.grid, &self.config, at, now_ms);
        self.after_pointer(&out);
        out
    }

    pub fn pulse_elapsed(&mut self, token: PulseToken) -> PointerOutcome {
        let out = self.interaction.pulse_elapsed(&mut self.board, token);
        self.after_pointer(&out);
        out
    }

    /// Pointer left the canvas or the view is going away.
    pub fn cancel_interaction(&mut self) {
        self.interaction.cancel(&mut self.board);
        self.touch();
    }

    fn after_pointer(&mut self, out: &PointerOutcome) {
        match out {
            PointerOutcome::Ignored => return,
            PointerOutcome::InfoRequested(id) => self.info_card = Some(id.clone()),
            PointerOutcome::Merged { removed, .. } => {
                if self.info_card.as_ref() == Some(removed) {
                    self.info_card = None;
                }
            }
            _ => {}
        }
        if out.changes_card_set() {
            self.progression.recompute_rate(&self.board);
        }
        self.touch();
    }

    pub fn close_card_info(&mut self) {
        self.info_card = None;
        self.touch();
    }

    /// Buys a level-1 card into the first free slot. No state changes on refusal.
    pub fn handle_add_card(&mut self, price: f64) -> bool {
        if self.progression.score() < price {
            debug!(price, score = self.progression.score(), "add_card_refused_funds");
            return false;
        }
        let Some((slot, pos)) = self
            .grid
            .find_free_slot(self.board.cards())
            .and_then(|slot| self.grid.position_for(slot).map(|pos| (slot, pos)))
        else {
            debug!(capacity = self.grid.capacity, "add_card_refused_full");
            return false;
        };
        if !self.progression.spend(price) {
            return false;
        }
        self.progression.cards_purchased += 1;
        let card = self.deal_card(slot, pos);
        info!(card = %card.id, slot, value = card.value(), price, "card_added");
        self.board.push(card);
        self.progression.recompute_rate(&self.board);
        self.touch();
        true
    }

    /// Buys one more row of slots, up to the configured maximum.
    pub fn handle_add_slot_row(&mut self, price: f64) -> bool {
        if !self.can_add_slot_row() {
            debug!(rows = self.progression.slot_rows_purchased, "add_slot_row_refused_max");
            return false;
        }
        if !self.progression.spend(price) {
            debug!(price, score = self.progression.score(), "add_slot_row_refused_funds");
            return false;
        }
        self.progression.slot_rows_purchased += 1;
        let capacity = self.config.capacity(self.progression.slot_rows_purchased);
        self.grid = GridLayout::from_config(&self.config, (self.grid.canvas_width, self.grid.canvas_height), capacity);
        self.board.relayout(&self.grid, self.interaction.dragged_card());
        info!(rows = self.progression.slot_rows_purchased, capacity, price, "slot_row_added");
        self.touch();
        true
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if (width, height) == (self.grid.canvas_width, self.grid.canvas_height) {
            return;
        }
        self.grid = GridLayout::from_config(&self.config, (width, height), self.grid.capacity);
        let dragged = self.interaction.dragged_card().cloned();
        self.board.relayout(&self.grid, dragged.as_ref());
        self.touch();
    }

    pub fn tick_second(&mut self) {
        self.progression.recompute_rate(&self.board);
        self.progression.tick_second();
        self.touch();
    }

    pub fn tick_display(&mut self) {
        self.progression.tick_display(self.config.display_tick_ms);
        self.touch();
    }

    pub fn rename_player(&mut self, name: &str) -> Result<(), NameError> {
        self.player.rename(name)?;
        info!(name = %self.player.name, "player_renamed");
        self.touch();
        Ok(())
    }

    pub fn unlock_player_name(&mut self) {
        self.player.unlock_name();
        self.touch();
    }

    pub(crate) fn set_pending_offline_earnings(&mut self, amount: f64) {
        self.pending_offline_earnings = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    }

    /// Applies the computed offline earnings to the score.
    pub fn collect_offline_earnings(&mut self) -> f64 {
        let amount = std::mem::take(&mut self.pending_offline_earnings);
        self.progression.credit(amount);
        if amount > 0.0 {
            info!(amount, "offline_earnings_collected");
        }
        self.touch();
        amount
    }

    /// Wipes progress but keeps the player identity.
    pub fn hard_reset(&mut self, seed: u64) {
        let mut player = self.player.clone();
        player.unlock_name();
        let canvas = (self.grid.canvas_width, self.grid.canvas_height);
        let revision = self.revision;
        *self = Self::fresh_with_player(self.config.clone(), canvas, ChaCha8Rng::seed_from_u64(seed), player);
        self.revision = revision;
        self.touch();
    }

    fn deal_card(&mut self, slot: usize, pos: (f64, f64)) -> Card {
        let id = CardId::random(&mut self.rng);
        let value = random_value(&mut self.rng);
        Card::new(id, slot, pos, self.grid.card_size(), 1, value, self.config.point_rate)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[derive(Clone, Debug)]
pub enum GameAction {
    /// Swap in a loaded or reconciled state.
    Replace(Box<GameState>),
    PointerDown { x: f64, y: f64, now_ms: u64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64, now_ms: u64 },
    PointerCancel,
    PulseElapsed(PulseToken),
    TickSecond,
    TickDisplay,
    Resize { width: f64, height: f64 },
    AddCard,
    AddSlotRow,
    Rename(String),
    UnlockName,
    CollectOfflineEarnings,
    CloseCardInfo,
    HardReset { seed: u64 },
}

impl Reducible for GameState {
    type Action = GameAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use GameAction::*;
        if let Replace(next) = action {
            let mut next = *next;
            next.revision = self.revision.wrapping_add(1);
            return Rc::new(next);
        }
        let mut new = (*self).clone();
        let before = new.revision;
        match action {
            Replace(_) => {}
            PointerDown { x, y, now_ms } => {
                new.pointer_down(Point::new(x, y), now_ms);
            }
            PointerMove { x, y } => {
                new.pointer_move(Point::new(x, y));
            }
            PointerUp { x, y, now_ms } => {
                new.pointer_up(Point::new(x, y), now_ms);
            }
            PointerCancel => new.cancel_interaction(),
            PulseElapsed(token) => {
                new.pulse_elapsed(token);
            }
            TickSecond => new.tick_second(),
            TickDisplay => new.tick_display(),
            Resize { width, height } => new.resize(width, height),
            AddCard => {
                let price = new.add_card_price();
                new.handle_add_card(price);
            }
            AddSlotRow => {
                let price = new.add_slot_price();
                new.handle_add_slot_row(price);
            }
            Rename(name) => {
                if let Err(e) = new.rename_player(&name) {
                    debug!(error = %e, "rename_rejected");
                }
            }
            UnlockName => new.unlock_player_name(),
            CollectOfflineEarnings => {
                new.collect_offline_earnings();
            }
            CloseCardInfo => new.close_card_info(),
            HardReset { seed } => new.hard_reset(seed),
        }
        if new.revision == before {
            return self;
        }
        Rc::new(new)
    }
}
