//! Pointer state machine: turns press/move/release into select, drag, merge or reject.
//!
//! Coordinates are canvas space; the shell converts client coordinates before calling in.
//! Merges resolve synchronously inside [`Interaction::pointer_up`]. The only delayed
//! effect is the reject pulse, which is keyed by a [`PulseToken`] so a stale timer can
//! never act on a board that has moved on.

use tracing::debug;

use crate::config::GameConfig;
use crate::model::board::Board;
use crate::model::card::{CardId, Point};
use crate::model::grid::GridLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PulseToken(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    PressStarted {
        card: CardId,
        start: Point,
        started_at: u64,
        /// Pointer minus card origin at press time.
        offset: Point,
    },
    Dragging {
        card: CardId,
        offset: Point,
    },
    RejectPulse {
        dragged: CardId,
        target: CardId,
        token: PulseToken,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    Deselected,
    Pressed(CardId),
    SelectionToggled { card: CardId, selected: bool },
    InfoRequested(CardId),
    DragStarted(CardId),
    Dragged,
    Relocated { card: CardId, slot: usize },
    Merged { survivor: CardId, removed: CardId, level: u32 },
    /// Caller must schedule [`Interaction::pulse_elapsed`] after `duration_ms`.
    Rejected { dragged: CardId, target: CardId, token: PulseToken, duration_ms: u32 },
    SnappedBack(CardId),
    PulseSettled,
}

impl PointerOutcome {
    /// True when the active card set or a card level changed.
    pub fn changes_card_set(&self) -> bool {
        matches!(self, PointerOutcome::Merged { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    state: InteractionState,
    next_token: u64,
}

impl Interaction {
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Card currently following the pointer, if any.
    pub fn dragged_card(&self) -> Option<&CardId> {
        match &self.state {
            InteractionState::Dragging { card, .. } => Some(card),
            InteractionState::RejectPulse { dragged, .. } => Some(dragged),
            _ => None,
        }
    }

    pub fn pending_pulse(&self) -> Option<PulseToken> {
        match self.state {
            InteractionState::RejectPulse { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, board: &mut Board, at: Point, now_ms: u64) -> PointerOutcome {
        // A fresh press ends whatever was still in flight.
        self.cancel(board);

        let Some(card) = board.card_at(at.x, at.y, None) else {
            board.clear_selection();
            return PointerOutcome::Deselected;
        };
        let id = card.id.clone();
        self.state = InteractionState::PressStarted {
            card: id.clone(),
            start: at,
            started_at: now_ms,
            offset: Point::new(at.x - card.x, at.y - card.y),
        };
        PointerOutcome::Pressed(id)
    }

    pub fn pointer_move(&mut self, board: &mut Board, cfg: &GameConfig, at: Point) -> PointerOutcome {
        let mut outcome = PointerOutcome::Dragged;
        if let InteractionState::PressStarted { card, start, offset, .. } = &self.state {
            if at.distance(*start) <= cfg.drag_threshold_px {
                return PointerOutcome::Ignored;
            }
            let (card, offset) = (card.clone(), *offset);
            match board.get_mut(&card) {
                Some(c) => {
                    c.is_flipped = true;
                    c.is_selected = false;
                }
                None => {
                    self.state = InteractionState::Idle;
                    return PointerOutcome::Ignored;
                }
            }
            debug!(card = %card, "drag_started");
            outcome = PointerOutcome::DragStarted(card.clone());
            self.state = InteractionState::Dragging { card, offset };
        }

        let InteractionState::Dragging { card, offset } = &self.state else {
            return PointerOutcome::Ignored;
        };
        for c in board.iter_mut() {
            if &c.id == card {
                c.x = at.x - offset.x;
                c.y = at.y - offset.y;
            } else if !c.is_matched {
                c.is_flipped = c.is_point_inside(at.x, at.y);
            }
        }
        outcome
    }

    pub fn pointer_up(
        &mut self,
        board: &mut Board,
        grid: &GridLayout,
        cfg: &GameConfig,
        at: Point,
        now_ms: u64,
    ) -> PointerOutcome {
        match std::mem::take(&mut self.state) {
            InteractionState::PressStarted { card, start, started_at, .. } => {
                let held = now_ms.saturating_sub(started_at);
                if held < cfg.click_max_ms && at.distance(start) < cfg.click_max_px {
                    click(board, &card, at)
                } else {
                    PointerOutcome::Ignored
                }
            }
            InteractionState::Dragging { card, .. } => self.drop_card(board, grid, cfg, card, at),
            other => {
                self.state = other;
                PointerOutcome::Ignored
            }
        }
    }

    /// Timer callback for a reject pulse. Stale tokens are ignored.
    pub fn pulse_elapsed(&mut self, board: &mut Board, token: PulseToken) -> PointerOutcome {
        match self.pending_pulse() {
            Some(live) if live == token => {
                self.settle_pulse(board);
                PointerOutcome::PulseSettled
            }
            _ => {
                debug!(?token, "stale_pulse_ignored");
                PointerOutcome::Ignored
            }
        }
    }

    /// Abandons any in-flight press, drag or pulse, returning cards to rest.
    pub fn cancel(&mut self, board: &mut Board) {
        match &self.state {
            InteractionState::Idle | InteractionState::PressStarted { .. } => {}
            InteractionState::Dragging { card, .. } => {
                if let Some(c) = board.get_mut(card) {
                    c.snap_back();
                    c.is_flipped = false;
                }
                board.clear_hover();
            }
            InteractionState::RejectPulse { .. } => self.settle_pulse(board),
        }
        self.state = InteractionState::Idle;
    }

    fn drop_card(
        &mut self,
        board: &mut Board,
        grid: &GridLayout,
        cfg: &GameConfig,
        dragged: CardId,
        at: Point,
    ) -> PointerOutcome {
        if let Some(slot) = grid.slot_at(at.x, at.y) {
            if board.occupant(slot, Some(&dragged)).is_none() {
                if let (Some(pos), Some(c)) = (grid.position_for(slot), board.get_mut(&dragged)) {
                    c.place_at(slot, pos);
                    c.is_flipped = false;
                }
                board.clear_hover();
                debug!(card = %dragged, slot, "card_relocated");
                return PointerOutcome::Relocated { card: dragged, slot };
            }
        }

        let target = board.card_at(at.x, at.y, Some(&dragged)).map(|c| c.id.clone());
        let mergeable = match (&target, board.get(&dragged)) {
            (Some(t), Some(d)) => board.get(t).is_some_and(|t| t.can_merge_with(d)),
            _ => false,
        };

        match target {
            Some(target) if mergeable => {
                let mut level = 0;
                if let Some(t) = board.get_mut(&target) {
                    t.level_up(cfg.point_rate);
                    level = t.level();
                }
                if let Some(d) = board.get_mut(&dragged) {
                    d.is_matched = true;
                    d.is_flipped = false;
                }
                board.sweep_matched();
                board.clear_hover();
                debug!(survivor = %target, removed = %dragged, level, "cards_merged");
                PointerOutcome::Merged { survivor: target, removed: dragged, level }
            }
            Some(target) => {
                for id in [&dragged, &target] {
                    if let Some(c) = board.get_mut(id) {
                        c.is_not_matched = true;
                    }
                }
                self.next_token += 1;
                let token = PulseToken(self.next_token);
                self.state = InteractionState::RejectPulse {
                    dragged: dragged.clone(),
                    target: target.clone(),
                    token,
                };
                debug!(dragged = %dragged, target = %target, "merge_rejected");
                PointerOutcome::Rejected { dragged, target, token, duration_ms: cfg.reject_pulse_ms }
            }
            None => {
                if let Some(c) = board.get_mut(&dragged) {
                    c.snap_back();
                    c.is_flipped = false;
                }
                board.clear_hover();
                PointerOutcome::SnappedBack(dragged)
            }
        }
    }

    fn settle_pulse(&mut self, board: &mut Board) {
        let InteractionState::RejectPulse { dragged, target, .. } = std::mem::take(&mut self.state)
        else {
            return;
        };
        // Only touch cards that are still the ones we flagged.
        if let Some(c) = board.get_mut(&target).filter(|c| c.is_not_matched) {
            c.is_not_matched = false;
            c.is_flipped = false;
        }
        if let Some(c) = board.get_mut(&dragged).filter(|c| c.is_not_matched) {
            c.is_not_matched = false;
            c.snap_back();
            c.is_flipped = false;
            c.is_selected = false;
        }
    }
}

fn click(board: &mut Board, pressed: &CardId, at: Point) -> PointerOutcome {
    let under = board.card_at(at.x, at.y, None).map(|c| c.id.clone());
    if under.as_ref() != Some(pressed) {
        board.clear_selection();
        return PointerOutcome::Deselected;
    }
    if board.get(pressed).is_some_and(|c| c.is_info_button_hit(at.x, at.y)) {
        return PointerOutcome::InfoRequested(pressed.clone());
    }
    let mut selected = false;
    for c in board.iter_mut() {
        if &c.id == pressed {
            c.is_selected = !c.is_selected;
            selected = c.is_selected;
        } else {
            c.is_selected = false;
        }
    }
    PointerOutcome::SelectionToggled { card: pressed.clone(), selected }
}
