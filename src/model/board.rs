use std::collections::HashSet;

use tracing::warn;

use crate::model::card::{Card, CardId};
use crate::model::grid::GridLayout;

/// Ordered set of active cards. Iteration order is the hit-test order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn new(cards: Vec<Card>) -> Self {
        let mut board = Self { cards };
        board.sweep_matched();
        board
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn get_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.cards.iter_mut()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// First active card under the point, skipping `exclude`.
    pub fn card_at(&self, x: f64, y: f64, exclude: Option<&CardId>) -> Option<&Card> {
        self.cards
            .iter()
            .filter(|c| !c.is_matched && Some(&c.id) != exclude)
            .find(|c| c.is_point_inside(x, y))
    }

    pub fn occupant(&self, slot: usize, exclude: Option<&CardId>) -> Option<&Card> {
        self.cards
            .iter()
            .find(|c| !c.is_matched && c.place_order == slot && Some(&c.id) != exclude)
    }

    /// Drops every card flagged as matched.
    pub fn sweep_matched(&mut self) -> usize {
        let before = self.cards.len();
        self.cards.retain(|c| !c.is_matched);
        before - self.cards.len()
    }

    pub fn clear_selection(&mut self) {
        for c in &mut self.cards {
            c.is_selected = false;
            c.is_flipped = false;
        }
    }

    pub fn clear_hover(&mut self) {
        for c in &mut self.cards {
            c.is_flipped = false;
        }
    }

    pub fn score_per_second(&self) -> f64 {
        self.cards.iter().filter(|c| !c.is_matched).map(Card::point).sum()
    }

    pub fn has_unique_slots(&self) -> bool {
        let mut seen = HashSet::new();
        self.cards.iter().filter(|c| !c.is_matched).all(|c| seen.insert(c.place_order))
    }

    /// Re-derives every card's resting position from its slot, e.g. after a resize.
    /// Cards not mid-drag snap to the new position.
    pub fn relayout(&mut self, grid: &GridLayout, dragging: Option<&CardId>) {
        for c in &mut self.cards {
            let Some(pos) = grid.position_for(c.place_order) else { continue };
            let (dx, dy) = (c.x - c.original_x, c.y - c.original_y);
            c.place_at(c.place_order, pos);
            c.width = grid.card_width;
            c.height = grid.card_height;
            if Some(&c.id) == dragging {
                c.x += dx;
                c.y += dy;
            }
        }
    }

    /// Moves any card with a duplicate or out-of-range slot to the first free slot.
    /// Cards that cannot be placed are dropped. Returns how many cards were touched.
    pub fn repair_slots(&mut self, grid: &GridLayout) -> usize {
        let mut taken = vec![false; grid.capacity];
        let mut offenders = Vec::new();
        for (i, c) in self.cards.iter().enumerate() {
            match taken.get_mut(c.place_order) {
                Some(t) if !*t => *t = true,
                _ => offenders.push(i),
            }
        }
        if offenders.is_empty() {
            return 0;
        }
        let mut dropped = Vec::new();
        for &i in &offenders {
            let free = taken.iter().position(|t| !t);
            let card = &mut self.cards[i];
            match free.and_then(|slot| grid.position_for(slot).map(|pos| (slot, pos))) {
                Some((slot, pos)) => {
                    warn!(card = %card.id, from = card.place_order, to = slot, "slot_conflict_repaired");
                    taken[slot] = true;
                    card.place_at(slot, pos);
                }
                None => {
                    warn!(card = %card.id, slot = card.place_order, "slot_conflict_card_dropped");
                    dropped.push(card.id.clone());
                }
            }
        }
        self.cards.retain(|c| !dropped.contains(&c.id));
        offenders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(capacity: usize) -> GridLayout {
        GridLayout::new((400.0, 400.0), (60.0, 65.0), 4.0, capacity)
    }

    fn card(id: &str, slot: usize, g: &GridLayout) -> Card {
        let pos = g.position_for(slot).unwrap_or((0.0, 0.0));
        Card::new(CardId::new(id), slot, pos, g.card_size(), 1, 2, 2.25)
    }

    #[test]
    fn hit_test_prefers_board_order() {
        let g = grid(4);
        let a = card("a", 0, &g);
        let mut b = card("b", 1, &g);
        // overlap b onto a
        b.x = a.x;
        b.y = a.y;
        let board = Board::new(vec![a, b]);
        let hit = board.card_at(a_center(&board), a_center_y(&board), None).unwrap();
        assert_eq!(hit.id.as_str(), "a");
        let hit = board
            .card_at(a_center(&board), a_center_y(&board), Some(&CardId::new("a")))
            .unwrap();
        assert_eq!(hit.id.as_str(), "b");
    }

    fn a_center(b: &Board) -> f64 {
        b.cards()[0].x + 10.0
    }

    fn a_center_y(b: &Board) -> f64 {
        b.cards()[0].y + 10.0
    }

    #[test]
    fn repair_moves_duplicates_to_free_slots() {
        let g = grid(4);
        let mut board = Board::new(vec![card("a", 0, &g), card("b", 0, &g), card("c", 9, &g)]);
        assert!(!board.has_unique_slots());
        assert_eq!(board.repair_slots(&g), 2);
        assert!(board.has_unique_slots());
        let slots: Vec<usize> = board.cards().iter().map(|c| c.place_order).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!((board.cards()[1].x, board.cards()[1].y), g.position_for(1).unwrap());
    }

    #[test]
    fn repair_drops_cards_that_do_not_fit() {
        let g = grid(2);
        let mut board = Board::new(vec![card("a", 0, &g), card("b", 1, &g), card("c", 1, &g)]);
        board.repair_slots(&g);
        assert_eq!(board.len(), 2);
        assert!(board.has_unique_slots());
    }

    #[test]
    fn relayout_keeps_drag_offset() {
        let small = grid(4);
        let mut board = Board::new(vec![card("a", 3, &small), card("b", 0, &small)]);
        board.get_mut(&CardId::new("b")).unwrap().x += 15.0;
        let big = GridLayout::new((800.0, 600.0), (60.0, 65.0), 4.0, 10);
        board.relayout(&big, Some(&CardId::new("b")));
        let a = board.get(&CardId::new("a")).unwrap();
        assert_eq!((a.x, a.y), big.position_for(3).unwrap());
        let b = board.get(&CardId::new("b")).unwrap();
        assert_eq!(b.original_x, big.position_for(0).unwrap().0);
        assert_eq!(b.x, b.original_x + 15.0);
    }

    #[test]
    fn rate_sums_points() {
        let g = grid(4);
        let mut board = Board::new(vec![card("a", 0, &g), card("b", 1, &g)]);
        assert_eq!(board.score_per_second(), 4.0);
        board.get_mut(&CardId::new("a")).unwrap().is_matched = true;
        assert_eq!(board.score_per_second(), 2.0);
        assert_eq!(board.sweep_matched(), 1);
        assert_eq!(board.len(), 1);
    }
}
