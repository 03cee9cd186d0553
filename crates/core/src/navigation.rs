use crate::model::Item;

/// Proof that a dwell period was started for one activation.
///
/// Only the most recently issued ticket is honoured; navigating away makes every
/// earlier ticket stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DwellTicket {
    index: usize,
    generation: u64,
}

impl DwellTicket {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Outcome of a successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub index: usize,
    pub previous: Option<usize>,
    /// Present when the newly active item is a concept.
    pub dwell: Option<DwellTicket>,
}

/// Current-item state machine over a chapter's items.
///
/// Holds `current < len` whenever the sequence is non-empty. Moves past either
/// end are ignored.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    current: Option<usize>,
    generation: u64,
    pending: Option<DwellTicket>,
}

impl NavigationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn pending_dwell(&self) -> Option<DwellTicket> {
        self.pending
    }

    /// Makes `index` the current item.
    ///
    /// Out-of-range indices are ignored and return `None`. Any pending dwell is
    /// cancelled; a new one is issued if the item is a concept.
    pub fn activate(&mut self, index: usize, items: &[Item]) -> Option<Activation> {
        let item = items.get(index)?;

        let previous = self.current.replace(index);
        self.generation = self.generation.wrapping_add(1);
        self.pending = item.is_concept().then_some(DwellTicket {
            index,
            generation: self.generation,
        });

        Some(Activation {
            index,
            previous,
            dwell: self.pending,
        })
    }

    pub fn next(&mut self, items: &[Item]) -> Option<Activation> {
        let target = self.current.map_or(0, |i| i.saturating_add(1));
        if target >= items.len() {
            return None;
        }
        self.activate(target, items)
    }

    pub fn prev(&mut self, items: &[Item]) -> Option<Activation> {
        let target = self.current?.checked_sub(1)?;
        self.activate(target, items)
    }

    /// Drops the pending dwell without moving.
    pub fn cancel_dwell(&mut self) -> Option<DwellTicket> {
        self.pending.take()
    }

    /// Consumes a fired dwell ticket.
    ///
    /// Returns the index to credit if `ticket` is the pending one; stale tickets
    /// return `None`. A ticket can be accepted at most once.
    pub fn accept_dwell(&mut self, ticket: DwellTicket) -> Option<usize> {
        if self.pending == Some(ticket) && self.current == Some(ticket.index) {
            self.pending = None;
            Some(ticket.index)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Concept, ItemId};

    fn items() -> Vec<Item> {
        vec![
            Item::section("Intro"),
            Item::concept(ItemId::new("a"), "A", Concept::default()),
            Item::concept(ItemId::new("b"), "B", Concept::default()),
        ]
    }

    #[test]
    fn activate_rejects_out_of_range() {
        let items = items();
        let mut nav = NavigationController::new();
        assert!(nav.activate(3, &items).is_none());
        assert!(nav.current().is_none());
        assert!(nav.activate(0, &[]).is_none());
    }

    #[test]
    fn headers_get_no_dwell() {
        let items = items();
        let mut nav = NavigationController::new();
        let act = nav.activate(0, &items).unwrap();
        assert!(act.dwell.is_none());
        assert!(nav.pending_dwell().is_none());

        let act = nav.activate(1, &items).unwrap();
        assert_eq!(act.previous, Some(0));
        assert_eq!(act.dwell.map(|t| t.index()), Some(1));
    }

    #[test]
    fn next_and_prev_stop_at_boundaries() {
        let items = items();
        let mut nav = NavigationController::new();
        nav.activate(0, &items);
        assert!(nav.prev(&items).is_none());
        assert_eq!(nav.current(), Some(0));

        nav.next(&items);
        nav.next(&items);
        assert_eq!(nav.current(), Some(2));
        assert!(nav.next(&items).is_none());
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn navigating_away_makes_ticket_stale() {
        let items = items();
        let mut nav = NavigationController::new();
        let first = nav.activate(1, &items).unwrap().dwell.unwrap();
        nav.next(&items);
        assert!(nav.accept_dwell(first).is_none());
    }

    #[test]
    fn reactivating_same_item_issues_fresh_ticket() {
        let items = items();
        let mut nav = NavigationController::new();
        let first = nav.activate(1, &items).unwrap().dwell.unwrap();
        let second = nav.activate(1, &items).unwrap().dwell.unwrap();
        assert_ne!(first, second);
        assert!(nav.accept_dwell(first).is_none());
        assert_eq!(nav.accept_dwell(second), Some(1));
    }

    #[test]
    fn ticket_is_accepted_once() {
        let items = items();
        let mut nav = NavigationController::new();
        let ticket = nav.activate(2, &items).unwrap().dwell.unwrap();
        assert_eq!(nav.accept_dwell(ticket), Some(2));
        assert!(nav.accept_dwell(ticket).is_none());
    }

    #[test]
    fn cancel_dwell_drops_pending() {
        let items = items();
        let mut nav = NavigationController::new();
        let ticket = nav.activate(1, &items).unwrap().dwell.unwrap();
        assert_eq!(nav.cancel_dwell(), Some(ticket));
        assert!(nav.accept_dwell(ticket).is_none());
    }
}
