//! Controller-owned state: the single-slot undo buffer and the in-flight set.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use crate::error::{ErrorKind, Result};
use crate::model::structs::{CartItemId, CourseId, RemovedItem};

/// Identifies the removal that filled the undo buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoTicket(u64);

/// Holds at most the most recently removed cart row.
#[derive(Debug, Default)]
pub struct UndoBuffer {
    slot: Option<RemovedItem>,
    generation: u64,
}

impl UndoBuffer {
    /// Overwrites whatever was held before.
    pub fn store(&mut self, item: RemovedItem) -> UndoTicket {
        self.generation += 1;
        self.slot = Some(item);
        UndoTicket(self.generation)
    }

    pub fn peek(&self) -> Option<&RemovedItem> {
        self.slot.as_ref()
    }

    /// The held row together with the ticket that owns it.
    pub fn current(&self) -> Option<(UndoTicket, &RemovedItem)> {
        self.slot.as_ref().map(|item| (UndoTicket(self.generation), item))
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Clears the slot only if `ticket` belongs to the removal still held.
    pub fn expire(&mut self, ticket: UndoTicket) -> bool {
        if self.slot.is_some() && ticket.0 == self.generation {
            self.slot = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    ToggleFavorite(CourseId),
    RemoveFavorite(CourseId),
    AddToCart(CourseId),
    RemoveFromCart(CartItemId),
    Undo,
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKey::ToggleFavorite(id) => write!(f, "toggle-favorite {id}"),
            ActionKey::RemoveFavorite(id) => write!(f, "remove-favorite {id}"),
            ActionKey::AddToCart(id) => write!(f, "add-to-cart {id}"),
            ActionKey::RemoveFromCart(id) => write!(f, "remove-from-cart {id}"),
            ActionKey::Undo => write!(f, "undo"),
        }
    }
}

/// Actions with a request outstanding.
#[derive(Debug, Default)]
pub struct InFlight {
    keys: RefCell<HashSet<ActionKey>>,
}

impl InFlight {
    /// Claims `key` until the returned guard drops.
    pub fn begin(&self, key: ActionKey) -> Result<InFlightGuard<'_>> {
        if !self.keys.borrow_mut().insert(key) {
            return Err(ErrorKind::InFlight(key.to_string()).into());
        }
        Ok(InFlightGuard { owner: self, key })
    }

    pub fn contains(&self, key: ActionKey) -> bool {
        self.keys.borrow().contains(&key)
    }
}

#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    key: ActionKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.keys.borrow_mut().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removed(id: u64) -> RemovedItem {
        RemovedItem {
            cart_id: CartItemId(id),
            course_id: CourseId(id * 10),
            markup: format!("<div data-id=\"{id}\"></div>"),
            name: format!("Course {id}"),
        }
    }

    #[test]
    fn second_removal_overwrites_first() {
        let mut buffer = UndoBuffer::default();
        buffer.store(removed(1));
        let second = buffer.store(removed(2));
        assert_eq!(buffer.peek().map(|r| r.cart_id), Some(CartItemId(2)));
        assert_eq!(
            buffer.current().map(|(t, r)| (t, r.cart_id)),
            Some((second, CartItemId(2)))
        );
    }

    #[test]
    fn stale_ticket_does_not_clear_newer_removal() {
        let mut buffer = UndoBuffer::default();
        let first = buffer.store(removed(1));
        let second = buffer.store(removed(2));

        assert!(!buffer.expire(first));
        assert!(!buffer.is_empty());
        assert!(buffer.expire(second));
        assert!(buffer.is_empty());
        assert!(!buffer.expire(second));
    }

    #[test]
    fn guard_releases_key_on_drop() {
        let in_flight = InFlight::default();
        let key = ActionKey::AddToCart(CourseId(3));
        {
            let _guard = in_flight.begin(key).unwrap();
            assert!(in_flight.contains(key));
            let err = in_flight.begin(key).unwrap_err();
            assert!(err.is_in_flight());
            // other keys are independent
            assert!(in_flight.begin(ActionKey::AddToCart(CourseId(4))).is_ok());
        }
        assert!(!in_flight.contains(key));
        assert!(in_flight.begin(key).is_ok());
    }
}
