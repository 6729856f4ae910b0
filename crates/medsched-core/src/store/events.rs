//! Change notifications emitted by the store.

use crate::models::{Schedule, User};

/// A change the store broadcasts after persisting it.
///
/// Each event carries the full affected record so subscribers can
/// re-render without querying back into the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    ScheduleCreated(Schedule),
    ScheduleUpdated(Schedule),
    SessionUserUpdated(User),
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&StoreEvent)>;

/// Callback registry for store events.
///
/// Dispatch is synchronous and in subscription order; there is no
/// delivery guarantee beyond "currently registered listeners see the
/// event in the same tick". Subscribers must unsubscribe on teardown.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all store events.
    pub fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        id
    }

    /// Remove a listener. Returns false if the id was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() < before
    }

    /// Dispatch an event to every registered listener.
    pub fn emit(&self, event: &StoreEvent) {
        for (_, callback) in &self.subscribers {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn user_event() -> StoreEvent {
        StoreEvent::SessionUserUpdated(User::new("Ana", "ana@example.com", "pw", Role::Patient))
    }

    #[test]
    fn test_subscribe_and_emit() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        bus.subscribe(Box::new(move |event| {
            sink.borrow_mut().push(event.clone());
        }));

        bus.emit(&user_event());
        assert_eq!(seen.borrow().len(), 1);
        assert!(matches!(seen.borrow()[0], StoreEvent::SessionUserUpdated(_)));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        let id = bus.subscribe(Box::new(move |_| {
            *sink.borrow_mut() += 1;
        }));

        bus.emit(&user_event());
        assert!(bus.unsubscribe(id));
        bus.emit(&user_event());

        assert_eq!(*count.borrow(), 1);
        // Second unsubscribe is a no-op
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_multiple_subscribers_all_notified() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        for _ in 0..3 {
            let sink = Rc::clone(&count);
            bus.subscribe(Box::new(move |_| {
                *sink.borrow_mut() += 1;
            }));
        }

        bus.emit(&user_event());
        assert_eq!(*count.borrow(), 3);
    }
}
