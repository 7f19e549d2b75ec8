//! Lifecycle hooks and the event queue.
//!
//! Every phase boundary is reported twice: synchronously to the caller's
//! hooks and subscribers (with the element), and as a [`RecordedEvent`] in an
//! [`EventQueue`] that can be drained after each update.
//!
//! ```ignore
//! let mut zoom = Zoom::mount(element, props);
//! zoom.set_in(true);
//! for event in zoom.drain_events() {
//!     println!("{:?} at {}ms", event.event, event.at_ms);
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::LifecycleEvent;

/// Per-element lifecycle hook.
pub type Hook<E> = Box<dyn FnMut(&E)>;

/// Subscriber receiving every lifecycle event.
pub type Subscriber<E> = Box<dyn FnMut(LifecycleEvent, &E)>;

/// Optional handlers for each phase boundary plus any number of subscribers.
pub struct LifecycleHooks<E> {
    pub on_enter: Option<Hook<E>>,
    pub on_entering: Option<Hook<E>>,
    pub on_entered: Option<Hook<E>>,
    pub on_exit: Option<Hook<E>>,
    pub on_exiting: Option<Hook<E>>,
    pub on_exited: Option<Hook<E>>,
    subscribers: Vec<Subscriber<E>>,
}

impl<E> Default for LifecycleHooks<E> {
    fn default() -> Self {
        Self {
            on_enter: None,
            on_entering: None,
            on_entered: None,
            on_exit: None,
            on_exiting: None,
            on_exited: None,
            subscribers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for LifecycleHooks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_entering", &self.on_entering.is_some())
            .field("on_entered", &self.on_entered.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("on_exiting", &self.on_exiting.is_some())
            .field("on_exited", &self.on_exited.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<E> LifecycleHooks<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber that sees every event.
    pub fn subscribe(&mut self, subscriber: Subscriber<E>) {
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Call the hook for `event`, then every subscriber, in registration order.
    pub fn dispatch(&mut self, event: LifecycleEvent, element: &E) {
        let hook = match event {
            LifecycleEvent::Enter => self.on_enter.as_mut(),
            LifecycleEvent::Entering => self.on_entering.as_mut(),
            LifecycleEvent::Entered => self.on_entered.as_mut(),
            LifecycleEvent::Exit => self.on_exit.as_mut(),
            LifecycleEvent::Exiting => self.on_exiting.as_mut(),
            LifecycleEvent::Exited => self.on_exited.as_mut(),
        };
        if let Some(hook) = hook {
            hook(element);
        }
        for subscriber in &mut self.subscribers {
            subscriber(event, element);
        }
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A lifecycle event with the clock time it was emitted at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event: LifecycleEvent,
    pub at_ms: f64,
}

/// Queue for collecting lifecycle events between drains.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<RecordedEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: LifecycleEvent, at_ms: f64) {
        self.events.push_back(RecordedEvent { event, at_ms });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<RecordedEvent> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = RecordedEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_hook_then_subscribers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: LifecycleHooks<u32> = LifecycleHooks::new();

        let hook_log = log.clone();
        hooks.on_exit = Some(Box::new(move |el: &u32| {
            hook_log.borrow_mut().push(format!("exit:{el}"))
        }));
        let sub_log = log.clone();
        hooks.subscribe(Box::new(move |event: LifecycleEvent, el: &u32| {
            sub_log.borrow_mut().push(format!("{event:?}:{el}"))
        }));

        hooks.dispatch(LifecycleEvent::Exit, &7);
        hooks.dispatch(LifecycleEvent::Enter, &7);

        assert_eq!(*log.borrow(), vec!["exit:7", "Exit:7", "Enter:7"]);
        assert_eq!(hooks.subscriber_count(), 1);

        hooks.clear();
        hooks.dispatch(LifecycleEvent::Exit, &7);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_event_queue_operations() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());

        queue.push(LifecycleEvent::Enter, 0.0);
        queue.push(LifecycleEvent::Entering, 0.0);
        queue.push(LifecycleEvent::Entered, 225.0);
        assert_eq!(queue.len(), 3);

        let first = queue.pop().unwrap();
        assert_eq!(first.event, LifecycleEvent::Enter);

        let rest: Vec<_> = queue.drain().map(|e| e.event).collect();
        assert_eq!(rest, vec![LifecycleEvent::Entering, LifecycleEvent::Entered]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = RecordedEvent {
            event: LifecycleEvent::Exiting,
            at_ms: 12.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("exiting"));

        let parsed: RecordedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
