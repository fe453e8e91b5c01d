//! Component-level event sinks.
//!
//! Every component takes an optional `Box<dyn EventSink<E>>`. A missing sink is
//! not an error, events are simply dropped.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use super::body::BodyHandle;

/// Notifications produced by a physics manipulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "camelCase")]
pub enum InteractionEvent {
    TouchStart(BodyHandle),
    TouchEnd(BodyHandle),
    GrabStart(BodyHandle),
    GrabEnd(BodyHandle),
}

impl InteractionEvent {
    pub fn body(&self) -> BodyHandle {
        match *self {
            InteractionEvent::TouchStart(b)
            | InteractionEvent::TouchEnd(b)
            | InteractionEvent::GrabStart(b)
            | InteractionEvent::GrabEnd(b) => b,
        }
    }
}

/// Receiver for component events
pub trait EventSink<E> {
    fn emit(&mut self, event: E);
}

impl<E, F: FnMut(E)> EventSink<E> for F {
    fn emit(&mut self, event: E) {
        self(event)
    }
}

/// Shared FIFO sink. Clones share the same buffer, so one clone can be handed
/// to a component while another is drained by the caller.
pub struct EventQueue<E> {
    events: Rc<RefCell<Vec<E>>>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self { events: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Take all queued events, oldest first
    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Boxed sink feeding this queue
    pub fn sink(&self) -> Box<dyn EventSink<E>>
    where
        E: 'static,
    {
        Box::new(self.clone())
    }
}

impl<E: Clone> EventQueue<E> {
    pub fn snapshot(&self) -> Vec<E> {
        self.events.borrow().clone()
    }
}

impl<E> Clone for EventQueue<E> {
    fn clone(&self) -> Self {
        Self { events: Rc::clone(&self.events) }
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventSink<E> for EventQueue<E> {
    fn emit(&mut self, event: E) {
        self.events.borrow_mut().push(event);
    }
}
