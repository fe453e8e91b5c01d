//! InputAction - boolean edge source with explicit subscriber registration
//!
//! A button-style action reports `Performed` on the press edge and `Canceled`
//! on the release edge. Components register a subscriber id when they are
//! enabled and must remove it when they are disabled; edges are only routed
//! to registered subscribers.

use serde::Serialize;

/// Edge reported by an action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionPhase {
    Performed,
    Canceled,
}

/// Token returned by [`InputAction::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

pub struct InputAction {
    name: String,
    enabled: bool,
    pressed: bool,
    subscribers: Vec<SubscriptionId>,
    next_id: u32,
}

impl InputAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: false,
            pressed: false,
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disabling drops the held state so a stale press cannot leak into the
    /// next enable.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.pressed = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push(id);
        id
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscribers.iter().position(|s| *s == id) {
            Some(idx) => {
                self.subscribers.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.contains(&id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Feed the raw button state, get the edge it produced (if any).
    ///
    /// Disabled actions never produce edges.
    pub fn update(&mut self, pressed: bool) -> Option<ActionPhase> {
        if !self.enabled || pressed == self.pressed {
            return None;
        }
        self.pressed = pressed;
        Some(if pressed { ActionPhase::Performed } else { ActionPhase::Canceled })
    }
}
