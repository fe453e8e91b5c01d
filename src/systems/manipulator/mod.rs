//! PhysicsManipulator - grab and move rigid bodies with PID-driven forces
//!
//! State flow: Idle → Touching (a candidate was reported) → Grabbing (grab
//! input pressed) → back to Touching/Idle on release.
//!
//! The manipulator is driven from two places:
//! - input callbacks: `set_candidate`, `handle_grab_input` / `on_grab_action`
//! - the fixed physics step: `fixed_update`
//!
//! Touch and grab transitions are reported to the body's optional
//! `InteractiveBody` hooks and to the component-level event sink.

mod manipulator;
mod state;

pub use manipulator::PhysicsManipulator;
pub use state::{GrabState, GrabTarget, ManipulatorState, TouchState};

#[cfg(test)]
mod tests;
