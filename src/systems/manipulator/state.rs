use glam::{Quat, Vec3};

use crate::domain::BodyHandle;

/// What the external touch detector reported, and what we consider touched
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchState {
    pub candidate: Option<BodyHandle>,
    /// World-space touch point reported with the candidate
    pub candidate_touch: Vec3,
    pub touched: Option<BodyHandle>,
    /// World-space touch point of the touched body
    pub touch_point: Vec3,
}

/// Grab frame captured when a grab starts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrabState {
    pub body: BodyHandle,
    /// Point on the body (body-local) the force is applied at
    pub rel_body_point: Vec3,
    /// Where that point should be, in manipulator-local space
    pub rel_target_point: Vec3,
    /// Body orientation relative to the manipulator (recorded, not enforced)
    pub rel_target_orientation: Quat,
    /// Gravity flag to restore on release (None = gravity was not touched)
    pub previous_gravity: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GrabTarget {
    #[default]
    NoTarget,
    Target(GrabState),
}

impl GrabTarget {
    pub fn state(&self) -> Option<&GrabState> {
        match self {
            GrabTarget::Target(g) => Some(g),
            GrabTarget::NoTarget => None,
        }
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.state().map(|g| g.body)
    }
}

/// Coarse state of a manipulator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManipulatorState {
    Idle,
    Touching(BodyHandle),
    Grabbing(BodyHandle),
}
