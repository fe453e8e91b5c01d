//! Body handles and the physics capabilities the host engine provides.
//!
//! The components in this crate never own rigid bodies. They address them by
//! [`BodyHandle`] and go through [`PhysicsWorld`] for pose, gravity and force
//! application.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::Pose;

/// Opaque handle to a simulated rigid body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Identifies the manipulator that fires a per-body notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManipulatorId(pub u32);

// Constraint flags (one bit per frozen axis)
pub const FREEZE_NONE: u8 = 0;
pub const FREEZE_POSITION_X: u8 = 1 << 0;
pub const FREEZE_POSITION_Y: u8 = 1 << 1;
pub const FREEZE_POSITION_Z: u8 = 1 << 2;
pub const FREEZE_ROTATION_X: u8 = 1 << 3;
pub const FREEZE_ROTATION_Y: u8 = 1 << 4;
pub const FREEZE_ROTATION_Z: u8 = 1 << 5;
pub const FREEZE_POSITION: u8 = FREEZE_POSITION_X | FREEZE_POSITION_Y | FREEZE_POSITION_Z;
pub const FREEZE_ROTATION: u8 = FREEZE_ROTATION_X | FREEZE_ROTATION_Y | FREEZE_ROTATION_Z;

/// Movement constraints of a body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints(pub u8);

impl Constraints {
    pub const FREE: Constraints = Constraints(FREEZE_NONE);

    /// Body can move and rotate on every axis
    #[inline]
    pub fn is_free(self) -> bool {
        self.0 == FREEZE_NONE
    }

    #[inline]
    pub fn contains(self, flags: u8) -> bool {
        self.0 & flags == flags
    }
}

/// How a force is applied by [`PhysicsWorld::add_force_at_position`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceMode {
    /// Continuous force, scaled by the step duration and mass
    Force,
    /// Instant velocity change scaled by mass
    Impulse,
}

/// Optional touch/grab hooks a body may expose.
///
/// Every method defaults to a no-op so implementors only override what they
/// care about.
pub trait InteractiveBody {
    fn on_touch_start(&mut self, _manipulator: ManipulatorId) {}
    fn on_touch_end(&mut self, _manipulator: ManipulatorId) {}
    fn on_grab_start(&mut self, _manipulator: ManipulatorId) {}
    fn on_grab_end(&mut self, _manipulator: ManipulatorId) {}
}

/// Rigid body capabilities supplied by the host physics engine.
///
/// Queries return `None` for handles the engine no longer knows about;
/// mutators silently ignore them.
pub trait PhysicsWorld {
    fn pose(&self, body: BodyHandle) -> Option<Pose>;

    fn use_gravity(&self, body: BodyHandle) -> Option<bool>;

    fn set_use_gravity(&mut self, body: BodyHandle, enabled: bool);

    fn constraints(&self, body: BodyHandle) -> Option<Constraints>;

    fn add_force_at_position(&mut self, body: BodyHandle, force: Vec3, position: Vec3, mode: ForceMode);

    /// Touch/grab hooks attached to `body`, if it has any
    fn interactive(&mut self, _body: BodyHandle) -> Option<&mut dyn InteractiveBody> {
        None
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.pose(body).is_some()
    }
}
