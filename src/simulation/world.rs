//! SimWorld - minimal 3D rigid body store for driving components without a
//! host engine
//!
//! No collision or constraint solving: bodies integrate accumulated forces and
//! gravity, honouring their per-axis freeze flags.

use std::collections::HashMap;

use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::Pose;
use crate::domain::{BodyHandle, Constraints, ForceMode, InteractiveBody, PhysicsWorld};

use super::body::SimBody;

/// Manages all bodies of the reference world
pub struct SimWorld {
    bodies: Vec<SimBody>,
    hooks: HashMap<BodyHandle, Box<dyn InteractiveBody>>,
    next_id: u32,
    pub gravity: Vec3,
}

impl SimWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            hooks: HashMap::new(),
            next_id: 1,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }

    /// Add a body and return its handle
    pub fn add_body(&mut self, mut body: SimBody) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        body.handle = handle;
        body.active = true;
        self.bodies.push(body);
        handle
    }

    /// Remove a body (and its hooks). Returns false for unknown handles.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.hooks.remove(&handle);
        if let Some(idx) = self.bodies.iter().position(|b| b.handle == handle) {
            self.bodies.swap_remove(idx);
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.hooks.clear();
        self.next_id = 1;
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&SimBody> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut SimBody> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    /// Attach touch/grab hooks to a body. Ignored for unknown handles.
    pub fn set_hooks(&mut self, handle: BodyHandle, hooks: Box<dyn InteractiveBody>) {
        if self.body(handle).is_some() {
            self.hooks.insert(handle, hooks);
        }
    }

    /// Integrate every active body by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let gravity = self.gravity;

        #[cfg(feature = "parallel")]
        {
            self.bodies.par_iter_mut().for_each(|b| b.integrate(gravity, dt));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for body in self.bodies.iter_mut() {
                body.integrate(gravity, dt);
            }
        }
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld for SimWorld {
    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.body(body).map(|b| b.pose)
    }

    fn use_gravity(&self, body: BodyHandle) -> Option<bool> {
        self.body(body).map(|b| b.use_gravity)
    }

    fn set_use_gravity(&mut self, body: BodyHandle, enabled: bool) {
        if let Some(b) = self.body_mut(body) {
            b.use_gravity = enabled;
        }
    }

    fn constraints(&self, body: BodyHandle) -> Option<Constraints> {
        self.body(body).map(|b| b.constraints)
    }

    fn add_force_at_position(&mut self, body: BodyHandle, force: Vec3, position: Vec3, mode: ForceMode) {
        let Some(b) = self.body_mut(body) else {
            return;
        };
        match mode {
            ForceMode::Force => b.apply_force_at_point(force, position),
            ForceMode::Impulse => b.apply_impulse_at_point(force, position),
        }
    }

    fn interactive(&mut self, body: BodyHandle) -> Option<&mut dyn InteractiveBody> {
        let hooks = self.hooks.get_mut(&body)?;
        let hooks: &mut dyn InteractiveBody = hooks.as_mut();
        Some(hooks)
    }
}
