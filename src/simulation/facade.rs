use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;

use crate::domain::{BodyHandle, Constraints, ManipulatorSettings};
use crate::systems::manipulator::ManipulatorState;

use super::InteractionCore;

/// Body ids cross the JS boundary as u32; 0 means "no body"
fn handle_from_id(id: u32) -> Option<BodyHandle> {
    (id != 0).then_some(BodyHandle(id))
}

#[wasm_bindgen]
pub struct InteractionWorld {
    core: InteractionCore,
}

#[wasm_bindgen]
impl InteractionWorld {
    /// Create a world with default manipulator settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            core: InteractionCore::new(ManipulatorSettings::default()),
        }
    }

    #[wasm_bindgen(js_name = fromSettingsJson)]
    pub fn from_settings_json(json: &str) -> Result<InteractionWorld, String> {
        let settings = ManipulatorSettings::from_json(json).map_err(|e| e.to_string())?;
        Ok(Self {
            core: InteractionCore::new(settings),
        })
    }

    pub fn load_settings_json(&mut self, json: &str) -> Result<(), String> {
        self.core.load_settings_json(json).map_err(|e| e.to_string())
    }

    pub fn settings_json(&self) -> String {
        self.core.settings().to_json()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.core.body_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn last_step_ms(&self) -> f64 { self.core.last_step_ms() }

    /// Last step split into manipulator and integration phases, as JSON
    pub fn last_timing_json(&self) -> String {
        self.core.last_timing().to_json()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
        self.core.set_gravity(Vec3::new(x, y, z));
    }

    pub fn set_fixed_dt(&mut self, dt: f32) {
        self.core.set_fixed_dt(dt);
    }

    /// Spawn a sphere, returns its id
    pub fn spawn_sphere(&mut self, x: f32, y: f32, z: f32, radius: f32, mass: f32) -> u32 {
        self.core.spawn_sphere(Vec3::new(x, y, z), radius, mass).0
    }

    /// Spawn a box from half extents, returns its id
    pub fn spawn_box(&mut self, x: f32, y: f32, z: f32, hx: f32, hy: f32, hz: f32, mass: f32) -> u32 {
        self.core
            .spawn_box(Vec3::new(x, y, z), Vec3::new(hx, hy, hz), mass)
            .0
    }

    pub fn remove_body(&mut self, id: u32) -> bool {
        handle_from_id(id).map_or(false, |h| self.core.remove_body(h))
    }

    /// Constraint bit flags (see FREEZE_* constants)
    pub fn set_body_constraints(&mut self, id: u32, flags: u8) {
        if let Some(h) = handle_from_id(id) {
            self.core.set_body_constraints(h, Constraints(flags));
        }
    }

    /// [x, y, z, qx, qy, qz, qw] or empty for unknown ids
    pub fn body_pose(&self, id: u32) -> Vec<f32> {
        handle_from_id(id)
            .and_then(|h| self.core.body_pose(h))
            .map(|p| {
                let q = p.orientation;
                vec![p.position.x, p.position.y, p.position.z, q.x, q.y, q.z, q.w]
            })
            .unwrap_or_default()
    }

    pub fn set_manipulator_pose(&mut self, x: f32, y: f32, z: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
        self.core
            .set_manipulator_pose(Vec3::new(x, y, z), Quat::from_xyzw(qx, qy, qz, qw));
    }

    /// Candidate id (0 clears) and world touch point
    pub fn set_candidate(&mut self, id: u32, x: f32, y: f32, z: f32) {
        self.core.set_candidate(handle_from_id(id), Vec3::new(x, y, z));
    }

    pub fn set_default_body(&mut self, id: u32) {
        self.core.set_default_body(handle_from_id(id));
    }

    pub fn set_grab_pressed(&mut self, pressed: bool) {
        self.core.set_grab_pressed(pressed);
    }

    pub fn set_manipulator_enabled(&mut self, enabled: bool) {
        self.core.set_manipulator_enabled(enabled);
    }

    /// Id of the grabbed body, 0 when idle
    pub fn active_body(&self) -> u32 {
        self.core.manipulator().active_body().map_or(0, |h| h.0)
    }

    /// Id of the touched body, 0 when nothing is touched
    pub fn touched_body(&self) -> u32 {
        self.core.manipulator().touched_body().map_or(0, |h| h.0)
    }

    /// "idle" | "touching" | "grabbing"
    pub fn state(&self) -> String {
        match self.core.manipulator_state() {
            ManipulatorState::Idle => "idle",
            ManipulatorState::Touching(_) => "touching",
            ManipulatorState::Grabbing(_) => "grabbing",
        }
        .to_string()
    }

    /// Events since the last call as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        self.core.drain_events_json()
    }

    pub fn step(&mut self) {
        self.core.step();
    }
}

impl Default for InteractionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionWorld {
    pub fn core(&self) -> &InteractionCore {
        &self.core
    }
}
