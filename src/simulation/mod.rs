//! Interaction sandbox - a physics manipulator driving bodies in the
//! reference world
//!
//! `InteractionCore` owns the world, one manipulator and the event queue the
//! manipulator reports into. The wasm facade (`InteractionWorld`) is a thin
//! wrapper so the same core can be driven from native tests.

use glam::{Quat, Vec3};

use crate::core::{log, ConfigError, Pose};
use crate::domain::{
    BodyHandle, Constraints, EventQueue, InteractionEvent, ManipulatorId, ManipulatorSettings,
    PhysicsWorld,
};
use crate::systems::manipulator::{ManipulatorState, PhysicsManipulator};

mod body;
mod world;
#[path = "perf/step_timing.rs"]
mod step_timing;
mod facade;

pub use body::SimBody;
pub use facade::InteractionWorld;
pub use world::SimWorld;

pub use step_timing::StepTiming;
use step_timing::PhaseClock;

/// Fixed physics step (50 Hz)
pub const DEFAULT_FIXED_DT: f32 = 0.02;

pub struct InteractionCore {
    world: SimWorld,
    manipulator: PhysicsManipulator,
    settings: ManipulatorSettings,
    events: EventQueue<InteractionEvent>,
    /// Last value passed to `set_manipulator_enabled`
    host_enabled: bool,

    fixed_dt: f32,
    frame: u64,
    last_timing: StepTiming,
    last_force: Vec3,
}

impl InteractionCore {
    pub fn new(settings: ManipulatorSettings) -> Self {
        let events = EventQueue::new();
        let manipulator = Self::build_manipulator(&settings, &events);
        Self {
            world: SimWorld::new(),
            manipulator,
            settings,
            events,
            host_enabled: true,
            fixed_dt: DEFAULT_FIXED_DT,
            frame: 0,
            last_timing: StepTiming::default(),
            last_force: Vec3::ZERO,
        }
    }

    fn build_manipulator(
        settings: &ManipulatorSettings,
        events: &EventQueue<InteractionEvent>,
    ) -> PhysicsManipulator {
        let mut manipulator = PhysicsManipulator::new(ManipulatorId(1), settings);
        manipulator.set_event_sink(Some(events.sink()));
        manipulator.on_enable();
        manipulator.start();
        manipulator
    }

    /// Replace the manipulator settings. Any grab or touch in progress is
    /// ended first.
    pub fn load_settings_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let settings = ManipulatorSettings::from_json(json)?;
        self.apply_settings(settings);
        Ok(())
    }

    pub fn apply_settings(&mut self, settings: ManipulatorSettings) {
        let pose = self.manipulator.pose();
        let default_body = self.manipulator.default_body();
        self.manipulator.on_disable(&mut self.world);

        self.manipulator = Self::build_manipulator(&settings, &self.events);
        self.manipulator.set_pose(pose);
        self.manipulator.set_default_body(default_body);
        if !self.host_enabled {
            // switched off by the host; new settings don't switch it back on
            self.manipulator.on_disable(&mut self.world);
        }
        self.settings = settings;
        log::debug("Manipulator settings applied");
    }

    pub fn settings(&self) -> &ManipulatorSettings {
        &self.settings
    }

    // === Bodies ===

    pub fn spawn_sphere(&mut self, position: Vec3, radius: f32, mass: f32) -> BodyHandle {
        self.world.add_body(SimBody::new_sphere(position, radius, mass))
    }

    pub fn spawn_box(&mut self, position: Vec3, half_extents: Vec3, mass: f32) -> BodyHandle {
        self.world.add_body(SimBody::new_box(position, half_extents, mass))
    }

    pub fn add_body(&mut self, body: SimBody) -> BodyHandle {
        self.world.add_body(body)
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.world.remove_body(handle)
    }

    pub fn set_body_constraints(&mut self, handle: BodyHandle, constraints: Constraints) {
        if let Some(body) = self.world.body_mut(handle) {
            body.constraints = constraints;
        }
    }

    pub fn body_pose(&self, handle: BodyHandle) -> Option<Pose> {
        self.world.pose(handle)
    }

    pub fn body_uses_gravity(&self, handle: BodyHandle) -> Option<bool> {
        self.world.use_gravity(handle)
    }

    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.world.gravity = gravity;
    }

    // === Manipulator ===

    /// Move the manipulator. Non-finite positions and degenerate orientations
    /// are rejected per component, keeping the previous value.
    pub fn set_manipulator_pose(&mut self, position: Vec3, orientation: Quat) {
        let current = self.manipulator.pose();
        let position = if position.is_finite() {
            position
        } else {
            log::warn("Ignoring non-finite manipulator position");
            current.position
        };
        let orientation = if orientation.is_finite() && orientation.length_squared() > 0.0 {
            orientation.normalize()
        } else {
            log::warn("Ignoring degenerate manipulator orientation");
            current.orientation
        };
        self.manipulator.set_pose(Pose::new(position, orientation));
    }

    pub fn set_candidate(&mut self, candidate: Option<BodyHandle>, touch_point: Vec3) {
        self.manipulator.set_candidate(&mut self.world, candidate, touch_point);
    }

    pub fn set_grab_pressed(&mut self, pressed: bool) {
        self.manipulator.handle_grab_input(&mut self.world, pressed);
    }

    pub fn set_default_body(&mut self, body: Option<BodyHandle>) {
        self.manipulator.set_default_body(body);
    }

    pub fn set_manipulator_enabled(&mut self, enabled: bool) {
        self.host_enabled = enabled;
        if enabled && !self.manipulator.is_enabled() {
            self.manipulator.on_enable();
        } else if !enabled && self.manipulator.is_enabled() {
            self.manipulator.on_disable(&mut self.world);
        }
    }

    pub fn manipulator(&self) -> &PhysicsManipulator {
        &self.manipulator
    }

    pub fn manipulator_state(&self) -> ManipulatorState {
        self.manipulator.state()
    }

    // === Events ===

    pub fn drain_events(&self) -> Vec<InteractionEvent> {
        self.events.drain()
    }

    pub fn drain_events_json(&self) -> String {
        serde_json::to_string(&self.events.drain()).unwrap_or_else(|_| "[]".to_string())
    }

    // === Stepping ===

    pub fn set_fixed_dt(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.fixed_dt = dt;
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// One fixed step: manipulator forces first, then integration
    pub fn step(&mut self) {
        let mut clock = PhaseClock::start();

        self.last_force = self
            .manipulator
            .fixed_update(&mut self.world, self.fixed_dt)
            .unwrap_or(Vec3::ZERO);
        let manipulator_ms = clock.lap_ms();

        self.world.step(self.fixed_dt);
        let integrate_ms = clock.lap_ms();

        self.frame += 1;
        self.last_timing = StepTiming {
            manipulator_ms,
            integrate_ms,
            bodies: self.world.body_count(),
            grabbing: self.manipulator.is_manipulating(),
        };
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_step_ms(&self) -> f64 {
        self.last_timing.total_ms()
    }

    /// Per-phase breakdown of the last step
    pub fn last_timing(&self) -> StepTiming {
        self.last_timing
    }

    /// Force applied by the manipulator during the last step
    pub fn last_force(&self) -> Vec3 {
        self.last_force
    }
}

impl Default for InteractionCore {
    fn default() -> Self {
        Self::new(ManipulatorSettings::default())
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
