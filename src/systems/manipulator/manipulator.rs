use glam::Vec3;

use crate::core::{log, Pose};
use crate::domain::{
    BodyHandle, EventSink, ForceMode, InteractionEvent, ManipulatorId, ManipulatorSettings,
    PhysicsWorld,
};
use crate::systems::input::{ActionPhase, InputAction, SubscriptionId};
use crate::systems::pid::PidController3D;

use super::state::{GrabState, GrabTarget, ManipulatorState, TouchState};

/// Moves a rigid body by keeping a grab point at a fixed offset from the
/// manipulator, using forces computed by a PID controller.
pub struct PhysicsManipulator {
    id: ManipulatorId,
    pose: Pose,
    enabled: bool,

    grab_action: Option<InputAction>,
    subscription: Option<SubscriptionId>,
    pid: PidController3D,
    disable_gravity_on_grab: bool,

    touch: TouchState,
    grab: GrabTarget,
    default_body: Option<BodyHandle>,

    events: Option<Box<dyn EventSink<InteractionEvent>>>,
}

impl PhysicsManipulator {
    pub fn new(id: ManipulatorId, settings: &ManipulatorSettings) -> Self {
        Self {
            id,
            pose: Pose::IDENTITY,
            enabled: true,
            grab_action: settings.grab_action.as_deref().map(InputAction::new),
            subscription: None,
            pid: PidController3D::new(settings.pid),
            disable_gravity_on_grab: settings.disable_gravity_on_grab,
            touch: TouchState::default(),
            grab: GrabTarget::NoTarget,
            default_body: None,
            events: None,
        }
    }

    // === Lifecycle ===

    /// Validate the configuration and reset interaction state.
    ///
    /// Without a grab action the manipulator cannot do anything useful, so it
    /// logs a warning and disables itself.
    pub fn start(&mut self) {
        if self.grab_action.is_none() {
            log::warn("No action defined for grab");
            self.enabled = false;
            self.subscription = None;
        }

        self.touch = TouchState::default();
        self.grab = GrabTarget::NoTarget;
    }

    /// Subscribe to the grab action and enable it
    pub fn on_enable(&mut self) {
        self.enabled = true;
        if let Some(action) = self.grab_action.as_mut() {
            if self.subscription.is_none() {
                self.subscription = Some(action.subscribe());
            }
            action.enable();
        }
    }

    /// Unsubscribe from the grab action, end any grab and drop the candidate
    pub fn on_disable<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) {
        if let (Some(action), Some(sub)) = (self.grab_action.as_mut(), self.subscription.take()) {
            action.unsubscribe(sub);
        }

        self.end_grab(world);
        self.set_candidate(world, None, Vec3::ZERO);
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // === Input ===

    /// Feed the raw grab button state. Press starts a grab, release ends it.
    pub fn handle_grab_input<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, pressed: bool) {
        let Some(action) = self.grab_action.as_mut() else {
            return;
        };
        if let Some(phase) = action.update(pressed) {
            self.on_grab_action(world, phase);
        }
    }

    /// Route an action edge. Ignored unless subscribed to the grab action.
    pub fn on_grab_action<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, phase: ActionPhase) {
        let subscribed = match (self.grab_action.as_ref(), self.subscription) {
            (Some(action), Some(sub)) => action.is_subscribed(sub),
            _ => false,
        };
        if !subscribed {
            return;
        }

        match phase {
            ActionPhase::Performed => {
                self.start_grab(world);
            }
            ActionPhase::Canceled => {
                self.end_grab(world);
            }
        }
    }

    // === Touch / candidate ===

    /// Set or clear the candidate body and its world-space touch point.
    ///
    /// While a grab is active the candidate is only recorded; it is
    /// re-evaluated when the grab ends.
    pub fn set_candidate<W: PhysicsWorld + ?Sized>(
        &mut self,
        world: &mut W,
        candidate: Option<BodyHandle>,
        touch_point: Vec3,
    ) {
        if !self.enabled {
            return;
        }

        self.touch.candidate = candidate;
        self.touch.candidate_touch = touch_point;

        if !self.is_manipulating() {
            self.check_candidate(world);
        }
    }

    fn check_candidate<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) {
        if self.touch.touched == self.touch.candidate {
            return;
        }

        if let Some(previous) = self.touch.touched {
            self.notify(world, InteractionEvent::TouchEnd(previous));
        }

        self.touch.touched = self.touch.candidate;
        self.touch.touch_point = self.touch.candidate_touch;

        if let Some(current) = self.touch.touched {
            self.notify(world, InteractionEvent::TouchStart(current));
        }
    }

    // === Grab ===

    /// Grab the touched body, or the default body when nothing is touched.
    ///
    /// Returns true if a grab started. Already grabbing, nothing to grab, or a
    /// default body the world no longer knows are all no-ops.
    pub fn start_grab<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) -> bool {
        if self.is_manipulating() {
            return false;
        }

        // a touched body that left the world counts as nothing touched
        let touched = self.touch.touched.filter(|&body| world.contains(body));
        let (body, touch_point) = match (touched, self.default_body) {
            (Some(touched), _) => (touched, self.touch.touch_point),
            // default body has no touch point, grab at the manipulator itself
            (None, Some(default)) => (default, self.pose.position),
            (None, None) => return false,
        };

        let Some(body_pose) = world.pose(body) else {
            log::debug(&format!("Grab target {:?} no longer exists", body));
            return false;
        };

        let constraints = world.constraints(body).unwrap_or_default();
        let (rel_body_point, rel_target_point) = if constraints.is_free() {
            // free body: pull at its centre
            (Vec3::ZERO, self.pose.inverse_transform_point(body_pose.position))
        } else {
            // constrained body: pull at the contact point
            (
                body_pose.inverse_transform_point(touch_point),
                self.pose.inverse_transform_point(touch_point),
            )
        };

        let previous_gravity = if self.disable_gravity_on_grab {
            let previous = world.use_gravity(body).unwrap_or(false);
            world.set_use_gravity(body, false);
            Some(previous)
        } else {
            None
        };

        self.pid.reset();
        self.grab = GrabTarget::Target(GrabState {
            body,
            rel_body_point,
            rel_target_point,
            rel_target_orientation: self.pose.relative_orientation(body_pose.orientation),
            previous_gravity,
        });

        self.notify(world, InteractionEvent::GrabStart(body));
        true
    }

    /// Release the active body. Returns false when nothing was grabbed.
    pub fn end_grab<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W) -> bool {
        let GrabTarget::Target(grab) = self.grab else {
            return false;
        };

        if let Some(previous) = grab.previous_gravity {
            world.set_use_gravity(grab.body, previous);
        }

        self.notify(world, InteractionEvent::GrabEnd(grab.body));
        self.grab = GrabTarget::NoTarget;

        // another body may have become candidate during the grab
        self.check_candidate(world);
        true
    }

    /// Per physics step: push the active body towards its target point.
    ///
    /// Returns the applied force. If the body disappeared from the world the
    /// grab is ended instead.
    pub fn fixed_update<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, dt: f32) -> Option<Vec3> {
        if !self.enabled {
            return None;
        }
        let GrabTarget::Target(grab) = self.grab else {
            return None;
        };

        let Some(body_pose) = world.pose(grab.body) else {
            log::warn(&format!("Grabbed body {:?} vanished, releasing", grab.body));
            self.end_grab(world);
            return None;
        };

        self.pid.setpoint = self.pose.transform_point(grab.rel_target_point);
        let body_point = body_pose.transform_point(grab.rel_body_point);
        let force = self.pid.process(body_point, dt);
        world.add_force_at_position(grab.body, force, body_point, ForceMode::Force);
        Some(force)
    }

    fn notify<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, event: InteractionEvent) {
        let id = self.id;
        if let Some(hooks) = world.interactive(event.body()) {
            match event {
                InteractionEvent::TouchStart(_) => hooks.on_touch_start(id),
                InteractionEvent::TouchEnd(_) => hooks.on_touch_end(id),
                InteractionEvent::GrabStart(_) => hooks.on_grab_start(id),
                InteractionEvent::GrabEnd(_) => hooks.on_grab_end(id),
            }
        }
        if let Some(sink) = self.events.as_mut() {
            sink.emit(event);
        }
    }

    // === Queries / setters ===

    pub fn id(&self) -> ManipulatorId {
        self.id
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Update the manipulator transform (controller / camera pose)
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn state(&self) -> ManipulatorState {
        match (self.grab.body(), self.touch.touched) {
            (Some(active), _) => ManipulatorState::Grabbing(active),
            (None, Some(touched)) => ManipulatorState::Touching(touched),
            (None, None) => ManipulatorState::Idle,
        }
    }

    pub fn is_manipulating(&self) -> bool {
        matches!(self.grab, GrabTarget::Target(_))
    }

    pub fn active_body(&self) -> Option<BodyHandle> {
        self.grab.body()
    }

    pub fn grab_state(&self) -> Option<&GrabState> {
        self.grab.state()
    }

    pub fn touched_body(&self) -> Option<BodyHandle> {
        self.touch.touched
    }

    pub fn candidate_body(&self) -> Option<BodyHandle> {
        self.touch.candidate
    }

    pub fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    /// World-space point on the active body that is being pulled
    pub fn grab_point<W: PhysicsWorld + ?Sized>(&self, world: &W) -> Option<Vec3> {
        let grab = self.grab.state()?;
        let body_pose = world.pose(grab.body)?;
        Some(body_pose.transform_point(grab.rel_body_point))
    }

    /// World-space point the grab point is pulled towards
    pub fn target_point(&self) -> Option<Vec3> {
        let grab = self.grab.state()?;
        Some(self.pose.transform_point(grab.rel_target_point))
    }

    /// Fallback body grabbed when nothing is touched (e.g. a held tool)
    pub fn set_default_body(&mut self, body: Option<BodyHandle>) {
        self.default_body = body;
    }

    pub fn default_body(&self) -> Option<BodyHandle> {
        self.default_body
    }

    pub fn set_event_sink(&mut self, sink: Option<Box<dyn EventSink<InteractionEvent>>>) {
        self.events = sink;
    }

    pub fn set_disable_gravity_on_grab(&mut self, disable: bool) {
        self.disable_gravity_on_grab = disable;
    }

    pub fn pid(&self) -> &PidController3D {
        &self.pid
    }

    pub fn pid_mut(&mut self) -> &mut PidController3D {
        &mut self.pid
    }

    pub fn grab_action(&self) -> Option<&InputAction> {
        self.grab_action.as_ref()
    }
}
