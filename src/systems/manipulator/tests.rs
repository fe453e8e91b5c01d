use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};

use super::*;
use crate::core::Pose;
use crate::domain::body::FREEZE_ROTATION;
use crate::domain::{
    BodyHandle, Constraints, EventQueue, InteractionEvent, InteractiveBody, ManipulatorId,
    ManipulatorSettings, PhysicsWorld,
};
use crate::simulation::{SimBody, SimWorld};
use crate::systems::input::ActionPhase;

use InteractionEvent::{GrabEnd, GrabStart, TouchEnd, TouchStart};

/// Records hook calls as (hook name, body) pairs
struct RecordingHooks {
    body: BodyHandle,
    log: Rc<RefCell<Vec<(&'static str, BodyHandle)>>>,
}

impl InteractiveBody for RecordingHooks {
    fn on_touch_start(&mut self, _m: ManipulatorId) {
        self.log.borrow_mut().push(("touch_start", self.body));
    }
    fn on_touch_end(&mut self, _m: ManipulatorId) {
        self.log.borrow_mut().push(("touch_end", self.body));
    }
    fn on_grab_start(&mut self, _m: ManipulatorId) {
        self.log.borrow_mut().push(("grab_start", self.body));
    }
    fn on_grab_end(&mut self, _m: ManipulatorId) {
        self.log.borrow_mut().push(("grab_end", self.body));
    }
}

struct Fixture {
    world: SimWorld,
    manipulator: PhysicsManipulator,
    events: EventQueue<InteractionEvent>,
}

impl Fixture {
    fn new() -> Self {
        let events = EventQueue::new();
        let mut manipulator = PhysicsManipulator::new(ManipulatorId(1), &ManipulatorSettings::default());
        manipulator.set_event_sink(Some(events.sink()));
        manipulator.on_enable();
        manipulator.start();
        Self { world: SimWorld::new(), manipulator, events }
    }

    fn body_at(&mut self, position: Vec3) -> BodyHandle {
        self.world.add_body(SimBody::new_sphere(position, 0.1, 1.0))
    }

    fn candidate(&mut self, body: Option<BodyHandle>) {
        let point = body
            .and_then(|b| self.world.pose(b))
            .map_or(Vec3::ZERO, |p| p.position);
        self.manipulator.set_candidate(&mut self.world, body, point);
    }

    fn press(&mut self) {
        self.manipulator.handle_grab_input(&mut self.world, true);
    }

    fn release(&mut self) {
        self.manipulator.handle_grab_input(&mut self.world, false);
    }
}

#[test]
fn repeated_candidate_fires_touch_start_once() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);

    f.candidate(Some(a));
    f.candidate(Some(a));
    f.candidate(Some(a));

    assert_eq!(f.events.drain(), vec![TouchStart(a)]);
    assert_eq!(f.manipulator.touched_body(), Some(a));
    assert_eq!(f.manipulator.state(), ManipulatorState::Touching(a));
}

#[test]
fn touched_body_tracks_latest_candidate_while_idle() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    let b = f.body_at(Vec3::X);

    let sequence = [Some(a), Some(b), None, None, Some(b), Some(a)];
    for c in sequence {
        f.candidate(c);
        assert_eq!(f.manipulator.touched_body(), c);
    }

    assert_eq!(
        f.events.drain(),
        vec![
            TouchStart(a),
            TouchEnd(a),
            TouchStart(b),
            TouchEnd(b),
            TouchStart(b),
            TouchEnd(b),
            TouchStart(a),
        ]
    );
}

#[test]
fn start_grab_twice_keeps_first_grab() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    let b = f.body_at(Vec3::X);
    f.candidate(Some(a));

    assert!(f.manipulator.start_grab(&mut f.world));
    // touch state cannot change mid-grab, but even a direct second start is ignored
    f.manipulator.set_default_body(Some(b));
    assert!(!f.manipulator.start_grab(&mut f.world));

    assert_eq!(f.manipulator.active_body(), Some(a));
    let grabs = f.events.drain().into_iter().filter(|e| matches!(e, GrabStart(_))).count();
    assert_eq!(grabs, 1);
}

#[test]
fn end_grab_when_idle_is_silent() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    f.events.drain();

    assert!(!f.manipulator.end_grab(&mut f.world));
    f.release();
    assert!(f.events.is_empty());
    assert_eq!(f.manipulator.touched_body(), Some(a));
}

#[test]
fn nothing_to_grab_is_a_no_op() {
    let mut f = Fixture::new();
    f.press();
    assert!(!f.manipulator.is_manipulating());
    assert_eq!(f.manipulator.state(), ManipulatorState::Idle);
    assert!(f.events.is_empty());
}

#[test]
fn vanished_touched_body_cannot_be_grabbed() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    f.world.remove_body(a);

    assert!(!f.manipulator.start_grab(&mut f.world));
    assert_eq!(f.manipulator.state(), ManipulatorState::Touching(a));
}

#[test]
fn vanished_touched_body_falls_back_to_default() {
    let mut f = Fixture::new();
    let tool = f.body_at(Vec3::new(0.0, -0.2, 0.0));
    let a = f.body_at(Vec3::ZERO);
    f.manipulator.set_default_body(Some(tool));
    f.candidate(Some(a));
    f.events.drain();
    f.world.remove_body(a);

    assert!(f.manipulator.start_grab(&mut f.world));
    assert_eq!(f.manipulator.active_body(), Some(tool));
    assert_eq!(f.events.drain(), vec![GrabStart(tool)]);
}

#[test]
fn vanished_default_body_cannot_be_grabbed() {
    let mut f = Fixture::new();
    let tool = f.body_at(Vec3::ZERO);
    f.manipulator.set_default_body(Some(tool));
    f.world.remove_body(tool);

    assert!(!f.manipulator.start_grab(&mut f.world));
    assert_eq!(f.manipulator.state(), ManipulatorState::Idle);
    assert!(f.events.is_empty());
}

#[test]
fn free_body_is_pulled_at_its_centre() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::new(0.0, 0.0, 2.0));
    f.manipulator.set_pose(Pose::new(
        Vec3::new(0.0, 0.0, 1.0),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
    ));
    f.manipulator
        .set_candidate(&mut f.world, Some(a), Vec3::new(0.05, 0.0, 1.95));
    f.press();

    let grab = *f.manipulator.grab_state().unwrap();
    assert_eq!(grab.rel_body_point, Vec3::ZERO);
    // target point maps back onto the body centre
    let target = f.manipulator.target_point().unwrap();
    assert!((target - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    assert!((grab.rel_target_point - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn constrained_body_is_pulled_at_touch_point() {
    let mut f = Fixture::new();
    let body = SimBody::new_box(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5), 2.0)
        .with_constraints(Constraints(FREEZE_ROTATION));
    let a = f.world.add_body(body);
    let touch = Vec3::new(1.5, 0.25, 0.0);
    f.manipulator.set_candidate(&mut f.world, Some(a), touch);
    f.press();

    let grab = *f.manipulator.grab_state().unwrap();
    assert!((grab.rel_body_point - Vec3::new(0.5, 0.25, 0.0)).length() < 1e-5);
    assert!((grab.rel_target_point - touch).length() < 1e-5);
    assert!((f.manipulator.grab_point(&f.world).unwrap() - touch).length() < 1e-5);
}

#[test]
fn relative_orientation_is_recorded() {
    let mut f = Fixture::new();
    let rot = Quat::from_rotation_x(0.3);
    let a = f.world.add_body(SimBody::new_sphere(Vec3::ZERO, 0.1, 1.0).with_orientation(rot));
    f.manipulator.set_pose(Pose::new(Vec3::ONE, Quat::from_rotation_x(0.1)));
    f.candidate(Some(a));
    f.press();

    let rel = f.manipulator.grab_state().unwrap().rel_target_orientation;
    assert!(rel.angle_between(Quat::from_rotation_x(0.2)) < 1e-4);
}

#[test]
fn gravity_flag_restored_after_grab() {
    let mut f = Fixture::new();
    let on = f.body_at(Vec3::ZERO);
    let off = f.world.add_body(SimBody::new_sphere(Vec3::X, 0.1, 1.0).with_gravity(false));

    for body in [on, off] {
        let before = f.world.use_gravity(body);
        f.candidate(Some(body));
        f.press();
        assert_eq!(f.world.use_gravity(body), Some(false));
        f.release();
        assert_eq!(f.world.use_gravity(body), before);
    }
}

#[test]
fn gravity_untouched_when_disabled_in_settings() {
    let mut f = Fixture::new();
    f.manipulator.set_disable_gravity_on_grab(false);
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    f.press();
    assert_eq!(f.world.use_gravity(a), Some(true));
    assert_eq!(f.manipulator.grab_state().unwrap().previous_gravity, None);
}

#[test]
fn default_body_used_when_nothing_touched() {
    let mut f = Fixture::new();
    let tool = f.body_at(Vec3::new(0.0, -0.2, 0.0));
    let other = f.body_at(Vec3::X);
    f.manipulator.set_default_body(Some(tool));

    f.press();
    assert_eq!(f.manipulator.active_body(), Some(tool));
    f.release();

    // a touched body wins over the default
    f.candidate(Some(other));
    f.press();
    assert_eq!(f.manipulator.active_body(), Some(other));
}

#[test]
fn constrained_default_body_is_pulled_at_manipulator() {
    let mut f = Fixture::new();
    let door = SimBody::new_box(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5), 2.0)
        .with_constraints(Constraints(FREEZE_ROTATION));
    let door = f.world.add_body(door);
    let hand = Vec3::new(1.5, 0.5, 0.0);
    f.manipulator.set_pose(Pose::from_position(hand));
    f.manipulator.set_default_body(Some(door));

    assert!(f.manipulator.start_grab(&mut f.world));
    let grab = *f.manipulator.grab_state().unwrap();
    assert_eq!(grab.body, door);
    // default grab has no touch point: the manipulator itself is the contact
    assert!(grab.rel_target_point.length() < 1e-5);
    assert!((grab.rel_body_point - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-5);
    assert!((f.manipulator.grab_point(&f.world).unwrap() - hand).length() < 1e-5);
}

#[test]
fn disable_while_grabbing_fires_one_grab_end() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    f.press();
    f.events.drain();

    f.manipulator.on_disable(&mut f.world);

    let events = f.events.drain();
    assert_eq!(events.iter().filter(|e| matches!(e, GrabEnd(_))).count(), 1);
    assert_eq!(events, vec![GrabEnd(a), TouchEnd(a)]);
    assert_eq!(f.manipulator.active_body(), None);
    assert_eq!(f.manipulator.candidate_body(), None);
    assert!(!f.manipulator.is_enabled());
}

#[test]
fn disabled_manipulator_ignores_candidates_and_input() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.manipulator.on_disable(&mut f.world);

    f.candidate(Some(a));
    f.press();
    assert_eq!(f.manipulator.state(), ManipulatorState::Idle);
    assert!(f.events.is_empty());
    assert!(f.manipulator.fixed_update(&mut f.world, 0.02).is_none());
}

#[test]
fn action_edges_require_subscription() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));

    f.manipulator.on_grab_action(&mut f.world, ActionPhase::Performed);
    assert_eq!(f.manipulator.active_body(), Some(a));
    f.manipulator.on_grab_action(&mut f.world, ActionPhase::Canceled);
    assert_eq!(f.manipulator.active_body(), None);

    f.manipulator.on_disable(&mut f.world);
    assert_eq!(f.manipulator.grab_action().map(|a| a.subscriber_count()), Some(0));
    f.manipulator.on_grab_action(&mut f.world, ActionPhase::Performed);
    assert_eq!(f.manipulator.active_body(), None);
}

#[test]
fn missing_grab_action_disables_on_start() {
    let settings = ManipulatorSettings { grab_action: None, ..Default::default() };
    let mut manipulator = PhysicsManipulator::new(ManipulatorId(2), &settings);
    manipulator.on_enable();
    manipulator.start();
    assert!(!manipulator.is_enabled());
    assert!(manipulator.grab_action().is_none());
}

#[test]
fn hooks_and_sink_both_notified() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    let log = Rc::new(RefCell::new(Vec::new()));
    f.world.set_hooks(a, Box::new(RecordingHooks { body: a, log: Rc::clone(&log) }));

    f.candidate(Some(a));
    f.press();
    f.release();
    f.candidate(None);

    assert_eq!(
        *log.borrow(),
        vec![("touch_start", a), ("grab_start", a), ("grab_end", a), ("touch_end", a)]
    );
    assert_eq!(f.events.drain(), vec![TouchStart(a), GrabStart(a), GrabEnd(a), TouchEnd(a)]);
}

#[test]
fn missing_sink_is_not_an_error() {
    let mut f = Fixture::new();
    f.manipulator.set_event_sink(None);
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    f.press();
    f.release();
    assert_eq!(f.manipulator.state(), ManipulatorState::Touching(a));
}

#[test]
fn candidate_changes_deferred_until_release() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    let b = f.body_at(Vec3::X);
    let c = f.body_at(Vec3::Y);

    f.candidate(Some(a));
    f.candidate(Some(b));
    f.press();
    assert_eq!(f.events.drain(), vec![TouchStart(a), TouchEnd(a), TouchStart(b), GrabStart(b)]);

    f.candidate(Some(c));
    assert!(f.events.is_empty());
    assert_eq!(f.manipulator.touched_body(), Some(b));
    assert_eq!(f.manipulator.candidate_body(), Some(c));

    f.release();
    assert_eq!(f.events.drain(), vec![GrabEnd(b), TouchEnd(b), TouchStart(c)]);
    assert_eq!(f.manipulator.state(), ManipulatorState::Touching(c));
}

#[test]
fn fixed_update_pushes_body_towards_target() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    f.press();

    // no offset yet: nothing to correct
    let still = f.manipulator.fixed_update(&mut f.world, 0.02).unwrap();
    assert!(still.length() < 1e-5);

    f.manipulator.set_pose(Pose::from_position(Vec3::new(0.0, 0.0, 1.0)));
    let force = f.manipulator.fixed_update(&mut f.world, 0.02).unwrap();
    assert!(force.z > 0.0);
    assert!(force.x.abs() < 1e-5 && force.y.abs() < 1e-5);

    f.world.step(0.02);
    assert!(f.world.pose(a).unwrap().position.z > 0.0);
}

#[test]
fn fixed_update_idle_applies_nothing() {
    let mut f = Fixture::new();
    let a = f.body_at(Vec3::ZERO);
    f.candidate(Some(a));
    assert!(f.manipulator.fixed_update(&mut f.world, 0.02).is_none());
    assert!(f.manipulator.grab_point(&f.world).is_none());
    assert!(f.manipulator.target_point().is_none());
}
