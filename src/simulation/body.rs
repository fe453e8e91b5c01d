use glam::{Quat, Vec3};

use crate::core::Pose;
use crate::domain::body::{
    Constraints, FREEZE_POSITION_X, FREEZE_POSITION_Y, FREEZE_POSITION_Z, FREEZE_ROTATION_X,
    FREEZE_ROTATION_Y, FREEZE_ROTATION_Z,
};
use crate::domain::BodyHandle;

/// Rigid body in the reference world - integrates forces, nothing else
#[derive(Clone, Debug)]
pub struct SimBody {
    // === Physics State ===
    pub handle: BodyHandle,
    /// World pose (position = center of mass)
    pub pose: Pose,
    /// Linear velocity (m/s)
    pub velocity: Vec3,
    /// Angular velocity (rad/s, world axes)
    pub angular_velocity: Vec3,
    /// Mass in kg (0 = immovable)
    pub mass: f32,
    /// Scalar moment of inertia (isotropic approximation)
    pub moment_of_inertia: f32,
    /// Is body simulated?
    pub active: bool,

    // === Material / settings ===
    pub use_gravity: bool,
    pub constraints: Constraints,
    /// Fraction of velocity lost per second
    pub linear_damping: f32,
    pub angular_damping: f32,

    // === Accumulators (cleared every step) ===
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
}

impl SimBody {
    fn with_inertia(position: Vec3, mass: f32, moment_of_inertia: f32) -> Self {
        Self {
            handle: BodyHandle(0),
            pose: Pose::from_position(position),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: mass.max(0.0),
            // avoid division issues for tiny or massless bodies
            moment_of_inertia: moment_of_inertia.max(1e-4),
            active: true,
            use_gravity: true,
            constraints: Constraints::FREE,
            linear_damping: 0.05,
            angular_damping: 0.05,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    /// Solid sphere: I = 2/5 * m * r²
    pub fn new_sphere(position: Vec3, radius: f32, mass: f32) -> Self {
        Self::with_inertia(position, mass, 0.4 * mass * radius * radius)
    }

    /// Solid box given half extents; I is averaged over the three axes
    pub fn new_box(position: Vec3, half_extents: Vec3, mass: f32) -> Self {
        let s = half_extents * 2.0;
        let ixx = s.y * s.y + s.z * s.z;
        let iyy = s.x * s.x + s.z * s.z;
        let izz = s.x * s.x + s.y * s.y;
        let moment = mass / 12.0 * (ixx + iyy + izz) / 3.0;
        Self::with_inertia(position, mass, moment)
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.pose.orientation = orientation;
        self
    }

    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 }
    }

    /// Accumulate a force at the center of mass
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate a force at a world point (adds torque)
    pub fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.pose.position).cross(force);
    }

    /// Instant velocity change at the center of mass
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse * self.inv_mass();
        self.apply_linear_constraints();
    }

    pub fn apply_impulse_at_point(&mut self, impulse: Vec3, point: Vec3) {
        self.apply_impulse(impulse);
        if self.mass > 0.0 {
            let r = point - self.pose.position;
            self.angular_velocity += r.cross(impulse) / self.moment_of_inertia;
            self.apply_angular_constraints();
        }
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Semi-implicit Euler step
    pub(crate) fn integrate(&mut self, gravity: Vec3, dt: f32) {
        if !self.active || self.mass <= 0.0 || dt <= 0.0 {
            self.clear_forces();
            return;
        }

        let mut accel = self.force * self.inv_mass();
        if self.use_gravity {
            accel += gravity;
        }
        self.velocity += accel * dt;
        self.velocity *= (1.0 - self.linear_damping * dt).max(0.0);

        self.angular_velocity += self.torque / self.moment_of_inertia * dt;
        self.angular_velocity *= (1.0 - self.angular_damping * dt).max(0.0);

        self.apply_linear_constraints();
        self.apply_angular_constraints();

        self.pose.position += self.velocity * dt;

        let w = self.angular_velocity;
        let q = self.pose.orientation;
        let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q * 0.5 * dt;
        self.pose.orientation = (q + dq).normalize();

        self.clear_forces();
    }

    fn apply_linear_constraints(&mut self) {
        let c = self.constraints;
        if c.contains(FREEZE_POSITION_X) {
            self.velocity.x = 0.0;
        }
        if c.contains(FREEZE_POSITION_Y) {
            self.velocity.y = 0.0;
        }
        if c.contains(FREEZE_POSITION_Z) {
            self.velocity.z = 0.0;
        }
    }

    fn apply_angular_constraints(&mut self) {
        let c = self.constraints;
        if c.contains(FREEZE_ROTATION_X) {
            self.angular_velocity.x = 0.0;
        }
        if c.contains(FREEZE_ROTATION_Y) {
            self.angular_velocity.y = 0.0;
        }
        if c.contains(FREEZE_ROTATION_Z) {
            self.angular_velocity.z = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::body::FREEZE_POSITION;

    const G: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    #[test]
    fn gravity_accelerates_down() {
        let mut body = SimBody::new_sphere(Vec3::ZERO, 0.5, 1.0);
        body.linear_damping = 0.0;
        body.integrate(G, 0.1);
        assert!((body.velocity.y + 0.981).abs() < 1e-4);
        assert!(body.pose.position.y < 0.0);
    }

    #[test]
    fn gravity_off_keeps_body_still() {
        let mut body = SimBody::new_sphere(Vec3::ONE, 0.5, 1.0).with_gravity(false);
        body.integrate(G, 0.1);
        assert_eq!(body.pose.position, Vec3::ONE);
    }

    #[test]
    fn force_is_cleared_after_step() {
        let mut body = SimBody::new_box(Vec3::ZERO, Vec3::splat(0.5), 2.0).with_gravity(false);
        body.linear_damping = 0.0;
        body.apply_force(Vec3::X * 4.0);
        body.integrate(G, 0.5);
        assert!((body.velocity.x - 1.0).abs() < 1e-5);
        body.integrate(G, 0.5);
        assert!((body.velocity.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn off_center_force_spins_body() {
        let mut body = SimBody::new_sphere(Vec3::ZERO, 0.5, 1.0).with_gravity(false);
        body.apply_force_at_point(Vec3::Z, Vec3::X);
        body.integrate(G, 0.1);
        // X × Z = -Y
        assert!(body.angular_velocity.y < 0.0);
    }

    #[test]
    fn frozen_position_ignores_forces() {
        let mut body = SimBody::new_sphere(Vec3::ZERO, 0.5, 1.0).with_constraints(Constraints(FREEZE_POSITION));
        body.apply_force(Vec3::splat(100.0));
        body.integrate(G, 0.1);
        assert_eq!(body.pose.position, Vec3::ZERO);
    }

    #[test]
    fn massless_body_is_static() {
        let mut body = SimBody::new_sphere(Vec3::ZERO, 0.5, 0.0);
        body.apply_impulse(Vec3::X);
        body.integrate(G, 0.1);
        assert_eq!(body.pose.position, Vec3::ZERO);
    }
}
