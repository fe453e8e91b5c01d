//! Rigid transforms shared by the manipulator and placement code.
//!
//! Positions are world-space metres, orientations unit quaternions.
//! Scale is not modelled: hosts that scale manipulators should bake it
//! into the reported position.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position + orientation of a body, manipulator or marker
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self { position, orientation: Quat::IDENTITY }
    }

    /// Transform local coordinates to world coordinates
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Transform world coordinates into this pose's local space
    #[inline]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }

    /// Orientation of `other` expressed relative to this pose
    #[inline]
    pub fn relative_orientation(&self, other: Quat) -> Quat {
        self.orientation.inverse() * other
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation whose forward (+Z) axis points along `forward` and whose up axis
/// is as close to `up` as possible.
///
/// Degenerate inputs (zero forward, or forward parallel to up) fall back to a
/// rotation that only aligns forward, or identity.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let right = up.cross(f);
    if right.length_squared() < 1e-8 {
        return Quat::from_rotation_arc(Vec3::Z, f);
    }
    let right = right.normalize();
    let true_up = f.cross(right);

    Quat::from_mat3(&glam::Mat3::from_cols(right, true_up, f)).normalize()
}

/// Project `v` onto the plane with normal `normal`
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn inverse_transform_undoes_transform() {
        let pose = Pose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let local = Vec3::new(0.5, -1.0, 2.0);
        let world = pose.transform_point(local);
        assert!(approx(pose.inverse_transform_point(world), local));
    }

    #[test]
    fn transform_rotates_before_translating() {
        let pose = Pose::new(Vec3::X, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        // +X rotated 90 degrees about Z becomes +Y
        assert!(approx(pose.transform_point(Vec3::X), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn look_rotation_points_forward_axis() {
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let q = look_rotation(dir, Vec3::Y);
        assert!(approx(q * Vec3::Z, dir));
        assert!(approx(q * Vec3::Y, Vec3::Y));
    }

    #[test]
    fn look_rotation_handles_degenerate_input() {
        assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
        let q = look_rotation(Vec3::Y, Vec3::Y);
        assert!(approx(q * Vec3::Z, Vec3::Y));
    }

    #[test]
    fn project_on_plane_removes_normal_component() {
        let p = project_on_plane(Vec3::new(1.0, 5.0, 2.0), Vec3::Y * 3.0);
        assert!(approx(p, Vec3::new(1.0, 0.0, 2.0)));
    }
}
