//! PidController3D - per-axis PID loop producing a corrective force
//!
//! The controller assumes it is sampled once per fixed physics step. Each
//! axis is independent: `out = kp*e + ki*∫e dt + kd*de/dt` with
//! `e = setpoint - value`.

use glam::Vec3;

use crate::domain::PidGains;

#[derive(Clone, Debug)]
pub struct PidController3D {
    pub gains: PidGains,
    /// Target value in world coordinates
    pub setpoint: Vec3,
    integral: Vec3,
    previous_error: Option<Vec3>,
}

impl PidController3D {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            setpoint: Vec3::ZERO,
            integral: Vec3::ZERO,
            previous_error: None,
        }
    }

    /// Forget accumulated integral and derivative history
    pub fn reset(&mut self) {
        self.integral = Vec3::ZERO;
        self.previous_error = None;
    }

    pub fn integral(&self) -> Vec3 {
        self.integral
    }

    /// Feed the current value, get the controller output.
    ///
    /// `dt <= 0` contributes nothing to the integral or derivative terms.
    pub fn process(&mut self, value: Vec3, dt: f32) -> Vec3 {
        let error = self.setpoint - value;

        let mut derivative = Vec3::ZERO;
        if dt > 0.0 {
            self.integral += error * dt;
            if let Some(limit) = self.gains.integral_limit {
                self.integral = self.integral.clamp(Vec3::splat(-limit), Vec3::splat(limit));
            }
            if let Some(prev) = self.previous_error {
                derivative = (error - prev) / dt;
            }
        }
        self.previous_error = Some(error);

        error * self.gains.kp + self.integral * self.gains.ki + derivative * self.gains.kd
    }
}

impl Default for PidController3D {
    fn default() -> Self {
        Self::new(PidGains::default())
    }
}
