//! Inspector-style settings for the components, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// PID gains and optional integral clamp
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Per-axis bound on the accumulated integral (None = unbounded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integral_limit: Option<f32>,
}

impl PidGains {
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd, integral_limit: None }
    }

    pub fn with_integral_limit(mut self, limit: f32) -> Self {
        self.integral_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gain("kp", self.kp)?;
        check_gain("ki", self.ki)?;
        check_gain("kd", self.kd)?;
        if let Some(limit) = self.integral_limit {
            check_gain("integralLimit", limit)?;
        }
        Ok(())
    }
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 20.0,
            ki: 0.5,
            kd: 2.0,
            integral_limit: None,
        }
    }
}

fn check_gain(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

/// Physics manipulator configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManipulatorSettings {
    /// Name of the grab input action (None = no action bound)
    pub grab_action: Option<String>,
    pub pid: PidGains,
    /// Turn off gravity for the manipulated body
    pub disable_gravity_on_grab: bool,
}

impl ManipulatorSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: ManipulatorSettings = serde_json::from_str(json)?;
        settings.pid.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for ManipulatorSettings {
    fn default() -> Self {
        Self {
            grab_action: Some("grab".to_string()),
            pid: PidGains::default(),
            disable_gravity_on_grab: true,
        }
    }
}
