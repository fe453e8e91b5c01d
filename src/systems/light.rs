//! LightEstimation - mirror per-frame AR light estimates onto a scene light
//!
//! Each camera frame may carry any subset of the estimate fields. Present
//! values are stored and pushed to the light / ambient settings; absent ones
//! clear the stored value but leave the light as it was. The main light
//! direction is the exception: it keeps its last known value.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{log, look_rotation};

/// Ambient probe coefficients: 3 colour channels × 9 L2 coefficients
pub type SphericalHarmonicsL2 = [[f32; 9]; 3];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Light estimate delivered with one camera frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightEstimate {
    pub average_brightness: Option<f32>,
    pub average_color_temperature: Option<f32>,
    pub color_correction: Option<Color>,
    pub main_light_direction: Option<Vec3>,
    pub main_light_color: Option<Color>,
    pub main_light_intensity_lumens: Option<f32>,
    pub average_main_light_brightness: Option<f32>,
    pub ambient_spherical_harmonics: Option<SphericalHarmonicsL2>,
}

impl LightEstimate {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Directional light the estimate is applied to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLight {
    pub intensity: f32,
    /// Kelvin
    pub color_temperature: f32,
    pub color: Color,
    pub rotation: Quat,
}

impl Default for SceneLight {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            color_temperature: 6570.0,
            color: Color::WHITE,
            rotation: Quat::IDENTITY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AmbientMode {
    #[default]
    Skybox,
    Trilight,
    Flat,
    Custom,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbientLighting {
    pub mode: AmbientMode,
    pub probe: Option<SphericalHarmonicsL2>,
}

pub struct LightEstimation {
    enabled: bool,
    has_camera: bool,
    subscribed: bool,

    brightness: Option<f32>,
    color_temperature: Option<f32>,
    color_correction: Option<Color>,
    main_light_direction: Option<Vec3>,
    main_light_color: Option<Color>,
    main_light_intensity_lumens: Option<f32>,
    spherical_harmonics: Option<SphericalHarmonicsL2>,
}

impl LightEstimation {
    pub fn new() -> Self {
        Self {
            enabled: true,
            has_camera: false,
            subscribed: false,
            brightness: None,
            color_temperature: None,
            color_correction: None,
            main_light_direction: None,
            main_light_color: None,
            main_light_intensity_lumens: None,
            spherical_harmonics: None,
        }
    }

    /// Disables the component when there is no camera feed to listen to
    pub fn start(&mut self, camera_available: bool) {
        self.has_camera = camera_available;
        if !camera_available {
            log::warn("No camera manager found for light estimation");
            self.enabled = false;
            self.subscribed = false;
            return;
        }
        self.subscribed = true;
    }

    pub fn on_enable(&mut self) {
        self.enabled = true;
        if self.has_camera {
            self.subscribed = true;
        }
    }

    pub fn on_disable(&mut self) {
        self.enabled = false;
        self.subscribed = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Apply one frame's estimate. Returns false when not subscribed.
    pub fn on_frame(
        &mut self,
        estimate: &LightEstimate,
        light: &mut SceneLight,
        ambient: &mut AmbientLighting,
    ) -> bool {
        if !self.subscribed {
            return false;
        }

        self.brightness = estimate.average_brightness;
        if let Some(brightness) = self.brightness {
            light.intensity = brightness;
        }

        self.color_temperature = estimate.average_color_temperature;
        if let Some(kelvin) = self.color_temperature {
            light.color_temperature = kelvin;
        }

        self.color_correction = estimate.color_correction;
        if let Some(color) = self.color_correction {
            light.color = color;
        }

        if let Some(direction) = estimate.main_light_direction {
            self.main_light_direction = Some(direction);
            light.rotation = look_rotation(direction, Vec3::Y);
        }

        self.main_light_color = estimate.main_light_color;
        if let Some(color) = self.main_light_color {
            light.color = color;
        }

        self.main_light_intensity_lumens = estimate.main_light_intensity_lumens;
        if self.main_light_intensity_lumens.is_some() {
            if let Some(brightness) = estimate.average_main_light_brightness {
                light.intensity = brightness;
            }
        }

        self.spherical_harmonics = estimate.ambient_spherical_harmonics;
        if let Some(sh) = self.spherical_harmonics {
            ambient.mode = AmbientMode::Skybox;
            ambient.probe = Some(sh);
        }

        true
    }

    pub fn brightness(&self) -> Option<f32> {
        self.brightness
    }

    pub fn color_temperature(&self) -> Option<f32> {
        self.color_temperature
    }

    pub fn color_correction(&self) -> Option<Color> {
        self.color_correction
    }

    pub fn main_light_direction(&self) -> Option<Vec3> {
        self.main_light_direction
    }

    pub fn main_light_color(&self) -> Option<Color> {
        self.main_light_color
    }

    pub fn main_light_intensity_lumens(&self) -> Option<f32> {
        self.main_light_intensity_lumens
    }

    pub fn spherical_harmonics(&self) -> Option<&SphericalHarmonicsL2> {
        self.spherical_harmonics.as_ref()
    }
}

impl Default for LightEstimation {
    fn default() -> Self {
        Self::new()
    }
}
