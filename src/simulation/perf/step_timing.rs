//! Step timing - where the time of one fixed step goes

use serde::Serialize;

/// Breakdown of one `InteractionCore::step`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTiming {
    /// PID evaluation and force application
    pub manipulator_ms: f64,
    /// Gravity and force integration over all bodies
    pub integrate_ms: f64,
    pub bodies: usize,
    pub grabbing: bool,
}

impl StepTiming {
    pub fn total_ms(&self) -> f64 {
        self.manipulator_ms + self.integrate_ms
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Lap clock: each `lap_ms` returns the time since the previous lap.
///
/// Browser clocks only have millisecond resolution, so short phases read as 0.
pub(crate) struct PhaseClock {
    #[cfg(target_arch = "wasm32")]
    mark_ms: f64,
    #[cfg(not(target_arch = "wasm32"))]
    mark: std::time::Instant,
}

impl PhaseClock {
    pub(crate) fn start() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self { mark_ms: js_sys::Date::now() }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self { mark: std::time::Instant::now() }
        }
    }

    pub(crate) fn lap_ms(&mut self) -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            let now = js_sys::Date::now();
            let lap = (now - self.mark_ms).max(0.0);
            self.mark_ms = now;
            lap
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let now = std::time::Instant::now();
            let lap = now.duration_since(self.mark).as_secs_f64() * 1000.0;
            self.mark = now;
            lap
        }
    }
}
