//! AR Interaction Engine - physics manipulation and AR placement components
//!
//! Architecture:
//! - core/        - Transforms, logging, errors
//! - domain/      - Body handles, host engine capabilities, events, settings
//! - systems/     - Manipulator, PID, input, light estimation, planes, placement
//! - simulation/  - Reference physics world and the wasm facade

pub mod core;
pub mod domain;
pub mod simulation;
pub mod systems;

// Convenience re-exports
pub use crate::core::{ConfigError, Pose};
pub use domain::{
    BodyHandle, Constraints, EventQueue, EventSink, ForceMode, InteractionEvent, InteractiveBody,
    ManipulatorId, ManipulatorSettings, PhysicsWorld, PidGains,
};
pub use systems::manipulator::{ManipulatorState, PhysicsManipulator};
pub use systems::pid::PidController3D;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(feature = "parallel")]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::log::info("AR interaction engine initialized");
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use simulation::InteractionWorld;

// Constraint flags for JS
#[wasm_bindgen]
pub fn freeze_position() -> u8 { domain::body::FREEZE_POSITION }
#[wasm_bindgen]
pub fn freeze_rotation() -> u8 { domain::body::FREEZE_ROTATION }
#[wasm_bindgen]
pub fn freeze_position_y() -> u8 { domain::body::FREEZE_POSITION_Y }
