//! Systems - components driven by host callbacks
//!
//! - manipulator/ - PID grab controller and touch state machine
//! - pid          - 3-axis PID loop
//! - input        - edge-triggered input actions
//! - light        - AR light estimation mirroring
//! - planes       - plane detection events
//! - placement    - marker aiming and anchored object placement

pub mod input;
pub mod light;
pub mod manipulator;
pub mod pid;
pub mod placement;
pub mod planes;
