//! Core functionality shared by every component: transforms, logging, errors.

pub mod error;
pub mod log;
pub mod math;

pub use error::ConfigError;
pub use math::{look_rotation, project_on_plane, Pose};
