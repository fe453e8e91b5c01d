//! Domain types: body handles, host engine capabilities, events and settings.

pub mod body;
pub mod events;
pub mod settings;

pub use body::{
    BodyHandle, Constraints, ForceMode, InteractiveBody, ManipulatorId, PhysicsWorld,
};
pub use events::{EventQueue, EventSink, InteractionEvent};
pub use settings::{ManipulatorSettings, PidGains};
