pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::{AppConfig, FileConfig};
pub use error::AbortReason;
pub use events::{EventAction, EventAttributes, EventChannel, EventResource, NotificationEvent};
pub use types::*;
