pub mod config;
pub mod constants;
pub mod physics;
pub mod players;
pub mod session;
pub mod sets;
pub mod water;

pub use config::{load_session_config, ConfigError, SessionConfig};
pub use constants::*;
pub use session::{CadenceConfig, FrameCadence, ReadyGate, Session, TickReport};
