// Display bridge library
// Native fullscreen display and input bootstrap for a host renderer

pub mod cli;
pub mod config;
pub mod display;
pub mod logging;

pub use cli::Cli;
pub use config::BridgeConfig;
pub use display::{DisplayPlatform, SessionController, SessionError};
pub use logging::LogLevel;
