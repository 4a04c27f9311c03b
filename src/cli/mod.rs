//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the interactive command language, output
//! formatting and the session runner.

pub mod app;
pub mod args;
pub mod command;
pub mod config_cmd;
pub mod devices;
pub mod logging;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_session, SessionOptions, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use command::SessionCommand;
pub use presenter::Presenter;
