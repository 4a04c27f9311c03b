//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Vox - four-slot audio recorder
#[derive(Parser, Debug)]
#[command(name = "vox")]
#[command(version)]
#[command(about = "Record up to four audio clips side by side and play them back")]
#[command(long_about = None)]
pub struct Cli {
    /// Input device name (see `vox devices`)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Stop a capture automatically after this long (e.g., 30s, 1m, 2m30s)
    #[arg(long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Disable the record start/stop chimes
    #[arg(long)]
    pub no_cues: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List audio input devices
    Devices,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["input_device", "max_duration", "audio_cues"];

pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
