//! Vox CLI entry point

use std::process::ExitCode;

use clap::Parser;

use vox::cli::{
    app::{load_merged_config, run_session, SessionOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    devices::handle_devices,
    logging::init_logging,
    presenter::Presenter,
};
use vox::domain::config::AppConfig;
use vox::domain::recording::Duration;
use vox::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Devices) => {
            if let Err(e) = handle_devices(&presenter) {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // A bad flag is a usage error; a bad file value falls back to the default
    if let Some(raw) = cli.max_duration.as_deref() {
        if let Err(e) = raw.parse::<Duration>() {
            presenter.error(&format!("Invalid max-duration: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    let cli_config = AppConfig {
        input_device: cli.device.clone(),
        max_duration: cli.max_duration.clone(),
        audio_cues: if cli.no_cues { Some(false) } else { None },
    };

    let config = load_merged_config(&XdgConfigStore::new(), cli_config).await;
    run_session(SessionOptions::from_config(&config)).await
}
