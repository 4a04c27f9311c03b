//! Interactive session runner

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::application::ports::{AudioInput, ClipRegistry, ConfigStore, PlaybackService};
use crate::application::{Deck, PlaybackEnded, RecordingTransition};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::domain::slot::SlotIndex;
use crate::infrastructure::{create_audio_cue, CpalInput, InMemoryClipRegistry, RodioPlayback};

use super::command::SessionCommand;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How often running captures are checked against the max duration
const TICK: StdDuration = StdDuration::from_millis(100);

/// Resolved settings for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub input_device: Option<String>,
    pub max_duration: Duration,
    pub audio_cues: bool,
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        if let Some(raw) = config.max_duration.as_deref() {
            if let Err(e) = raw.parse::<Duration>() {
                tracing::warn!(error = %e, "ignoring configured max_duration");
            }
        }
        Self {
            input_device: config.input_device().map(str::to_string),
            max_duration: config.max_duration_or_default(),
            audio_cues: config.audio_cues_or_default(),
        }
    }
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = store.load().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = %store.path().display(), "config file ignored");
        AppConfig::empty()
    });

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Run the interactive session on the platform audio devices
pub async fn run_session(options: SessionOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let registry = Arc::new(InMemoryClipRegistry::new());
    let input = CpalInput::new(options.input_device.clone());
    let playback = RodioPlayback::new(Arc::clone(&registry));
    let cue = create_audio_cue(options.audio_cues);
    let (mut deck, mut ended) = Deck::new(input, registry, playback, cue);

    presenter.info(&format!(
        "Four slots ready. Captures stop after {}. Type 'h' for help.",
        options.max_duration
    ));

    let lines = BufReader::new(tokio::io::stdin()).lines();
    let result = session_loop(
        &mut deck,
        &mut ended,
        lines,
        &mut presenter,
        options.max_duration,
    )
    .await;
    deck.dispose();

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&format!("Failed to read input: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Drive a deck from line commands until `q`, end of input or Ctrl+C.
///
/// Playback end notices and the max-duration check are handled between
/// commands, so every deck mutation happens on this task.
pub async fn session_loop<I, R, P, L>(
    deck: &mut Deck<I, R, P>,
    ended: &mut mpsc::UnboundedReceiver<PlaybackEnded>,
    mut lines: Lines<L>,
    presenter: &mut Presenter,
    max_duration: Duration,
) -> std::io::Result<()>
where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
    L: AsyncBufRead + Unpin,
{
    let mut tick = tokio::time::interval(TICK);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed");
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(SessionCommand::Quit) => return Ok(()),
                    Ok(command) => run_command(deck, presenter, command, max_duration).await,
                    Err(e) => presenter.error(&e.to_string()),
                }
            }
            Some(notice) = ended.recv() => {
                if deck.handle_playback_ended(notice) {
                    presenter.info(&format!(
                        "Slot {} file {} finished",
                        notice.slot,
                        notice.clip + 1
                    ));
                }
            }
            _ = tick.tick() => {
                for slot in deck.overdue(max_duration) {
                    presenter.warn(&format!(
                        "Slot {} reached {}, stopping",
                        slot, max_duration
                    ));
                    finish_recording(deck, presenter, slot).await;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                presenter.warn("Interrupted");
                return Ok(());
            }
        }
    }
}

async fn run_command<I, R, P>(
    deck: &mut Deck<I, R, P>,
    presenter: &mut Presenter,
    command: SessionCommand,
    max_duration: Duration,
) where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
{
    match command {
        SessionCommand::Record(slot) => {
            let starting = !deck.slot(slot).is_recording;
            if starting {
                presenter.start_spinner("Waiting for microphone...");
            }
            let result = deck.toggle_recording(slot).await;
            presenter.stop_spinner();
            match result {
                Ok(RecordingTransition::Started) => {
                    presenter.success(&format!("Slot {} recording", slot))
                }
                Ok(RecordingTransition::Finished(_)) => report_recorded(deck, presenter, slot),
                Err(e) => presenter.error(&e.to_string()),
            }
        }
        SessionCommand::Play { slot, clip } => match deck.toggle_play_pause(slot, clip) {
            Ok(status) => presenter.info(&format!("Slot {} file {}: {}", slot, clip + 1, status)),
            Err(e) => presenter.error(&e.to_string()),
        },
        SessionCommand::Loop(slot) => match deck.toggle_loop(slot) {
            Ok(looping) => presenter.info(&format!(
                "Slot {} loop {}",
                slot,
                if looping { "on" } else { "off" }
            )),
            Err(e) => presenter.error(&e.to_string()),
        },
        SessionCommand::Clear => {
            let released = deck.clear_all_recordings().await;
            presenter.success(&format!("Cleared all slots ({} file(s) released)", released));
        }
        SessionCommand::Status => {}
        SessionCommand::Help => {
            presenter.help();
            return;
        }
        SessionCommand::Quit => return,
    }

    presenter.slots(deck.slots(), |slot| deck.elapsed(slot), max_duration.as_std());
}

async fn finish_recording<I, R, P>(deck: &mut Deck<I, R, P>, presenter: &Presenter, slot: SlotIndex)
where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
{
    match deck.stop_recording(slot).await {
        Ok(_) => report_recorded(deck, presenter, slot),
        Err(e) => presenter.error(&e.to_string()),
    }
}

fn report_recorded<I, R, P>(deck: &Deck<I, R, P>, presenter: &Presenter, slot: SlotIndex)
where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
{
    presenter.success(&format!(
        "Slot {}: recorded file {}",
        slot,
        deck.slot(slot).clip_count()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use crate::domain::error::ConfigError;

    struct FixedStore(Result<AppConfig, ConfigError>);

    #[async_trait]
    impl ConfigStore for FixedStore {
        async fn load(&self) -> Result<AppConfig, ConfigError> {
            self.0.clone()
        }

        async fn save(&self, _config: &AppConfig) -> Result<(), ConfigError> {
            Ok(())
        }

        fn path(&self) -> PathBuf {
            PathBuf::from("config.toml")
        }

        fn exists(&self) -> bool {
            self.0.is_ok()
        }

        async fn init(&self) -> Result<(), ConfigError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn cli_overrides_file_overrides_defaults() {
        let store = FixedStore(Ok(AppConfig {
            input_device: Some("File Mic".into()),
            max_duration: Some("2m".into()),
            audio_cues: None,
        }));
        let cli = AppConfig {
            max_duration: Some("30s".into()),
            ..AppConfig::empty()
        };

        let merged = load_merged_config(&store, cli).await;
        assert_eq!(merged.input_device.as_deref(), Some("File Mic"));
        assert_eq!(merged.max_duration.as_deref(), Some("30s"));
        assert_eq!(merged.audio_cues, Some(true));
    }

    #[tokio::test]
    async fn unreadable_file_falls_back_to_defaults() {
        let store = FixedStore(Err(ConfigError::ParseError("bad".into())));
        let merged = load_merged_config(&store, AppConfig::empty()).await;
        assert_eq!(merged, AppConfig::defaults());
    }

    #[test]
    fn options_resolve_defaults_and_blank_device() {
        let config = AppConfig {
            input_device: Some("  ".into()),
            max_duration: Some("never".into()),
            audio_cues: Some(false),
        };
        let options = SessionOptions::from_config(&config);
        assert_eq!(options.input_device, None);
        assert_eq!(options.max_duration, Duration::default_max_duration());
        assert!(!options.audio_cues);
    }
}
