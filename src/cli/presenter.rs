//! CLI presenter for output formatting

use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::slot::{PlayingStatus, RecordingSlot, SlotIndex};

use super::command::SessionCommand;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(StdDuration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print every slot. `elapsed` gives the running capture time of a slot.
    pub fn slots(
        &self,
        slots: &[RecordingSlot],
        elapsed: impl Fn(SlotIndex) -> Option<StdDuration>,
        limit: StdDuration,
    ) {
        for (slot_index, slot) in SlotIndex::all().zip(slots) {
            let progress = elapsed(slot_index).map(|e| self.format_progress(e, limit));
            println!("{}", self.format_slot(slot_index, slot, progress.as_deref()));
        }
    }

    /// One slot block: header line, then one line per file
    pub fn format_slot(
        &self,
        index: SlotIndex,
        slot: &RecordingSlot,
        progress: Option<&str>,
    ) -> String {
        let mut header = format!("{}", format!("Slot {}", index).bold());
        if slot.is_recording {
            header.push_str(&format!(" {}", "● REC".red().bold()));
            if let Some(progress) = progress {
                header.push_str(&format!(" {}", progress));
            }
        }
        if slot.is_looping {
            header.push_str(&format!(" {}", "⟳ loop".cyan()));
        }

        let mut lines = vec![header];
        if slot.recording_complete {
            lines.push(format!("  Recorded {} file(s).", slot.clip_count()));
        }
        for (i, status) in slot.playing_status.iter().enumerate() {
            lines.push(format!("  File {}  {}", i + 1, Self::format_status(*status)));
        }
        if slot.audio_urls.is_empty() && !slot.is_recording {
            lines.push(format!("  {}", "empty".dimmed()));
        }
        lines.join("\n")
    }

    fn format_status(status: PlayingStatus) -> ColoredString {
        match status {
            PlayingStatus::Stopped => "■ Stopped".normal(),
            PlayingStatus::Playing => "▶ Playing".green(),
            PlayingStatus::Paused => "❚❚ Paused".yellow(),
        }
    }

    /// Format a capture progress bar against the max duration
    pub fn format_progress(&self, elapsed: StdDuration, limit: StdDuration) -> String {
        let elapsed_ms = elapsed.as_millis() as u64;
        let total_ms = limit.as_millis() as u64;
        let percent = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let bar_width = 20;
        let filled = ((percent / 100.0) * bar_width as f64) as usize;
        let empty = bar_width - filled;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(empty),
            elapsed_ms / 1000,
            total_ms / 1000
        )
    }

    /// Print the session command reference
    pub fn help(&self) {
        for (usage, description) in SessionCommand::HELP {
            println!("  {:<8} {}", usage.cyan(), description);
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
