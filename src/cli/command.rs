//! Line commands typed into the interactive session

use std::str::FromStr;

use thiserror::Error;

use crate::domain::error::InvalidSlotError;
use crate::domain::slot::SlotIndex;

/// Errors from parsing a session command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Unknown command: \"{0}\". Type 'h' for help")]
    Unknown(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unexpected argument: \"{0}\"")]
    UnexpectedArgument(String),

    #[error(transparent)]
    InvalidSlot(#[from] InvalidSlotError),

    #[error("Invalid file number: \"{0}\". Files are numbered from 1")]
    InvalidClip(String),
}

/// One parsed session command. Slot and clip numbers are typed 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Record(SlotIndex),
    /// `clip` is 0-based
    Play { slot: SlotIndex, clip: usize },
    Loop(SlotIndex),
    Clear,
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    /// Command reference shown by `h`
    pub const HELP: &'static [(&'static str, &'static str)] = &[
        ("r N", "start or stop recording in slot N"),
        ("p N M", "play or pause file M of slot N"),
        ("l N", "toggle looping for slot N"),
        ("c", "clear all slots"),
        ("s", "show slots"),
        ("h", "show this help"),
        ("q", "quit"),
    ];
}

fn slot_arg<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<SlotIndex, CommandParseError> {
    let raw = args.next().ok_or(CommandParseError::MissingArgument {
        command,
        argument: "slot number",
    })?;
    Ok(raw.parse::<SlotIndex>()?)
}

fn clip_arg<'a>(args: &mut impl Iterator<Item = &'a str>) -> Result<usize, CommandParseError> {
    let raw = args.next().ok_or(CommandParseError::MissingArgument {
        command: "play",
        argument: "file number",
    })?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandParseError::InvalidClip(raw.to_string())),
    }
}

impl FromStr for SessionCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandParseError::Unknown(String::new()));
        };

        let command = match name.to_lowercase().as_str() {
            "r" | "record" => Self::Record(slot_arg(&mut words, "record")?),
            "p" | "play" => {
                let slot = slot_arg(&mut words, "play")?;
                let clip = clip_arg(&mut words)?;
                Self::Play { slot, clip }
            }
            "l" | "loop" => Self::Loop(slot_arg(&mut words, "loop")?),
            "c" | "clear" => Self::Clear,
            "s" | "status" => Self::Status,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(CommandParseError::Unknown(name.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandParseError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}
