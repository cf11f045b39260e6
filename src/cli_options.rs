//! Command-line options and the commands typed during play.
//!
//! # Examples
//!
//! Play the third level, keeping progress in a custom directory:
//!
//! ```text
//! $ water_sort --level 3 --data-dir /tmp/water-sort
//! ```
//!
//! Play a hand-made board (one token per tube, bottom first, `.` for free space):
//!
//! ```text
//! $ water_sort --board "RGR GRG ... ..."
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use crate::model::tube_id;
use crate::session::{ControlAction, SessionOptions, UndoPolicy};

/// Sort the colors, one pour at a time.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub struct Args {
    /// Start directly on this level
    #[arg(short, long, conflicts_with = "board")]
    pub level: Option<u32>,

    /// Play a custom board, e.g. "RGR GRG ... ..."
    #[arg(short, long)]
    pub board: Option<String>,

    /// Directory holding progress.json
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Make undo restore the tubes, not only the move count
    #[arg(long, default_value_t = false)]
    pub restore_undo: bool,

    /// List the levels with their unlock state and stars, then exit
    #[arg(long, default_value_t = false)]
    pub ls: bool,

    /// Delete the saved progress before starting
    #[arg(long, default_value_t = false)]
    pub reset_progress: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

impl Args {
    pub fn get_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("water-sort"),
        }
    }

    pub fn get_session_options(&self) -> SessionOptions {
        SessionOptions {
            undo_policy: if self.restore_undo {
                UndoPolicy::RestoreSnapshot
            } else {
                UndoPolicy::TruncateHistory
            },
            ..SessionOptions::default()
        }
    }

    pub fn get_log_level(&self) -> Option<LevelFilter> {
        self.debug.then_some(LevelFilter::Debug)
    }
}

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Action(ControlAction),
    Hint,
    Levels,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("'{0}' is not a tube or level number")]
    BadNumber(String),
    #[error("'{0}' needs {1} number(s)")]
    MissingArgument(&'static str, usize),
}

fn number(token: Option<&str>, command: &'static str, count: usize) -> Result<usize, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument(command, count))?;
    token
        .parse()
        .map_err(|_| CommandError::BadNumber(token.to_string()))
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(Command::Help);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "pour" | "p" => {
            let from = number(tokens.next(), "pour", 2)?;
            let to = number(tokens.next(), "pour", 2)?;
            Command::Action(ControlAction::PourInto(tube_id(from), tube_id(to)))
        }
        "undo" | "u" => Command::Action(ControlAction::Undo),
        "reset" | "r" => Command::Action(ControlAction::Reset),
        "next" | "n" => Command::Action(ControlAction::NextLevel),
        "new" => Command::Action(ControlAction::StartNewGame(None)),
        "play" => {
            let id = number(tokens.next(), "play", 1)?;
            let id = u32::try_from(id).map_err(|_| CommandError::BadNumber(id.to_string()))?;
            Command::Action(ControlAction::StartLevel(id))
        }
        "levels" | "l" => Command::Levels,
        "hint" | "h" => Command::Hint,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(index) => Command::Action(ControlAction::SelectTube(tube_id(index))),
            Err(_) => return Err(CommandError::Unknown(head.to_string())),
        },
    };
    Ok(command)
}
