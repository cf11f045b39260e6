//! Water sort puzzle engine.
//!
//! Tubes hold stacked colored layers; the player pours from tube to tube until every
//! tube holds a single color or is empty. [`session::GameSession`] is the entry point
//! for a front-end: it owns the board, applies [`engine`] rules to each action, scores
//! the result and records level progress through a [`saver::ProgressTracker`].

pub mod cli_options;
pub mod engine;
pub mod generator;
pub mod levels;
pub mod model;
pub mod progress;
pub mod saver;
pub mod scoring;
pub mod session;
pub mod solver;
