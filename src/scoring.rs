use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::levels::Level;

/// Ceilings used when a game is not bound to a catalog level.
const DEFAULT_THREE_STAR: usize = 15;
const DEFAULT_TWO_STAR: usize = 25;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Score {
    pub moves: usize,
    /// Whole seconds since the session started.
    pub time: u64,
    pub stars: u8,
}

impl Score {
    pub fn new(moves: usize, elapsed: Duration, level: Option<&Level>) -> Self {
        Self {
            moves,
            time: elapsed.as_secs(),
            stars: calculate_stars(moves, level),
        }
    }
}

/// Star rating for a move count.
///
/// A catalog level can rate down to 0 stars. An ad hoc game never drops below 1.
pub fn calculate_stars(moves: usize, level: Option<&Level>) -> u8 {
    match level {
        Some(level) => {
            let t = &level.star_thresholds;
            if moves <= t.three_star {
                3
            } else if moves <= t.two_star {
                2
            } else if moves <= t.one_star {
                1
            } else {
                0
            }
        }
        None => {
            if moves <= DEFAULT_THREE_STAR {
                3
            } else if moves <= DEFAULT_TWO_STAR {
                2
            } else {
                1
            }
        }
    }
}
