//! Player progress across the level catalog.
//!
//! [`PlayerProgress`] is the persisted record. Its rules (best-score replacement,
//! unlocking) live here; reading and writing it is the job of
//! [`crate::saver::ProgressTracker`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::levels::{Difficulty, level_count, levels_by_difficulty};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct BestScore {
    pub moves: usize,
    pub time: u64,
    pub stars: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelProgress {
    pub level_id: u32,
    pub completed: bool,
    pub best_score: Option<BestScore>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerProgress {
    /// Furthest level the player has reached.
    pub current_level: u32,
    pub total_stars: u32,
    pub levels_completed: u32,
    pub level_progress: BTreeMap<u32, LevelProgress>,
    pub last_played: Option<DateTime<Utc>>,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            current_level: 1,
            total_stars: 0,
            levels_completed: 0,
            level_progress: BTreeMap::new(),
            last_played: None,
        }
    }
}

impl PlayerProgress {
    /// Record a completion and return whether the stored best score changed.
    ///
    /// A new score replaces the stored one only with more stars, or with the same
    /// stars in fewer moves.
    pub fn record_completion(&mut self, level_id: u32, moves: usize, time: u64, stars: u8) -> bool {
        let existing = self.level_progress.get(&level_id);
        let (old_stars, old_moves) = match existing.and_then(|p| p.best_score) {
            Some(best) => (best.stars, best.moves),
            None => (0, usize::MAX),
        };
        let first_completion = existing.is_none();
        if !first_completion && stars < old_stars {
            return false;
        }
        if !first_completion && stars == old_stars && moves >= old_moves {
            return false;
        }

        if existing.and_then(|p| p.best_score).is_some() {
            self.total_stars = self.total_stars.saturating_sub(u32::from(old_stars));
        }
        self.total_stars += u32::from(stars);
        if first_completion {
            self.levels_completed += 1;
        }
        self.level_progress.insert(
            level_id,
            LevelProgress {
                level_id,
                completed: true,
                best_score: Some(BestScore { moves, time, stars }),
                completed_at: Some(Utc::now()),
            },
        );
        if level_id == self.current_level && level_id < level_count() {
            self.current_level = level_id + 1;
        }
        debug!("Level {level_id} best score is now {stars} stars in {moves} moves");
        true
    }

    /// Level 1 is always open; any other level opens once its predecessor is completed.
    pub fn is_level_unlocked(&self, level_id: u32) -> bool {
        if level_id == 1 {
            return true;
        }
        level_id
            .checked_sub(1)
            .and_then(|previous| self.level_progress.get(&previous))
            .is_some_and(|p| p.completed)
    }

    pub fn get_best_score(&self, level_id: u32) -> Option<BestScore> {
        self.level_progress.get(&level_id).and_then(|p| p.best_score)
    }

    /// Earned and available stars for one difficulty, as `(earned, total)`.
    pub fn stars_for_difficulty(&self, difficulty: Difficulty) -> (u32, u32) {
        levels_by_difficulty(difficulty).fold((0, 0), |(earned, total), level| {
            let stars = self.get_best_score(level.id).map_or(0, |b| u32::from(b.stars));
            (earned + stars, total + 3)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let progress = PlayerProgress::default();
        assert_eq!(progress.current_level, 1);
        assert_eq!(progress.total_stars, 0);
        assert!(progress.level_progress.is_empty());
    }

    #[test]
    fn test_unlock_follows_previous_completion() {
        let mut progress = PlayerProgress::default();
        assert!(progress.is_level_unlocked(1));
        assert!(!progress.is_level_unlocked(2));
        assert!(!progress.is_level_unlocked(0));

        progress.record_completion(1, 4, 10, 2);
        assert!(progress.is_level_unlocked(2));
        assert!(!progress.is_level_unlocked(3));
    }

    #[test]
    fn test_best_score_never_regresses() {
        let mut progress = PlayerProgress::default();
        assert!(progress.record_completion(1, 6, 30, 2));
        assert_eq!(progress.current_level, 2);
        assert_eq!(progress.levels_completed, 1);
        assert_eq!(progress.total_stars, 2);

        // fewer stars
        assert!(!progress.record_completion(1, 9, 5, 1));
        // same stars, more moves
        assert!(!progress.record_completion(1, 7, 5, 2));
        // same stars, same moves
        assert!(!progress.record_completion(1, 6, 5, 2));
        assert_eq!(progress.get_best_score(1).map(|b| b.time), Some(30));

        // same stars, fewer moves
        assert!(progress.record_completion(1, 5, 40, 2));
        assert_eq!(progress.total_stars, 2);

        assert!(progress.record_completion(1, 3, 40, 3));
        assert_eq!(progress.total_stars, 3);
        assert_eq!(progress.levels_completed, 1);
        assert_eq!(progress.current_level, 2);
    }

    #[test]
    fn test_zero_star_completion_still_unlocks() {
        let mut progress = PlayerProgress::default();
        assert!(progress.record_completion(1, 50, 100, 0));
        assert!(progress.is_level_unlocked(2));
        assert_eq!(progress.total_stars, 0);
        // a repeat zero-star run only replaces it when shorter
        assert!(!progress.record_completion(1, 60, 100, 0));
        assert!(progress.record_completion(1, 40, 100, 0));
    }

    #[test]
    fn test_current_level_stops_at_last_level() {
        let mut progress = PlayerProgress {
            current_level: 20,
            ..PlayerProgress::default()
        };
        progress.record_completion(20, 10, 10, 3);
        assert_eq!(progress.current_level, 20);
    }

    #[test]
    fn test_completing_an_older_level_keeps_current_level() {
        let mut progress = PlayerProgress {
            current_level: 5,
            ..PlayerProgress::default()
        };
        progress.record_completion(2, 10, 10, 3);
        assert_eq!(progress.current_level, 5);
    }

    #[test]
    fn test_inconsistent_star_total_does_not_underflow() {
        let mut progress = PlayerProgress::default();
        progress.record_completion(1, 5, 10, 2);
        progress.total_stars = 0;
        assert!(progress.record_completion(1, 3, 10, 3));
        assert_eq!(progress.total_stars, 3);
    }

    #[test]
    fn test_stars_for_difficulty() {
        let mut progress = PlayerProgress::default();
        progress.record_completion(1, 3, 10, 3);
        progress.record_completion(2, 8, 10, 2);
        progress.record_completion(6, 30, 10, 1);
        assert_eq!(progress.stars_for_difficulty(Difficulty::Easy), (5, 15));
        assert_eq!(progress.stars_for_difficulty(Difficulty::Medium), (1, 21));
        assert_eq!(progress.stars_for_difficulty(Difficulty::Hard), (0, 24));
    }
}
