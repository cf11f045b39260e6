//! Save and restore the player progress.
//!
//! The saved object is a serialization of the [`PlayerProgress`] object in JSON format
//! by using [`serde`]. Storage failures never reach the caller: a missing or corrupt
//! file loads as fresh progress, and a failed write is logged and dropped.

use log::{debug, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fs::{File, create_dir_all, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::progress::PlayerProgress;

/// Persistence boundary for [`PlayerProgress`].
///
/// Implementors only provide storage. The update and unlock rules are shared.
pub trait ProgressTracker {
    /// Return the stored progress, or defaults when there is none or it is unreadable.
    fn load(&self) -> PlayerProgress;

    fn save(&self, progress: &PlayerProgress);

    /// Forget all stored progress.
    fn reset(&self);

    /// Load, apply a level completion, save, and return the updated record.
    fn update_level_progress(&self, level_id: u32, moves: usize, time: u64, stars: u8) -> PlayerProgress {
        let mut progress = self.load();
        progress.record_completion(level_id, moves, time, stars);
        progress.last_played = Some(Utc::now());
        self.save(&progress);
        progress
    }

    fn is_unlocked(&self, level_id: u32, progress: &PlayerProgress) -> bool {
        progress.is_level_unlocked(level_id)
    }
}

/// Object to save and restore the progress in a JSON file.
pub struct FileProgressTracker {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl FileProgressTracker {
    /// Create a [`FileProgressTracker`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the progress must be saved.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push("progress.json");
        debug!("Progress file: {data_dir:?}");
        Self {
            save_file: data_dir,
        }
    }

    pub fn get_save_file(&self) -> &Path {
        &self.save_file
    }

    /// Retrieve the [`PlayerProgress`] object from the progress file.
    ///
    /// Return None if the progress file does not exist.
    fn read_progress(&self) -> Result<Option<PlayerProgress>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let progress: PlayerProgress = serde_json::from_reader(reader)?;
        Ok(Some(progress))
    }

    fn write_progress(&self, progress: &PlayerProgress) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = self.save_file.parent() {
            create_dir_all(dir)?;
        }
        let file: File = File::create(&self.save_file)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer(&mut writer, progress)?;
        writer.flush()?;
        Ok(())
    }
}

impl ProgressTracker for FileProgressTracker {
    fn load(&self) -> PlayerProgress {
        match self.read_progress() {
            Ok(Some(progress)) => progress,
            Ok(None) => PlayerProgress::default(),
            Err(error) => {
                warn!("Failed to load player progress: {error}");
                PlayerProgress::default()
            }
        }
    }

    fn save(&self, progress: &PlayerProgress) {
        if let Err(error) = self.write_progress(progress) {
            warn!("Failed to save player progress: {error}");
        }
    }

    fn reset(&self) {
        if let Err(error) = remove_file(&self.save_file)
            && error.kind() != ErrorKind::NotFound
        {
            warn!("Failed to reset player progress: {error}");
        }
    }
}

/// Keeps progress for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryProgressTracker {
    progress: RefCell<Option<PlayerProgress>>,
}

impl ProgressTracker for MemoryProgressTracker {
    fn load(&self) -> PlayerProgress {
        self.progress.borrow().clone().unwrap_or_default()
    }

    fn save(&self, progress: &PlayerProgress) {
        *self.progress.borrow_mut() = Some(progress.clone());
    }

    fn reset(&self) {
        *self.progress.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let tracker = FileProgressTracker::new(dir.path().to_path_buf());
        assert_eq!(tracker.load(), PlayerProgress::default());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let tracker = FileProgressTracker::new(dir.path().to_path_buf());
        fs::write(tracker.get_save_file(), "{ not json").unwrap();
        assert_eq!(tracker.load(), PlayerProgress::default());
    }

    #[test]
    fn test_update_persists_across_trackers() {
        let dir = TempDir::new().unwrap();
        let tracker = FileProgressTracker::new(dir.path().join("nested"));
        let updated = tracker.update_level_progress(1, 4, 12, 2);
        assert_eq!(updated.total_stars, 2);
        assert!(updated.last_played.is_some());

        let reopened = FileProgressTracker::new(dir.path().join("nested"));
        let loaded = reopened.load();
        assert_eq!(loaded, updated);
        assert!(reopened.is_unlocked(2, &loaded));
        assert!(!reopened.is_unlocked(3, &loaded));
    }

    #[test]
    fn test_inconsistent_file_updates_without_panic() {
        let dir = TempDir::new().unwrap();
        let tracker = FileProgressTracker::new(dir.path().to_path_buf());
        let json = r#"{"current_level":2,"total_stars":0,"levels_completed":1,
            "level_progress":{"1":{"level_id":1,"completed":true,
            "best_score":{"moves":5,"time":9,"stars":2},"completed_at":null}},
            "last_played":null}"#;
        fs::write(tracker.get_save_file(), json).unwrap();

        let updated = tracker.update_level_progress(1, 3, 3, 3);
        assert_eq!(updated.total_stars, 3);
        assert_eq!(updated.get_best_score(1).map(|b| b.stars), Some(3));
        assert_eq!(tracker.load(), updated);
    }

    #[test]
    fn test_reset_removes_file() {
        let dir = TempDir::new().unwrap();
        let tracker = FileProgressTracker::new(dir.path().to_path_buf());
        tracker.update_level_progress(1, 4, 12, 3);
        assert!(tracker.get_save_file().exists());
        tracker.reset();
        assert!(!tracker.get_save_file().exists());
        assert_eq!(tracker.load(), PlayerProgress::default());
        // resetting a missing file is harmless
        tracker.reset();
        assert!(!tracker.get_save_file().exists());
    }

    #[test]
    fn test_memory_tracker() {
        let tracker = MemoryProgressTracker::default();
        assert_eq!(tracker.load(), PlayerProgress::default());
        tracker.update_level_progress(1, 3, 5, 3);
        tracker.update_level_progress(1, 9, 5, 1);
        let progress = tracker.load();
        assert_eq!(progress.get_best_score(1).map(|b| b.stars), Some(3));
        tracker.reset();
        assert_eq!(tracker.load(), PlayerProgress::default());
    }
}
