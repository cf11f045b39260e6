use std::time::{Duration, Instant};

use log::{debug, info};

use crate::engine::{is_game_complete, pour};
use crate::generator::generate;
use crate::levels::{Level, level_by_id, next_level};
use crate::model::{GameConfig, Move, Tube};
use crate::progress::PlayerProgress;
use crate::saver::ProgressTracker;
use crate::scoring::Score;
use crate::solver::{DEFAULT_STATE_LIMIT, solve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Idle,
    LevelSelect,
    Playing,
    Completed,
    /// Reserved; no action currently enters it.
    Paused,
}

/// What undo does to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndoPolicy {
    /// Drop the last move from the history and leave the tubes as they are.
    #[default]
    TruncateHistory,
    /// Also restore the tubes saved before the last move.
    RestoreSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub undo_policy: UndoPolicy,
    /// Board budget for [`GameSession::hint`].
    pub solver_state_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            undo_policy: UndoPolicy::default(),
            solver_state_limit: DEFAULT_STATE_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    SelectTube(String),
    PourInto(String, String),
    Undo,
    Reset,
    StartLevel(u32),
    StartNewGame(Option<GameConfig>),
    NextLevel,
    LevelSelect,
}

/// Read-only view of the session for the front-end.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub tubes: Vec<Tube>,
    pub selected: Option<String>,
    pub score: Score,
    pub is_complete: bool,
    pub can_undo: bool,
    pub status: GameStatus,
    pub current_level: Option<Level>,
}

/// One live game, driven by player actions.
///
/// Every action runs to completion and either applies fully or leaves the session
/// untouched.
pub struct GameSession<T: ProgressTracker> {
    tubes: Vec<Tube>,
    selected: Option<String>,
    moves: Vec<Move>,
    undo_stack: Vec<Vec<Tube>>,
    is_complete: bool,
    current_level: Option<Level>,
    start_time: Option<Instant>,
    score: Score,
    status: GameStatus,
    options: SessionOptions,
    tracker: T,
    progress: PlayerProgress,
}

impl<T: ProgressTracker> GameSession<T> {
    pub fn new(tracker: T, options: SessionOptions) -> Self {
        let progress = tracker.load();
        Self {
            tubes: Vec::new(),
            selected: None,
            moves: Vec::new(),
            undo_stack: Vec::new(),
            is_complete: false,
            current_level: None,
            start_time: None,
            score: Score::default(),
            status: GameStatus::Idle,
            options,
            tracker,
            progress,
        }
    }

    /// Single entry point for the front-end. Returns whether the action took effect.
    pub fn handle_action(&mut self, action: ControlAction) -> bool {
        debug!("Action: {action:?}");
        match action {
            ControlAction::SelectTube(id) => self.select_tube(&id),
            ControlAction::PourInto(from, to) => self.pour_between_tubes(&from, &to),
            ControlAction::Undo => self.undo_move(),
            ControlAction::Reset => self.reset_game(),
            ControlAction::StartLevel(id) => self.start_level_by_id(id),
            ControlAction::StartNewGame(config) => {
                self.start_new_game(config);
                true
            }
            ControlAction::NextLevel => self.start_next_level(),
            ControlAction::LevelSelect => {
                self.go_to_level_select();
                true
            }
        }
    }

    fn begin(&mut self, tubes: Vec<Tube>, level: Option<Level>) {
        // Completion is only evaluated after a pour, even on a board dealt solved.
        self.is_complete = false;
        self.tubes = tubes;
        self.selected = None;
        self.moves.clear();
        self.undo_stack.clear();
        self.current_level = level;
        self.start_time = Some(Instant::now());
        self.score = Score::default();
        self.status = GameStatus::Playing;
    }

    pub fn start_level(&mut self, level: &Level) {
        info!("Starting level {} ({})", level.id, level.name);
        self.begin(generate(&level.config), Some(level.clone()));
    }

    /// Start a catalog level, refusing unknown and locked ones.
    pub fn start_level_by_id(&mut self, id: u32) -> bool {
        match level_by_id(id) {
            Some(level) if self.progress.is_level_unlocked(id) => {
                self.start_level(level);
                true
            }
            Some(_) => {
                debug!("Level {id} is locked");
                false
            }
            None => false,
        }
    }

    /// Start an ad hoc game, not bound to any level.
    pub fn start_new_game(&mut self, config: Option<GameConfig>) {
        let config = config.unwrap_or_default();
        info!("Starting a new game with {config:?}");
        self.begin(generate(&config), None);
    }

    /// Start an ad hoc game on a given board.
    pub fn start_custom(&mut self, tubes: Vec<Tube>) {
        info!("Starting a custom game with {} tubes", tubes.len());
        self.begin(tubes, None);
    }

    pub fn start_next_level(&mut self) -> bool {
        let Some(next) = self.current_level.as_ref().and_then(|l| next_level(l.id)) else {
            return false;
        };
        self.start_level(next);
        true
    }

    /// Click handling: select, deselect, or pour from the selected tube.
    ///
    /// The selection is cleared after any pour attempt, successful or not.
    pub fn select_tube(&mut self, id: &str) -> bool {
        match self.selected.take() {
            None => {
                let selectable = self.find_tube(id).is_some_and(|i| !self.tubes[i].is_empty());
                if selectable {
                    self.selected = Some(id.to_string());
                }
                selectable
            }
            Some(selected) if selected == id => true,
            Some(selected) => self.pour_between_tubes(&selected, id),
        }
    }

    pub fn pour_between_tubes(&mut self, from_id: &str, to_id: &str) -> bool {
        let (Some(from), Some(to)) = (self.find_tube(from_id), self.find_tube(to_id)) else {
            return false;
        };
        let Some((new_from, new_to)) = pour(&self.tubes[from], &self.tubes[to]) else {
            return false;
        };

        if self.options.undo_policy == UndoPolicy::RestoreSnapshot {
            self.undo_stack.push(self.tubes.clone());
        }
        self.tubes[from] = new_from;
        self.tubes[to] = new_to;
        self.moves.push(Move::new(from_id, to_id));

        let previous_status = self.status;
        self.refresh_completion();
        self.update_score();
        if self.status == GameStatus::Completed && previous_status != GameStatus::Completed {
            self.complete_level();
        }
        true
    }

    pub fn undo_move(&mut self) -> bool {
        if self.moves.pop().is_none() {
            return false;
        }
        if self.options.undo_policy == UndoPolicy::RestoreSnapshot
            && let Some(previous) = self.undo_stack.pop()
        {
            self.tubes = previous;
            self.refresh_completion();
            self.update_score();
        }
        self.selected = None;
        true
    }

    /// Replay the bound level with a fresh layout. Does nothing for ad hoc games.
    pub fn reset_game(&mut self) -> bool {
        match self.current_level.clone() {
            Some(level) => {
                self.start_level(&level);
                true
            }
            None => false,
        }
    }

    pub fn go_to_level_select(&mut self) {
        self.tubes.clear();
        self.selected = None;
        self.moves.clear();
        self.undo_stack.clear();
        self.is_complete = false;
        self.current_level = None;
        self.start_time = None;
        self.score = Score::default();
        self.status = GameStatus::LevelSelect;
        self.progress = self.tracker.load();
    }

    /// First pour of a solution from the current board, as tube ids.
    pub fn hint(&self) -> Option<(String, String)> {
        let steps = solve(&self.tubes, self.options.solver_state_limit)?;
        let &(from, to) = steps.first()?;
        Some((
            self.tubes[from].get_id().to_string(),
            self.tubes[to].get_id().to_string(),
        ))
    }

    fn find_tube(&self, id: &str) -> Option<usize> {
        self.tubes.iter().position(|t| t.get_id() == id)
    }

    fn refresh_completion(&mut self) {
        self.is_complete = is_game_complete(&self.tubes);
        self.status = if self.is_complete {
            GameStatus::Completed
        } else {
            GameStatus::Playing
        };
    }

    fn update_score(&mut self) {
        self.score = Score::new(self.moves.len(), self.elapsed(), self.current_level.as_ref());
    }

    fn complete_level(&mut self) {
        let Some(level) = &self.current_level else {
            info!("Custom game solved in {} moves", self.score.moves);
            return;
        };
        info!(
            "Level {} solved in {} moves, {} stars",
            level.id, self.score.moves, self.score.stars
        );
        self.progress = self.tracker.update_level_progress(
            level.id,
            self.score.moves,
            self.score.time,
            self.score.stars,
        );
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|s| s.elapsed()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tubes: self.tubes.clone(),
            selected: self.selected.clone(),
            score: self.score,
            is_complete: self.is_complete,
            can_undo: self.can_undo(),
            status: self.status,
            current_level: self.current_level.clone(),
        }
    }

    pub fn get_tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn get_selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get_moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn get_score(&self) -> Score {
        self.score
    }

    pub fn get_status(&self) -> GameStatus {
        self.status
    }

    pub fn get_current_level(&self) -> Option<&Level> {
        self.current_level.as_ref()
    }

    pub fn get_progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn get_tracker(&self) -> &T {
        &self.tracker
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn can_undo(&self) -> bool {
        !self.moves.is_empty()
    }
}
