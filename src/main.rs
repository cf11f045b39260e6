use std::io::{self, BufRead, Write};

use clap::Parser;
use log::warn;

use water_sort::cli_options::{Args, Command, parse_command};
use water_sort::levels::LEVELS;
use water_sort::model::parse_board;
use water_sort::progress::PlayerProgress;
use water_sort::saver::{FileProgressTracker, ProgressTracker};
use water_sort::session::{ControlAction, GameSession, GameStatus};

const HELP: &str = "\
  <n>          select tube n, or pour the selected tube into it
  pour <a> <b> pour tube a into tube b
  undo, reset, hint, next, new
  play <n>     start level n
  levels       list levels
  quit";

fn print_levels(progress: &PlayerProgress) {
    println!(
        "{} stars, {}/{} levels completed",
        progress.total_stars,
        progress.levels_completed,
        LEVELS.len()
    );
    for level in LEVELS.iter() {
        let state = if !progress.is_level_unlocked(level.id) {
            "locked".to_string()
        } else {
            match progress.get_best_score(level.id) {
                Some(best) => format!("{} stars, best {} moves", best.stars, best.moves),
                None => "open".to_string(),
            }
        };
        println!("{:>3}. {:<16} {:<7} {state}", level.id, level.name, level.difficulty);
    }
}

fn render<T: ProgressTracker>(session: &GameSession<T>) {
    let snapshot = session.snapshot();
    if snapshot.status == GameStatus::LevelSelect {
        print_levels(session.get_progress());
        return;
    }
    match &snapshot.current_level {
        Some(level) => println!("Level {}: {} ({})", level.id, level.name, level.difficulty),
        None => println!("Custom game"),
    }
    for (i, tube) in snapshot.tubes.iter().enumerate() {
        let mark = if snapshot.selected.as_deref() == Some(tube.get_id()) {
            '*'
        } else {
            ' '
        };
        println!("{mark}{i:>2} [{}]", tube.get_text_representation());
    }
    println!(
        "Moves: {}  Time: {}s  Stars: {}/3{}",
        snapshot.score.moves,
        snapshot.score.time,
        snapshot.score.stars,
        if snapshot.can_undo { "  (undo available)" } else { "" }
    );
    if snapshot.is_complete {
        println!("Solved!");
    }
}

fn main() {
    let args: Args = Args::parse();
    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = args.get_log_level() {
        logger.filter_level(level);
    }
    logger.init();

    let tracker = FileProgressTracker::new(args.get_data_dir());
    if args.reset_progress {
        tracker.reset();
    }
    if args.ls {
        print_levels(&tracker.load());
        return;
    }

    let mut session = GameSession::new(tracker, args.get_session_options());
    if let Some(board) = &args.board {
        match parse_board(board) {
            Ok(tubes) => session.start_custom(tubes),
            Err(error) => {
                eprintln!("Invalid board: {error}");
                std::process::exit(2);
            }
        }
    } else {
        let level = args.level.unwrap_or(session.get_progress().current_level);
        if !session.handle_action(ControlAction::StartLevel(level)) {
            warn!("Level {level} is not available, starting level 1");
            session.handle_action(ControlAction::StartLevel(1));
        }
    }

    let stdin = io::stdin();
    render(&session);
    print!("> ");
    let _ = io::stdout().flush();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Levels) => print_levels(session.get_progress()),
            Ok(Command::Hint) => match session.hint() {
                Some((from, to)) => println!("Try pouring {from} into {to}"),
                None => println!("No solution found from here"),
            },
            Ok(Command::Action(action)) => {
                if !session.handle_action(action) {
                    println!("Nothing happened");
                }
                render(&session);
            }
            Err(error) => println!("{error}"),
        }
        print!("> ");
        let _ = io::stdout().flush();
    }
}
