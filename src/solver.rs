//! Search for a sequence of pours that solves a board.
//!
//! Used for hints only. The generator does not call it, so generated puzzles are
//! still unchecked.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use rayon::prelude::*;

use crate::engine::{can_pour, is_game_complete, pour};
use crate::model::{Color, Tube};

/// Default number of distinct boards visited before the search gives up.
pub const DEFAULT_STATE_LIMIT: usize = 200_000;

/// A pour, as indexes into the tube slice.
pub type PourStep = (usize, usize);

type StateKey = Vec<Vec<(Color, u64)>>;

fn state_key(tubes: &[Tube]) -> StateKey {
    tubes
        .iter()
        .map(|t| {
            t.get_layers()
                .iter()
                .map(|l| (l.color, l.amount.to_bits()))
                .collect()
        })
        .collect()
}

fn candidate_moves(tubes: &[Tube]) -> Vec<PourStep> {
    let mut moves = Vec::new();
    for (i, from) in tubes.iter().enumerate() {
        for (j, to) in tubes.iter().enumerate() {
            if i == j || !can_pour(from, to) {
                continue;
            }
            // Moving a sorted tube into an empty one changes nothing useful.
            if from.is_complete() && to.is_empty() {
                continue;
            }
            moves.push((i, j));
        }
    }
    moves
}

fn apply(tubes: &[Tube], (from, to): PourStep) -> Option<Vec<Tube>> {
    let (new_from, new_to) = pour(&tubes[from], &tubes[to])?;
    let mut next = tubes.to_vec();
    next[from] = new_from;
    next[to] = new_to;
    Some(next)
}

struct Frame {
    tubes: Vec<Tube>,
    moves: Vec<PourStep>,
    next: usize,
}

impl Frame {
    fn new(tubes: Vec<Tube>) -> Self {
        let moves = candidate_moves(&tubes);
        Self {
            tubes,
            moves,
            next: 0,
        }
    }
}

/// Depth-first search from the board reached by `first`.
fn search_branch(
    start: &[Tube],
    first: PourStep,
    state_limit: usize,
    found: &AtomicBool,
) -> Option<Vec<PourStep>> {
    let root = apply(start, first)?;
    let mut visited: HashSet<StateKey> = HashSet::new();
    visited.insert(state_key(start));
    visited.insert(state_key(&root));

    let mut path = vec![first];
    if is_game_complete(&root) {
        return Some(path);
    }
    let mut stack = vec![Frame::new(root)];

    while let Some(frame) = stack.last_mut() {
        if found.load(Ordering::Relaxed) {
            return None;
        }
        if frame.next >= frame.moves.len() {
            stack.pop();
            path.pop();
            continue;
        }
        let step = frame.moves[frame.next];
        frame.next += 1;

        let Some(next) = apply(&frame.tubes, step) else {
            continue;
        };
        if !visited.insert(state_key(&next)) {
            continue;
        }
        if visited.len() > state_limit {
            debug!("Branch {first:?} gave up after {state_limit} states");
            return None;
        }
        path.push(step);
        if is_game_complete(&next) {
            return Some(path);
        }
        stack.push(Frame::new(next));
    }
    None
}

/// Find a sequence of pours that solves `tubes`.
///
/// Each first move is explored on its own rayon task with its own budget of
/// `state_limit` boards; the first branch to succeed stops the others. Returns
/// `Some(vec![])` for a board that is already solved and `None` when no solution was
/// found within the budget.
pub fn solve(tubes: &[Tube], state_limit: usize) -> Option<Vec<PourStep>> {
    if is_game_complete(tubes) {
        return Some(Vec::new());
    }
    let first_moves = candidate_moves(tubes);
    debug!("Solving from {} candidate first moves", first_moves.len());

    let found = AtomicBool::new(false);
    let solution = first_moves.par_iter().find_map_any(|&first| {
        let path = search_branch(tubes, first, state_limit, &found)?;
        found.store(true, Ordering::Relaxed);
        Some(path)
    });
    match &solution {
        Some(path) => debug!("Found a solution in {} pours", path.len()),
        None => debug!("No solution found"),
    }
    solution
}
