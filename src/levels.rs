//! Static level catalog.
//!
//! Level ids are sequential from 1 and match the position in [`LEVELS`] plus one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::GameConfig;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Move-count ceilings for each star rating, ascending.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StarThresholds {
    pub three_star: usize,
    pub two_star: usize,
    pub one_star: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: u32,
    pub name: &'static str,
    pub difficulty: Difficulty,
    pub config: GameConfig,
    pub star_thresholds: StarThresholds,
}

const fn level(
    id: u32,
    name: &'static str,
    difficulty: Difficulty,
    (tube_count, tube_capacity, color_count, empty_tubes): (usize, usize, usize, usize),
    (three_star, two_star, one_star): (usize, usize, usize),
) -> Level {
    Level {
        id,
        name,
        difficulty,
        config: GameConfig {
            tube_count,
            tube_capacity,
            color_count,
            empty_tubes,
        },
        star_thresholds: StarThresholds {
            three_star,
            two_star,
            one_star,
        },
    }
}

use Difficulty::{Easy, Hard, Medium};

pub static LEVELS: [Level; 20] = [
    level(1, "First Pour", Easy, (4, 3, 2, 2), (3, 5, 8)),
    level(2, "Three Colors", Easy, (5, 3, 3, 2), (6, 9, 12)),
    level(3, "Getting Warmer", Easy, (5, 4, 3, 2), (8, 12, 16)),
    level(4, "Four Square", Easy, (6, 4, 4, 2), (12, 16, 22)),
    level(5, "Easy Champion", Easy, (7, 4, 4, 3), (15, 20, 28)),
    level(6, "Step It Up", Medium, (7, 4, 5, 2), (18, 25, 35)),
    level(7, "Rainbow Mix", Medium, (8, 4, 5, 3), (20, 28, 38)),
    level(8, "Six Pack", Medium, (8, 4, 6, 2), (22, 30, 42)),
    level(9, "Deep Waters", Medium, (8, 5, 6, 2), (25, 35, 48)),
    level(10, "Color Chaos", Medium, (9, 4, 6, 3), (28, 38, 52)),
    level(11, "Almost There", Medium, (9, 5, 6, 3), (30, 42, 58)),
    level(12, "Medium Master", Medium, (10, 5, 7, 3), (35, 48, 65)),
    level(13, "Hard Start", Hard, (10, 5, 8, 2), (38, 52, 72)),
    level(14, "Overflow", Hard, (11, 5, 8, 3), (42, 58, 78)),
    level(15, "Deep Trouble", Hard, (11, 6, 8, 3), (45, 62, 85)),
    level(16, "Color Storm", Hard, (12, 6, 8, 4), (48, 66, 90)),
    level(17, "Expert Level", Hard, (12, 6, 8, 4), (50, 70, 95)),
    level(18, "Mind Bender", Hard, (13, 6, 8, 5), (55, 75, 100)),
    level(19, "Final Challenge", Hard, (14, 6, 8, 6), (60, 80, 110)),
    level(20, "Saltey Master", Hard, (15, 6, 8, 7), (65, 85, 120)),
];

pub fn level_by_id(id: u32) -> Option<&'static Level> {
    LEVELS.iter().find(|l| l.id == id)
}

pub fn next_level(id: u32) -> Option<&'static Level> {
    level_by_id(id + 1)
}

pub fn levels_by_difficulty(difficulty: Difficulty) -> impl Iterator<Item = &'static Level> {
    LEVELS.iter().filter(move |l| l.difficulty == difficulty)
}

pub fn level_count() -> u32 {
    LEVELS.len() as u32
}
