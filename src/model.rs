use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Liquid quantity, in capacity slots.
pub type Amount = f64;

pub const PALETTE: [Color; 8] = [
    Color::Red,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Purple,
    Color::Orange,
    Color::Pink,
    Color::Cyan,
];

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl Color {
    /// One-letter code used by the text board format.
    pub fn get_letter(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Green => 'G',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
            Color::Orange => 'O',
            Color::Pink => 'K',
            Color::Cyan => 'C',
        }
    }

    pub fn from_letter(ch: char) -> Option<Self> {
        let up = ch.to_ascii_uppercase();
        PALETTE.iter().copied().find(|c| c.get_letter() == up)
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Cyan => "cyan",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Layer {
    pub color: Color,
    pub amount: Amount,
}

impl Layer {
    pub fn new(color: Color, amount: Amount) -> Self {
        Self { color, amount }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown color letter '{0}'")]
    UnknownColor(char),
    #[error("liquid above an empty slot in tube '{0}'")]
    FloatingLiquid(String),
    #[error("tube '{0}' has no capacity")]
    ZeroCapacity(String),
    #[error("board has no tubes")]
    EmptyBoard,
}

/// A capacity-bounded stack of layers, bottom first.
///
/// The empty, full and complete flags are computed from the layers on every call,
/// so they can never drift from the contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tube {
    id: String,
    capacity: Amount,
    layers: Vec<Layer>,
}

impl Tube {
    pub fn new(id: impl Into<String>, capacity: Amount, layers: Vec<Layer>) -> Self {
        Self {
            id: id.into(),
            capacity,
            layers,
        }
    }

    pub fn empty(id: impl Into<String>, capacity: Amount) -> Self {
        Self::new(id, capacity, Vec::new())
    }

    /// Build a tube from letters such as `"RRB."`: bottom first, `.` for a free slot.
    ///
    /// The token length is the capacity. Consecutive letters of the same color become
    /// one layer.
    pub fn new_from_repr(id: impl Into<String>, repr: &str) -> Result<Self, ParseError> {
        let id = id.into();
        let mut layers: Vec<Layer> = Vec::new();
        let mut capacity = 0usize;
        let mut saw_gap = false;
        for ch in repr.trim().chars() {
            capacity += 1;
            if ch == '.' {
                saw_gap = true;
                continue;
            }
            let color = Color::from_letter(ch).ok_or(ParseError::UnknownColor(ch))?;
            if saw_gap {
                return Err(ParseError::FloatingLiquid(id));
            }
            push_merged(&mut layers, Layer::new(color, 1.0));
        }
        if capacity == 0 {
            return Err(ParseError::ZeroCapacity(id));
        }
        Ok(Self::new(id, capacity as Amount, layers))
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_capacity(&self) -> Amount {
        self.capacity
    }

    pub fn get_layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn get_top_layer(&self) -> Option<&Layer> {
        self.layers.last()
    }

    pub fn get_filled_amount(&self) -> Amount {
        self.layers.iter().map(|l| l.amount).sum()
    }

    pub fn get_empty_space(&self) -> Amount {
        self.capacity - self.get_filled_amount()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.get_filled_amount() >= self.capacity
    }

    pub fn is_complete(&self) -> bool {
        match self.layers.first() {
            Some(first) => self.layers.iter().all(|l| l.color == first.color),
            None => false,
        }
    }

    /// Amount held of one color, across all layers.
    pub fn get_color_amount(&self, color: Color) -> Amount {
        self.layers
            .iter()
            .filter(|l| l.color == color)
            .map(|l| l.amount)
            .sum()
    }

    /// Inverse of [`Tube::new_from_repr`]. Fractional amounts are rounded to whole slots.
    pub fn get_text_representation(&self) -> String {
        let mut repr = String::new();
        for layer in &self.layers {
            let units = layer.amount.round().max(0.0) as usize;
            repr.extend(std::iter::repeat_n(layer.color.get_letter(), units));
        }
        let slots = self.capacity.round().max(0.0) as usize;
        while repr.chars().count() < slots {
            repr.push('.');
        }
        repr
    }
}

/// Append a layer, folding it into the current top when the colors match.
pub(crate) fn push_merged(layers: &mut Vec<Layer>, layer: Layer) {
    match layers.last_mut() {
        Some(top) if top.color == layer.color => top.amount += layer.amount,
        _ => layers.push(layer),
    }
}

pub fn tube_id(index: usize) -> String {
    format!("tube-{index}")
}

/// Parse a whole board, one whitespace-separated token per tube.
pub fn parse_board(repr: &str) -> Result<Vec<Tube>, ParseError> {
    let tubes = repr
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| Tube::new_from_repr(tube_id(i), token))
        .collect::<Result<Vec<_>, _>>()?;
    if tubes.is_empty() {
        return Err(ParseError::EmptyBoard);
    }
    Ok(tubes)
}

pub fn board_text_representation(tubes: &[Tube]) -> String {
    tubes
        .iter()
        .map(|t| t.get_text_representation())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
}

impl Move {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub tube_count: usize,
    pub tube_capacity: usize,
    pub color_count: usize,
    pub empty_tubes: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tube_count: 6,
            tube_capacity: 4,
            color_count: 4,
            empty_tubes: 2,
        }
    }
}
