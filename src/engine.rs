//! Pour rules and completion detection.
//!
//! Every function here takes tubes by reference and hands back new values; nothing
//! is mutated in place.

use log::debug;
use thiserror::Error;

use crate::model::{Layer, Tube, push_merged};

/// The first rule a pour broke.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum PourRejection {
    #[error("source tube is empty")]
    SourceEmpty,
    #[error("destination tube is full")]
    DestinationFull,
    #[error("cannot pour a tube into itself")]
    SameTube,
    #[error("top colors do not match")]
    ColorMismatch,
}

/// Check the pour rules in order and report the first one that fails.
pub fn check_pour(from: &Tube, to: &Tube) -> Result<(), PourRejection> {
    if from.is_empty() {
        return Err(PourRejection::SourceEmpty);
    }
    if to.is_full() {
        return Err(PourRejection::DestinationFull);
    }
    if from.get_id() == to.get_id() {
        return Err(PourRejection::SameTube);
    }
    match (from.get_top_layer(), to.get_top_layer()) {
        (Some(source), Some(dest)) if source.color != dest.color => {
            Err(PourRejection::ColorMismatch)
        }
        _ => Ok(()),
    }
}

pub fn can_pour(from: &Tube, to: &Tube) -> bool {
    check_pour(from, to).is_ok()
}

/// Pour the top layer of `from` into `to`.
///
/// Returns the new `(from, to)` pair, or `None` when the pour is illegal. When the
/// destination fills up first, the source keeps the remainder of its top layer.
pub fn pour(from: &Tube, to: &Tube) -> Option<(Tube, Tube)> {
    if let Err(reason) = check_pour(from, to) {
        debug!("Pour {} -> {} rejected: {reason}", from.get_id(), to.get_id());
        return None;
    }

    let mut from_layers = from.get_layers().to_vec();
    let mut to_layers = to.get_layers().to_vec();
    let top = from_layers.pop()?;

    let pour_amount = top.amount.min(to.get_empty_space());
    push_merged(&mut to_layers, Layer::new(top.color, pour_amount));
    if top.amount > pour_amount {
        from_layers.push(Layer::new(top.color, top.amount - pour_amount));
    }

    Some((
        Tube::new(from.get_id(), from.get_capacity(), from_layers),
        Tube::new(to.get_id(), to.get_capacity(), to_layers),
    ))
}

/// A board is solved when every tube is empty or holds a single color.
pub fn is_game_complete(tubes: &[Tube]) -> bool {
    tubes.iter().all(|t| t.is_empty() || t.is_complete())
}
