//! Milestone detection over the last pair of snapshots in a history.

use levelwatch_core::{Milestone, StateSnapshot};

/// Default level-leap threshold. The comparison is strict.
pub const LEVEL_LEAP_THRESHOLD: f64 = 0.1;

/// Compare the last two entries of `history` and return a milestone if the
/// level rose by strictly more than `threshold`.
///
/// Fewer than two entries means there is no pair to compare.
pub fn evaluate_last_pair(history: &[StateSnapshot], threshold: f64) -> Option<Milestone> {
    let [.., previous, current] = history else {
        return None;
    };
    let delta = current.level - previous.level;
    if delta > threshold {
        Some(Milestone::level_leap(current.timestamp, delta, current.level))
    } else {
        None
    }
}

/// Every milestone that recording `history` one entry at a time would have
/// produced, in order.
pub fn derive_milestones(history: &[StateSnapshot], threshold: f64) -> Vec<Milestone> {
    (2..=history.len())
        .filter_map(|end| evaluate_last_pair(&history[..end], threshold))
        .collect()
}
