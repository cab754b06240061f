//! Trajectory summaries built from a subsystem's first and last snapshots.

use chrono::TimeDelta;
use levelwatch_core::{StateSnapshot, Summary, SummaryOutcome, SystemId};

/// Summarize `history`. An empty history yields `SummaryOutcome::NoData`.
pub fn summarize_history(
    system_id: &SystemId,
    history: &[StateSnapshot],
    milestone_count: usize,
) -> SummaryOutcome {
    let (Some(initial), Some(latest)) = (history.first(), history.last()) else {
        return SummaryOutcome::NoData {
            system_id: system_id.clone(),
        };
    };

    SummaryOutcome::Available(Summary {
        system_id: system_id.clone(),
        current_level: latest.level,
        initial_level: initial.level,
        total_improvement: latest.level - initial.level,
        phase: latest.phase.clone(),
        milestone_count,
        tracking_duration_secs: as_secs_f64(latest.timestamp - initial.timestamp),
        latest_emotional_state: latest.emotional_state.clone(),
    })
}

/// Seconds with sub-second precision; falls back to millisecond precision
/// for spans too large to count in nanoseconds.
fn as_secs_f64(delta: TimeDelta) -> f64 {
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}
