//! Replay — feed a JSONL stream of snapshots into a HistoryStore
//!
//! Input is one `StateSnapshot` JSON object per line. Blank lines are skipped.
//! A malformed line aborts the parse with its 1-based line number.

use levelwatch_core::{Error, Result, StateSnapshot, SummaryOutcome, SystemId};
use levelwatch_tracker::HistoryStore;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Parse JSONL snapshot lines.
pub fn parse_snapshots(reader: impl BufRead) -> Result<Vec<StateSnapshot>> {
    let mut snapshots = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let snapshot = serde_json::from_str(&line).map_err(|e| Error::parse(idx + 1, e))?;
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

/// Record every snapshot in order. Returns how many the store accepted;
/// snapshots offered while tracking is disabled are not counted.
pub fn replay(store: &HistoryStore, snapshots: Vec<StateSnapshot>) -> usize {
    snapshots
        .into_iter()
        .map(|snapshot| store.try_record(snapshot))
        .filter(|accepted| *accepted)
        .count()
}

/// Parse `path` and replay it into `store`.
pub fn replay_file(store: &HistoryStore, path: &Path) -> Result<usize> {
    let file = std::fs::File::open(path)?;
    let snapshots = parse_snapshots(std::io::BufReader::new(file))?;
    let accepted = replay(store, snapshots);
    info!("Replayed {} snapshots from {}", accepted, path.display());
    Ok(accepted)
}

/// Summaries for every tracked subsystem, in id order.
pub fn summarize_all(store: &HistoryStore) -> Vec<SummaryOutcome> {
    store
        .system_ids()
        .iter()
        .map(|id| store.summarize(id.as_str()))
        .collect()
}

fn file_stem(system_id: &SystemId) -> String {
    let stem: String = system_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("_{}", stem)
    } else {
        stem
    }
}

/// File name used when exporting a subsystem into a directory.
/// Path separators and other awkward characters become `_`.
pub fn export_file_name(system_id: &SystemId) -> String {
    format!("{}.json", file_stem(system_id))
}

/// Export every tracked subsystem into `dir`, creating it if needed.
///
/// Ids that sanitize to the same file name get a `-2`, `-3`, ... suffix in
/// id order, so no export in one call overwrites another.
pub fn export_all(store: &HistoryStore, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut used = HashSet::new();
    let mut written = Vec::new();
    for id in store.system_ids() {
        let stem = file_stem(&id);
        let mut name = format!("{}.json", stem);
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("{}-{}.json", stem, n);
            n += 1;
        }
        if n > 2 {
            warn!("Export name for {} already taken, writing {}", id, name);
        }
        let path = dir.join(name);
        store.export(id.as_str(), &path)?;
        written.push(path);
    }
    Ok(written)
}
