//! HistoryStore — per-subsystem snapshot history with milestone detection
//!
//! Each subsystem owns one append-only history and one append-only milestone
//! list. Recording appends, then evaluates the last pair, while holding that
//! subsystem's map entry, so detection never races a concurrent append to the
//! same history. Different subsystems live in different entries.

use crate::config::TrackerConfig;
use crate::detect::{self, LEVEL_LEAP_THRESHOLD};
use crate::export;
use crate::summary::summarize_history;
use dashmap::DashMap;
use levelwatch_core::{
    Error, ExportDocument, HistoryRecord, Milestone, Result, StateSnapshot, SummaryOutcome,
    SystemId,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct SystemTrack {
    history: Vec<StateSnapshot>,
    milestones: Vec<Milestone>,
}

impl SystemTrack {
    fn append(&mut self, snapshot: StateSnapshot) {
        self.history.push(snapshot);
    }

    fn detect(&mut self, threshold: f64) -> Option<&Milestone> {
        let milestone = detect::evaluate_last_pair(&self.history, threshold)?;
        self.milestones.push(milestone);
        self.milestones.last()
    }
}

pub struct HistoryStore {
    tracks: DashMap<SystemId, SystemTrack>,
    active: AtomicBool,
    threshold: f64,
    pretty_export: bool,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    /// An inactive store with the default threshold.
    pub fn new() -> Self {
        Self {
            tracks: DashMap::new(),
            active: AtomicBool::new(false),
            threshold: LEVEL_LEAP_THRESHOLD,
            pretty_export: true,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            tracks: DashMap::new(),
            active: AtomicBool::new(config.tracking.start_active),
            threshold: config.milestones.threshold,
            pretty_export: config.export.pretty,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn enable(&self) {
        self.active.store(true, Ordering::SeqCst);
        info!("State tracking started");
    }

    pub fn disable(&self) {
        self.active.store(false, Ordering::SeqCst);
        info!("State tracking stopped");
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Append a snapshot to its subsystem's history and run milestone detection.
    /// While tracking is disabled this does nothing and logs nothing.
    pub fn record(&self, snapshot: StateSnapshot) {
        self.try_record(snapshot);
    }

    /// Same as `record`, reporting whether the snapshot was appended.
    pub fn try_record(&self, snapshot: StateSnapshot) -> bool {
        if !self.is_active() {
            return false;
        }

        let system_id = snapshot.system_id.clone();
        let mut track = self.tracks.entry(system_id.clone()).or_default();
        track.append(snapshot);
        if let Some(m) = track.detect(self.threshold) {
            info!(
                "Milestone detected for {}: {:?} delta={} new_level={} at {}",
                system_id,
                m.kind,
                m.delta,
                m.new_level,
                m.timestamp.to_rfc3339()
            );
        }
        drop(track);

        info!("Recorded state for {}", system_id);
        true
    }

    pub fn summarize(&self, system_id: &str) -> SummaryOutcome {
        let id = SystemId::new(system_id);
        let outcome = match self.tracks.get(system_id) {
            Some(track) => summarize_history(&id, &track.history, track.milestones.len()),
            None => summarize_history(&id, &[], 0),
        };
        debug!("Summarized {} (no_data={})", id, outcome.is_no_data());
        outcome
    }

    /// Copy of a subsystem's history, oldest first. Empty if unknown.
    pub fn history(&self, system_id: &str) -> Vec<StateSnapshot> {
        self.tracks
            .get(system_id)
            .map(|t| t.history.clone())
            .unwrap_or_default()
    }

    /// Copy of a subsystem's milestones in detection order. Empty if unknown.
    pub fn milestones(&self, system_id: &str) -> Vec<Milestone> {
        self.tracks
            .get(system_id)
            .map(|t| t.milestones.clone())
            .unwrap_or_default()
    }

    /// Tracked subsystem ids, sorted.
    pub fn system_ids(&self) -> Vec<SystemId> {
        let mut ids: Vec<SystemId> = self.tracks.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Build the export document. An unknown subsystem gives empty lists.
    pub fn export_document(&self, system_id: &str) -> ExportDocument {
        let id = SystemId::new(system_id);
        match self.tracks.get(system_id) {
            Some(track) => ExportDocument {
                system_id: id,
                history: track.history.iter().map(HistoryRecord::from).collect(),
                milestones: track.milestones.clone(),
            },
            None => ExportDocument {
                system_id: id,
                history: Vec::new(),
                milestones: Vec::new(),
            },
        }
    }

    /// Write a subsystem's export document to `path`, replacing any existing file.
    /// Write failures are returned as-is.
    pub fn export(&self, system_id: &str, path: &Path) -> Result<()> {
        let document = self.export_document(system_id);
        export::write_document(&document, path, self.pretty_export)?;
        info!("Exported {} to {}", system_id, path.display());
        Ok(())
    }

    /// Restore a previously exported subsystem. Works whether or not tracking
    /// is enabled and refuses ids the store already holds.
    ///
    /// The document's milestones must be exactly the ones this store's
    /// threshold derives from the document's history, pair by pair.
    pub fn import(&self, document: ExportDocument) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        let history = document.snapshots();
        if detect::derive_milestones(&history, self.threshold) != document.milestones {
            return Err(Error::InconsistentMilestones(document.system_id));
        }

        match self.tracks.entry(document.system_id.clone()) {
            Entry::Occupied(_) => Err(Error::AlreadyTracked(document.system_id)),
            Entry::Vacant(slot) => {
                info!(
                    "Imported {} snapshots and {} milestones for {}",
                    history.len(),
                    document.milestones.len(),
                    document.system_id
                );
                slot.insert(SystemTrack {
                    history,
                    milestones: document.milestones,
                });
                Ok(())
            }
        }
    }
}
