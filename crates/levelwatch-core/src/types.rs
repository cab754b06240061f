//! Core types for Levelwatch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Subsystem identifier - cheaply cloneable
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SystemId(Arc<str>);

impl SystemId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(Arc::from(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SystemId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SystemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for SystemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for SystemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SystemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// One observation of a subsystem's metric state. Immutable once recorded.
///
/// Nothing here is validated: `level` has no enforced range and `phase` is a
/// free-form label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub system_id: SystemId,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "crate::float::value")]
    pub level: f64,
    #[serde(default, with = "crate::float::map")]
    pub emotional_state: BTreeMap<String, f64>,
    #[serde(default)]
    pub cognitive_metrics: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub phase: String,
}

impl StateSnapshot {
    pub fn new(system_id: impl Into<SystemId>, timestamp: DateTime<Utc>, level: f64) -> Self {
        Self {
            system_id: system_id.into(),
            timestamp,
            level,
            emotional_state: BTreeMap::new(),
            cognitive_metrics: BTreeMap::new(),
            phase: String::new(),
        }
    }

    pub fn with_emotion(mut self, label: impl Into<String>, value: f64) -> Self {
        self.emotional_state.insert(label.into(), value);
        self
    }

    pub fn with_metric(
        mut self,
        label: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.cognitive_metrics.insert(label.into(), value.into());
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }
}

/// Milestone kind. Only level leaps are detected today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    LevelLeap,
}

/// A significant upward jump between two consecutive snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub timestamp: DateTime<Utc>,
    #[serde(with = "crate::float::value")]
    pub delta: f64,
    #[serde(with = "crate::float::value")]
    pub new_level: f64,
}

impl Milestone {
    pub fn level_leap(timestamp: DateTime<Utc>, delta: f64, new_level: f64) -> Self {
        Self {
            kind: MilestoneKind::LevelLeap,
            timestamp,
            delta,
            new_level,
        }
    }
}

/// Trajectory summary computed from the first and last snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub system_id: SystemId,
    #[serde(with = "crate::float::value")]
    pub current_level: f64,
    #[serde(with = "crate::float::value")]
    pub initial_level: f64,
    #[serde(with = "crate::float::value")]
    pub total_improvement: f64,
    pub phase: String,
    pub milestone_count: usize,
    #[serde(with = "crate::float::value")]
    pub tracking_duration_secs: f64,
    #[serde(with = "crate::float::map")]
    pub latest_emotional_state: BTreeMap<String, f64>,
}

/// Result of summarizing a subsystem. Missing data is a value, not an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Available(Summary),
    NoData { system_id: SystemId },
}

impl SummaryOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Self::Available(summary) => Some(summary),
            Self::NoData { .. } => None,
        }
    }

    pub fn into_summary(self) -> Option<Summary> {
        match self {
            Self::Available(summary) => Some(summary),
            Self::NoData { .. } => None,
        }
    }
}

/// A history entry as written to an export document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(with = "crate::float::value")]
    pub level: f64,
    #[serde(default, with = "crate::float::map")]
    pub emotional_state: BTreeMap<String, f64>,
    #[serde(default)]
    pub cognitive_metrics: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub phase: String,
}

impl HistoryRecord {
    pub fn into_snapshot(self, system_id: SystemId) -> StateSnapshot {
        StateSnapshot {
            system_id,
            timestamp: self.timestamp,
            level: self.level,
            emotional_state: self.emotional_state,
            cognitive_metrics: self.cognitive_metrics,
            phase: self.phase,
        }
    }
}

impl From<&StateSnapshot> for HistoryRecord {
    fn from(s: &StateSnapshot) -> Self {
        Self {
            timestamp: s.timestamp,
            level: s.level,
            emotional_state: s.emotional_state.clone(),
            cognitive_metrics: s.cognitive_metrics.clone(),
            phase: s.phase.clone(),
        }
    }
}

/// Export file shape: `{ system_id, history: [...], milestones: [...] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub system_id: SystemId,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl ExportDocument {
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild full snapshots, re-attaching the document's system id.
    pub fn snapshots(&self) -> Vec<StateSnapshot> {
        self.history
            .iter()
            .cloned()
            .map(|r| r.into_snapshot(self.system_id.clone()))
            .collect()
    }
}
