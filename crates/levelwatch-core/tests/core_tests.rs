//! Tests for levelwatch-core: identifiers, snapshot/milestone serde, export document, errors

use chrono::{TimeZone, Utc};
use levelwatch_core::*;

fn ts(secs: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
}

// ===========================================================================
// SystemId
// ===========================================================================

#[test]
fn system_id_new_and_display() {
    let id = SystemId::new("sys-a");
    assert_eq!(id.as_str(), "sys-a");
    assert_eq!(format!("{}", id), "sys-a");
}

#[test]
fn system_id_from_string() {
    let id: SystemId = "engine".into();
    assert_eq!(id.as_str(), "engine");
    let id2: SystemId = String::from("planner").into();
    assert_eq!(id2.as_str(), "planner");
}

#[test]
fn system_id_serializes_as_bare_string() {
    let id = SystemId::new("sys-a");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"sys-a\"");
    let back: SystemId = serde_json::from_str("\"sys-a\"").unwrap();
    assert_eq!(back, id);
}

#[test]
fn system_id_orders_lexically() {
    let mut ids = vec![SystemId::new("b"), SystemId::new("a"), SystemId::new("c")];
    ids.sort();
    let names: Vec<&str> = ids.iter().map(|i| i.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

// ===========================================================================
// StateSnapshot
// ===========================================================================

#[test]
fn snapshot_builder_fills_bags() {
    let s = StateSnapshot::new("sys-a", ts(0), 0.75)
        .with_emotion("empathy", 0.8)
        .with_metric("reasoning", 0.85)
        .with_metric("stage", "warm")
        .with_phase("advanced_integration");

    assert_eq!(s.system_id.as_str(), "sys-a");
    assert_eq!(s.level, 0.75);
    assert_eq!(s.emotional_state["empathy"], 0.8);
    assert_eq!(s.cognitive_metrics["reasoning"], serde_json::json!(0.85));
    assert_eq!(s.cognitive_metrics["stage"], serde_json::json!("warm"));
    assert_eq!(s.phase, "advanced_integration");
}

#[test]
fn snapshot_accepts_out_of_range_level() {
    let s = StateSnapshot::new("sys-a", ts(0), -42.0);
    assert_eq!(s.level, -42.0);
    let s = StateSnapshot::new("sys-a", ts(0), 17.5);
    assert_eq!(s.level, 17.5);
}

#[test]
fn snapshot_deserializes_with_missing_bags() {
    let json = r#"{"system_id":"sys-a","timestamp":"2026-01-01T00:00:00Z","level":0.5}"#;
    let s: StateSnapshot = serde_json::from_str(json).unwrap();
    assert_eq!(s.system_id.as_str(), "sys-a");
    assert!(s.emotional_state.is_empty());
    assert!(s.cognitive_metrics.is_empty());
    assert_eq!(s.phase, "");
}

// ===========================================================================
// Milestone
// ===========================================================================

#[test]
fn milestone_kind_wire_name() {
    let json = serde_json::to_string(&MilestoneKind::LevelLeap).unwrap();
    assert_eq!(json, "\"level_leap\"");
}

#[test]
fn milestone_level_leap_fields() {
    let m = Milestone::level_leap(ts(5), 0.15, 0.65);
    assert_eq!(m.kind, MilestoneKind::LevelLeap);
    assert_eq!(m.timestamp, ts(5));
    assert_eq!(m.delta, 0.15);
    assert_eq!(m.new_level, 0.65);

    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v["kind"], "level_leap");
    assert_eq!(v["new_level"], 0.65);
}

// ===========================================================================
// SummaryOutcome
// ===========================================================================

#[test]
fn summary_outcome_no_data_is_distinguishable() {
    let outcome = SummaryOutcome::NoData { system_id: "unknown".into() };
    assert!(outcome.is_no_data());
    assert!(outcome.summary().is_none());

    let v = serde_json::to_value(&outcome).unwrap();
    assert_eq!(v["status"], "no_data");
    assert_eq!(v["system_id"], "unknown");
}

#[test]
fn summary_outcome_available_is_tagged() {
    let summary = Summary {
        system_id: "sys-a".into(),
        current_level: 0.65,
        initial_level: 0.5,
        total_improvement: 0.15,
        phase: "growth".into(),
        milestone_count: 1,
        tracking_duration_secs: 60.0,
        latest_emotional_state: Default::default(),
    };
    let outcome = SummaryOutcome::Available(summary.clone());
    assert!(!outcome.is_no_data());
    assert_eq!(outcome.summary(), Some(&summary));

    let v = serde_json::to_value(&outcome).unwrap();
    assert_eq!(v["status"], "available");
    assert_eq!(v["milestone_count"], 1);

    assert_eq!(outcome.into_summary(), Some(summary));
}

// ===========================================================================
// ExportDocument
// ===========================================================================

#[test]
fn export_document_field_names_are_stable() {
    let snap = StateSnapshot::new("sys-a", ts(0), 0.5).with_phase("seed");
    let doc = ExportDocument {
        system_id: "sys-a".into(),
        history: vec![HistoryRecord::from(&snap)],
        milestones: vec![Milestone::level_leap(ts(1), 0.2, 0.7)],
    };
    let v: serde_json::Value = serde_json::from_str(&doc.to_json(true).unwrap()).unwrap();

    assert_eq!(v["system_id"], "sys-a");
    let entry = &v["history"][0];
    for key in ["timestamp", "level", "emotional_state", "cognitive_metrics", "phase"] {
        assert!(entry.get(key).is_some(), "history entry missing {}", key);
    }
    assert!(entry.get("system_id").is_none());
    let milestone = &v["milestones"][0];
    for key in ["kind", "timestamp", "delta", "new_level"] {
        assert!(milestone.get(key).is_some(), "milestone missing {}", key);
    }
}

#[test]
fn export_document_timestamps_are_iso8601() {
    let snap = StateSnapshot::new("sys-a", ts(0), 0.5);
    let doc = ExportDocument {
        system_id: "sys-a".into(),
        history: vec![HistoryRecord::from(&snap)],
        milestones: vec![],
    };
    let v: serde_json::Value = serde_json::from_str(&doc.to_json(false).unwrap()).unwrap();
    let rendered = v["history"][0]["timestamp"].as_str().unwrap();
    let parsed = chrono::DateTime::parse_from_rfc3339(rendered).unwrap();
    assert_eq!(parsed.with_timezone(&Utc), ts(0));
}

#[test]
fn export_document_snapshots_reattach_system_id() {
    let a = StateSnapshot::new("sys-a", ts(0), 0.5).with_emotion("calm", 0.3);
    let b = StateSnapshot::new("sys-a", ts(10), 0.9).with_metric("depth", 3);
    let doc = ExportDocument {
        system_id: "sys-a".into(),
        history: vec![HistoryRecord::from(&a), HistoryRecord::from(&b)],
        milestones: vec![],
    };
    assert_eq!(doc.snapshots(), vec![a, b]);
}

#[test]
fn export_document_keeps_non_finite_values() {
    let up = StateSnapshot::new("sys-a", ts(0), f64::INFINITY).with_emotion("dread", f64::NAN);
    let down = StateSnapshot::new("sys-a", ts(1), f64::NEG_INFINITY);
    let doc = ExportDocument {
        system_id: "sys-a".into(),
        history: vec![HistoryRecord::from(&up), HistoryRecord::from(&down)],
        milestones: vec![Milestone::level_leap(ts(1), f64::INFINITY, f64::INFINITY)],
    };
    let json = doc.to_json(true).unwrap();
    assert!(!json.contains("null"));

    let back = ExportDocument::from_json(&json).unwrap();
    assert_eq!(back.history[0].level, f64::INFINITY);
    assert!(back.history[0].emotional_state["dread"].is_nan());
    assert_eq!(back.history[1].level, f64::NEG_INFINITY);
    assert_eq!(back.milestones, doc.milestones);
}

#[test]
fn summary_outcome_with_non_finite_levels_parses_back() {
    let outcome = SummaryOutcome::Available(Summary {
        system_id: "sys-a".into(),
        current_level: f64::INFINITY,
        initial_level: 0.5,
        total_improvement: f64::INFINITY,
        phase: String::new(),
        milestone_count: 1,
        tracking_duration_secs: 1.0,
        latest_emotional_state: Default::default(),
    });
    let json = serde_json::to_string(&outcome).unwrap();
    let back: SummaryOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome);
}

#[test]
fn export_document_parse_tolerates_missing_lists() {
    let doc = ExportDocument::from_json(r#"{"system_id":"empty"}"#).unwrap();
    assert_eq!(doc.system_id.as_str(), "empty");
    assert!(doc.history.is_empty());
    assert!(doc.milestones.is_empty());
}

// ===========================================================================
// Error
// ===========================================================================

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let e: Error = io_err.into();
    assert!(matches!(e, Error::Io(_)));
    assert!(e.to_string().contains("denied"));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let e: Error = json_err.into();
    assert!(matches!(e, Error::Json(_)));
}

#[test]
fn error_parse_names_line() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let e = Error::parse(7, json_err);
    assert!(e.to_string().contains("line 7"));
}

#[test]
fn error_display_all_variants() {
    let errors: Vec<Error> = vec![
        Error::AlreadyTracked("sys-a".into()),
        Error::InconsistentMilestones("sys-a".into()),
        Error::config("bad threshold"),
    ];
    for e in errors {
        assert!(!e.to_string().is_empty());
    }
}
