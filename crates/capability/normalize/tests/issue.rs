use domain::{IssueStatus, IssueType, Provenance};
use hostel_normalize::{ParentContext, SourceKind, embedded_issues, normalize_issue};
use serde_json::{Map, Value, json};

const NOW: i64 = 1_800_000_000_000;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn student() -> Map<String, Value> {
    object(json!({
        "name": "Kabir",
        "hostelDetails": { "hostelId": "H1", "floor": "F2", "room": "201" }
    }))
}

fn parent() -> ParentContext {
    ParentContext::from_student("stu-2", &student())
}

#[test]
fn type_defaults_from_source_kind() {
    let raw = object(json!({ "id": "a", "message": "noise" }));
    let complaint = normalize_issue(&raw, SourceKind::EmbeddedComplaint, &parent(), NOW);
    assert_eq!(complaint.issue_type, IssueType::Complaint);
    assert!(complaint.category.is_none());

    let maintenance = normalize_issue(&raw, SourceKind::EmbeddedMaintenance, &parent(), NOW);
    assert_eq!(maintenance.issue_type, IssueType::Maintenance);
    assert_eq!(maintenance.category.as_deref(), Some("general"));

    let explicit = object(json!({ "id": "b", "type": "maintenance", "category": "plumbing" }));
    let issue = normalize_issue(&explicit, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.issue_type, IssueType::Maintenance);
    assert_eq!(issue.category.as_deref(), Some("plumbing"));
}

#[test]
fn solved_flags_are_ored() {
    for raw in [
        json!({ "id": "x", "solved": true }),
        json!({ "id": "x", "isSolved": true }),
        json!({ "id": "x", "solved": false, "isSolved": true }),
        json!({ "id": "x", "status": "resolved" }),
    ] {
        let issue = normalize_issue(&object(raw), SourceKind::EmbeddedIssue, &parent(), NOW);
        assert!(issue.solved);
        assert_eq!(issue.status, IssueStatus::Resolved);
    }
    let open = normalize_issue(&object(json!({ "id": "y" })), SourceKind::EmbeddedIssue, &parent(), NOW);
    assert!(!open.solved);
    assert_eq!(open.status, IssueStatus::Open);
}

#[test]
fn in_progress_status_is_kept_when_unsolved() {
    let raw = object(json!({ "id": "x", "status": "in-progress" }));
    let issue = normalize_issue(&raw, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.status, IssueStatus::InProgress);
    assert!(issue.is_consistent());
}

#[test]
fn timestamp_precedence() {
    let native = object(json!({
        "id": "x",
        "timestamp": { "_seconds": 1_717_000_000, "_nanoseconds": 500_000_000 },
        "date": "2020-01-01"
    }));
    let issue = normalize_issue(&native, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, 1_717_000_000_500);

    let dated = object(json!({ "id": "x", "date": "2024-05-30T22:15:00Z" }));
    let issue = normalize_issue(&dated, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, 1_717_107_300_000);

    let day = object(json!({ "id": "x", "date": "1970-01-02" }));
    let issue = normalize_issue(&day, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, 86_400_000);
}

#[test]
fn malformed_timestamp_falls_back_to_now() {
    let raw = object(json!({ "id": "x", "timestamp": "yesterday-ish", "date": { "weird": true } }));
    let issue = normalize_issue(&raw, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, NOW);
}

#[test]
fn out_of_range_timestamps_do_not_overflow() {
    let huge = object(json!({ "id": "x", "timestamp": { "_seconds": 100_000_000_000_000_000_i64 } }));
    let issue = normalize_issue(&huge, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, NOW);

    let minimum = object(json!({ "id": "x", "date": i64::MIN }));
    let issue = normalize_issue(&minimum, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, i64::MIN);

    let negative = object(json!({ "id": "x", "date": -5_000_000_000_000_000_i64 }));
    let issue = normalize_issue(&negative, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.timestamp_utc, -5_000_000_000_000_000);
}

#[test]
fn small_complete_date_is_kept_as_millis() {
    let raw = object(json!({ "id": "x", "solved": true, "completeDate": 5_000 }));
    let issue = normalize_issue(&raw, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.complete_date, Some(5_000));
}

#[test]
fn location_fallback_chain() {
    let own = object(json!({ "id": "x", "room": "999", "hostelDetails": { "floor": "F7" } }));
    let issue = normalize_issue(&own, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.room.as_deref(), Some("999"));
    assert_eq!(issue.floor.as_deref(), Some("F7"));
    assert_eq!(issue.hostel.as_deref(), Some("H1"));
}

#[test]
fn student_identity_comes_from_parent() {
    let raw = object(json!({ "id": "x", "studentName": "Stale Name", "studentId": "other" }));
    let issue = normalize_issue(&raw, SourceKind::EmbeddedIssue, &parent(), NOW);
    assert_eq!(issue.student_id, "stu-2");
    assert_eq!(issue.student_name, "Kabir");
    assert_eq!(issue.author_id, "stu-2");

    let raw = object(json!({ "id": "x", "userId": "u-9" }));
    let issue = normalize_issue(&raw, SourceKind::Standalone, &ParentContext::detached("u-9"), NOW);
    assert_eq!(issue.author_id, "u-9");
}

#[test]
fn missing_id_is_deterministic() {
    let raw = object(json!({ "message": "Leaking tap", "date": "2024-06-01T08:00:00Z" }));
    let first = normalize_issue(&raw, SourceKind::EmbeddedMaintenance, &parent(), NOW);
    let second = normalize_issue(&raw, SourceKind::EmbeddedMaintenance, &parent(), NOW + 5);
    assert!(!first.id.is_empty());
    assert_eq!(first.id, second.id);
}

#[test]
fn normalization_is_idempotent() {
    let shapes = [
        (json!({ "message": "a", "isSolved": true, "completeDate": 1_717_000_000_000_i64 }), SourceKind::EmbeddedComplaint),
        (json!({ "id": "m", "message": "b", "date": "2024-06-01" }), SourceKind::EmbeddedMaintenance),
        (json!({ "id": "i", "type": "maintenance", "timestamp": { "seconds": 5, "nanoseconds": 0 }, "status": "in_progress" }), SourceKind::EmbeddedIssue),
        (json!({ "id": "s", "userId": "stu-2", "status": "resolved", "hostelDetails": { "room": "7" } }), SourceKind::Standalone),
        (json!({ "id": "c", "solved": true, "completeDate": { "_seconds": 5, "_nanoseconds": 0 } }), SourceKind::EmbeddedIssue),
    ];
    for (raw, kind) in shapes {
        let once = normalize_issue(&object(raw), kind, &parent(), NOW);
        let reserialized = object(serde_json::to_value(&once).expect("serialize"));
        let twice = normalize_issue(&reserialized, kind, &parent(), NOW + 1_000);
        assert_eq!(once, twice);
        assert!(once.is_consistent());
    }
}

#[test]
fn embedded_issues_flattens_all_arrays() {
    let mut data = student();
    data.insert("issues".to_string(), json!([{ "id": "i1", "type": "complaint" }, "garbage"]));
    data.insert("complaints".to_string(), json!([{ "id": "c1" }]));
    data.insert("maintenance".to_string(), json!([{ "id": "m1", "category": "electrical" }]));

    let issues = embedded_issues("stu-2", &data, NOW);
    let ids: Vec<_> = issues.iter().map(|item| item.issue.id.as_str()).collect();
    assert_eq!(ids, vec!["i1", "c1", "m1"]);
    assert!(issues.iter().all(|item| item.provenance.is_embedded()));
    assert_eq!(
        issues[2].provenance,
        Provenance::Embedded { parent_id: "stu-2".to_string(), field: "maintenance".to_string() }
    );
    assert_eq!(issues[2].issue.issue_type, IssueType::Maintenance);
}
