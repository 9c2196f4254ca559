use domain::{Identity, Issue, IssueStatus, IssueType, Role, Scope};

#[test]
fn identity_builds_with_scope() {
    let identity = Identity::new("uid-1", "fw@hostel.test", "Floor Warden", Role::FloorWarden)
        .with_scope(Scope::floors(["F1", "F2"]));

    assert_eq!(identity.id, "uid-1");
    assert_eq!(identity.role, Role::FloorWarden);
    assert_eq!(identity.scope.assigned_floor_ids.len(), 2);
    assert!(identity.scope.assigned_hostel_id.is_none());
}

#[test]
fn role_parse_accepts_claim_variants() {
    assert_eq!(Role::parse("chief_warden"), Some(Role::ChiefWarden));
    assert_eq!(Role::parse("Floor-Attendant"), Some(Role::FloorAttendant));
    assert_eq!(Role::parse(" hostel warden "), Some(Role::HostelWarden));
    assert_eq!(Role::parse("janitor"), None);
    assert_eq!(Role::parse(""), None);
}

#[test]
fn role_collections_match_store_layout() {
    assert_eq!(Role::Student.profile_collection(), "students");
    assert_eq!(Role::FloorWarden.profile_collection(), "floor_wardens");
    assert!(Role::Supervisor.is_hostel_scoped());
    assert!(Role::FloorAttendant.is_floor_scoped());
    assert!(!Role::ChiefWarden.is_staff());
}

#[test]
fn empty_scope_reports_empty() {
    assert!(Scope::default().is_empty());
    assert!(!Scope::hostel("H1").is_empty());
}

#[test]
fn issue_serializes_camel_case() {
    let issue = Issue {
        id: "i-1".to_string(),
        issue_type: IssueType::Maintenance,
        message: "AC broken".to_string(),
        timestamp_utc: 1_700_000_000_000,
        author_id: "s-1".to_string(),
        student_id: "s-1".to_string(),
        student_name: "Asha".to_string(),
        hostel: Some("H1".to_string()),
        floor: Some("F1".to_string()),
        room: Some("101".to_string()),
        category: Some("electrical".to_string()),
        solved: false,
        status: IssueStatus::Open,
        complete_date: None,
    };
    assert!(issue.is_consistent());

    let value = serde_json::to_value(&issue).expect("serialize");
    assert_eq!(value["type"], "maintenance");
    assert_eq!(value["status"], "open");
    assert!(value.get("timestampUtc").is_some());
    assert!(value.get("studentName").is_some());
    assert!(value.get("completeDate").is_none());
}

#[test]
fn inconsistent_issue_detected() {
    let issue = Issue {
        id: "i-2".to_string(),
        issue_type: IssueType::Complaint,
        message: "noise".to_string(),
        timestamp_utc: 0,
        author_id: "s-1".to_string(),
        student_id: "s-1".to_string(),
        student_name: "Asha".to_string(),
        hostel: None,
        floor: None,
        room: None,
        category: None,
        solved: true,
        status: IssueStatus::Open,
        complete_date: None,
    };
    assert!(!issue.is_consistent());
}
