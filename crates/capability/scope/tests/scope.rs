use domain::{HostelError, Identity, Person, Role, Scope};
use hostel_scope::{ScopePredicate, scope_floor_ids, scope_for, scoped_students};
use hostel_storage::InMemoryDocumentStore;
use serde_json::json;

fn identity(role: Role, scope: Scope) -> Identity {
    Identity::new("me", "me@hostel.test", "Me", role).with_scope(scope)
}

#[test]
fn chief_warden_sees_everything() {
    let predicate = scope_for(&identity(Role::ChiefWarden, Scope::default())).expect("scope");
    assert_eq!(predicate, ScopePredicate::All);
    assert!(predicate.admits(&Person::empty("anyone", Role::Student)));
}

#[test]
fn floor_roles_fail_closed_without_floors() {
    for role in [Role::FloorWarden, Role::FloorAttendant] {
        let result = scope_for(&identity(role, Scope::default()));
        assert_eq!(result, Err(HostelError::forbidden("no floors assigned")));
        let blank = scope_for(&identity(role, Scope::floors([" "])));
        assert!(matches!(blank, Err(HostelError::Forbidden(_))));
    }
}

#[test]
fn hostel_roles_fail_closed_without_hostel() {
    for role in [Role::Supervisor, Role::HostelWarden] {
        let result = scope_for(&identity(role, Scope::default()));
        assert!(matches!(result, Err(HostelError::Forbidden(_))));
    }
}

#[test]
fn hostel_predicate_matches_resolved_hostel() {
    let predicate = scope_for(&identity(Role::HostelWarden, Scope::hostel("H1"))).expect("scope");
    let mut inside = Person::empty("s1", Role::Student);
    inside.hostel_id = Some("H1".to_string());
    let mut outside = Person::empty("s2", Role::Student);
    outside.hostel_id = Some("H2".to_string());
    assert!(predicate.admits(&inside));
    assert!(!predicate.admits(&outside));
}

#[test]
fn floor_predicate_matches_floor_or_assignment() {
    let predicate = scope_for(&identity(Role::FloorWarden, Scope::floors(["F1"]))).expect("scope");
    let mut student = Person::empty("s1", Role::Student);
    student.floor_id = Some("F1".to_string());
    let mut attendant = Person::empty("fa", Role::FloorAttendant);
    attendant.assigned_floors = vec!["F2".to_string(), "F1".to_string()];
    assert!(predicate.admits(&student));
    assert!(predicate.admits(&attendant));
    assert!(!predicate.admits(&Person::empty("s3", Role::Student)));
    assert!(!predicate.admits_location(Some("H1"), Some("F2")));
}

#[test]
fn student_sees_only_self() {
    let predicate = scope_for(&identity(Role::Student, Scope::default())).expect("scope");
    assert!(predicate.admits(&Person::empty("me", Role::Student)));
    assert!(!predicate.admits(&Person::empty("you", Role::Student)));
    assert!(!predicate.admits_location(Some("H1"), Some("F1")));
}

fn store() -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    store.insert("students", "a", json!({ "hostelId": "H1", "floorId": "F1" }));
    store.insert("students", "b", json!({ "floor": "F2" }));
    store.insert("students", "c", json!({ "hostelDetails": { "hostelId": "H1", "floor": "F1" } }));
    store.insert("students", "d", json!({ "hostelId": "H2", "floorId": "F9" }));
    store.insert("students", "e", json!({ "hostelDetails": { "floorId": "F2" } }));
    store
}

#[tokio::test]
async fn scoped_students_merges_floor_locations() {
    let store = store();
    let predicate = ScopePredicate::Floors(["F1".to_string(), "F2".to_string()].into());
    let docs = scoped_students(&store, &predicate).await.expect("students");
    let ids: Vec<_> = docs.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "e"]);
}

#[tokio::test]
async fn scoped_students_merges_hostel_locations() {
    let store = store();
    let docs = scoped_students(&store, &ScopePredicate::Hostel("H1".to_string()))
        .await
        .expect("students");
    let ids: Vec<_> = docs.iter().map(|doc| doc.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn scoped_students_self_only() {
    let store = store();
    let docs = scoped_students(&store, &ScopePredicate::SelfOnly("d".to_string()))
        .await
        .expect("students");
    assert_eq!(docs.len(), 1);
    let none = scoped_students(&store, &ScopePredicate::SelfOnly("zz".to_string()))
        .await
        .expect("students");
    assert!(none.is_empty());
}

#[tokio::test]
async fn find_profile_falls_back_to_email() {
    use hostel_scope::find_profile;
    let store = InMemoryDocumentStore::new();
    store.insert("students", "legacy", json!({ "email": "me@hostel.test" }));
    let by_email = find_profile(&store, "students", "me", Some("me@hostel.test"))
        .await
        .expect("lookup")
        .expect("found");
    assert_eq!(by_email.id, "legacy");
    let missing = find_profile(&store, "students", "me", None).await.expect("lookup");
    assert!(missing.is_none());
}

#[tokio::test]
async fn staff_are_admitted_through_hostel_floors() {
    let store = InMemoryDocumentStore::new();
    store.insert("floors", "H1-F1", json!({ "hostelId": "H1" }));
    store.insert("floors", "H2-F1", json!({ "hostelId": "H2" }));
    let predicate = ScopePredicate::Hostel("H1".to_string());
    let floors = scope_floor_ids(&store, &predicate).await.expect("floors");
    assert_eq!(floors, ["H1-F1".to_string()].into());

    let mut local = Person::empty("fw-1", Role::FloorWarden);
    local.assigned_floors = vec!["H1-F1".to_string()];
    let mut remote = Person::empty("fw-2", Role::FloorWarden);
    remote.assigned_floors = vec!["H2-F1".to_string()];
    assert!(predicate.admits_staff(&local, &floors));
    assert!(!predicate.admits_staff(&remote, &floors));

    let none = scope_floor_ids(&store, &ScopePredicate::All).await.expect("floors");
    assert!(none.is_empty());
    assert!(ScopePredicate::All.admits_staff(&remote, &none));
    assert!(!ScopePredicate::SelfOnly("fw-2".to_string()).admits_staff(&remote, &none));
}
