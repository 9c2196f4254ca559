use crate::AppState;
use crate::middleware::{require_identity, require_permission};
use crate::utils::{
    bad_request_error, floor_to_dto, hostel_to_dto, normalize_optional, normalize_required,
    service_error,
};
use api_contract::{ApiResponse, CreateStaffRequest, FloorDto, HostelDto, PeopleResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{Action, Person, Resource, Role, SearchTarget};
use hostel_dashboard::NewStaff;

fn people_response(items: Vec<Person>) -> Response {
    let count = items.len();
    (
        StatusCode::OK,
        Json(ApiResponse::success(PeopleResponse { items, count })),
    )
        .into_response()
}

/// 路径中的员工角色，接受单数角色名或复数集合名。
fn staff_role(value: &str) -> Option<Role> {
    Role::parse(value)
        .or_else(|| SearchTarget::parse(value).and_then(|target| target.role()))
        .filter(Role::is_staff)
}

pub async fn list_students(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Student) {
        return response;
    }
    match state.directory.list_students(&identity).await {
        Ok(items) => people_response(items),
        Err(err) => service_error(err),
    }
}

pub async fn get_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(student_id): Path<String>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Student) {
        return response;
    }
    match state.directory.get_student(&identity, &student_id).await {
        Ok(person) => (StatusCode::OK, Json(ApiResponse::success(person))).into_response(),
        Err(err) => service_error(err),
    }
}

pub async fn list_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(role): Path<String>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let Some(role) = staff_role(&role) else {
        return bad_request_error("invalid role");
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Staff(role)) {
        return response;
    }
    match state.directory.list_staff(&identity, role).await {
        Ok(items) => people_response(items),
        Err(err) => service_error(err),
    }
}

pub async fn create_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(role): Path<String>,
    Json(payload): Json<CreateStaffRequest>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    let Some(role) = staff_role(&role) else {
        return bad_request_error("invalid role");
    };
    if let Err(response) = require_permission(&identity, Action::Create, Resource::Staff(role)) {
        return response;
    }
    let name = match normalize_required(payload.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let email = match normalize_required(payload.email, "email") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let phone = match normalize_optional(payload.phone, "phone") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let new = NewStaff {
        id: payload.id,
        name,
        email,
        phone,
        assigned_hostel: payload.assigned_hostel,
        assigned_floors: payload.assigned_floors,
        reports_to: payload.reports_to,
    };
    match state.directory.create_staff(&identity, role, new).await {
        Ok(person) => (StatusCode::CREATED, Json(ApiResponse::success(person))).into_response(),
        Err(err) => service_error(err),
    }
}

pub async fn list_hostels(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Hostel) {
        return response;
    }
    match state.directory.list_hostels(&identity).await {
        Ok(hostels) => {
            let items: Vec<HostelDto> = hostels.into_iter().map(hostel_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub async fn list_floors(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(hostel_id): Path<String>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Hostel) {
        return response;
    }
    match state.directory.list_floors(&identity, &hostel_id).await {
        Ok(floors) => {
            let items: Vec<FloorDto> = floors
                .into_iter()
                .map(|floor| floor_to_dto(floor, &hostel_id))
                .collect();
            (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
        }
        Err(err) => service_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::staff_role;
    use crate::test_support::{chief, floor_warden, send, student, test_app, token_for};
    use axum::http::StatusCode;
    use domain::{Identity, Role, Scope};
    use serde_json::json;

    fn hostel_warden() -> Identity {
        Identity::new("hw-1", "hw@hostel.test", "Vikram Sethi", Role::HostelWarden)
            .with_scope(Scope::hostel("H1"))
    }

    #[test]
    fn staff_role_accepts_role_and_collection_names() {
        assert_eq!(staff_role("floor_attendant"), Some(Role::FloorAttendant));
        assert_eq!(staff_role("floor-wardens"), Some(Role::FloorWarden));
        assert_eq!(staff_role("student"), None);
        assert_eq!(staff_role("janitor"), None);
    }

    #[tokio::test]
    async fn students_listing_follows_scope() {
        let app = test_app();
        let (status, body) =
            send(&app, "GET", "/students", Some(&token_for(&floor_warden())), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["items"][0]["id"], "stu-1");

        let (status, _) =
            send(&app, "GET", "/students/stu-2", Some(&token_for(&floor_warden())), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/students", Some(&token_for(&student())), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn hostel_warden_creates_floor_attendant() {
        let app = test_app();
        let token = token_for(&hostel_warden());
        let (status, body) = send(
            &app,
            "POST",
            "/staff/floor_attendant",
            Some(&token),
            Some(json!({
                "id": "fa-2",
                "name": "Sunil Pal",
                "email": "sunil@hostel.test",
                "assignedFloors": ["H1-F2"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], "fa-2");
        let stored = app
            .store
            .snapshot(domain::collections::FLOOR_ATTENDANTS, "fa-2")
            .expect("stored");
        assert_eq!(stored["reportsTo"], "hw-1");

        let (status, body) =
            send(&app, "GET", "/staff/floor_attendants", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 2);
    }

    #[tokio::test]
    async fn create_staff_validates_role_and_fields() {
        let app = test_app();
        let token = token_for(&hostel_warden());
        let (status, _) = send(
            &app,
            "POST",
            "/staff/student",
            Some(&token),
            Some(json!({ "name": "x", "email": "x@y" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "POST",
            "/staff/floor_warden",
            Some(&token),
            Some(json!({ "email": "x@y", "assignedFloors": ["H1-F1"] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "name required");

        let (status, _) = send(
            &app,
            "POST",
            "/staff/hostel_warden",
            Some(&token),
            Some(json!({ "name": "x", "email": "x@y", "assignedHostel": "H1" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn hostels_and_floors_for_chief() {
        let app = test_app();
        let token = token_for(&chief());
        let (status, body) = send(&app, "GET", "/hostels", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], "H1");
        assert_eq!(body["data"][0]["totalFloors"], 2);

        let (status, body) = send(&app, "GET", "/hostels/H1/floors", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .expect("floors")
            .iter()
            .filter_map(|floor| floor["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["H1-F1", "H1-F2"]);

        let (status, _) =
            send(&app, "GET", "/hostels", Some(&token_for(&floor_warden())), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
