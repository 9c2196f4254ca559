use crate::AppState;
use crate::middleware::{require_identity, require_permission};
use crate::utils::{normalize_optional, normalize_required, room_to_dto, service_error};
use api_contract::{ApiResponse, RoomDto, UploadImageRequest, UploadImageResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{Action, HostelError, Resource};
use hostel_blob::{decode_image, ensure_public_id, room_folder};
use hostel_telemetry::record_image_upload;

pub async fn list_rooms(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Read, Resource::Room) {
        return response;
    }
    match state.directory.list_rooms(&identity).await {
        Ok(rooms) => {
            let items: Vec<RoomDto> = rooms.into_iter().map(room_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
        }
        Err(err) => service_error(err),
    }
}

/// 上传房间图片并把 URL 追加到房间文档。
pub async fn upload_room_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Json(payload): Json<UploadImageRequest>,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };
    if let Err(response) = require_permission(&identity, Action::Update, Resource::RoomImage) {
        return response;
    }
    let image = match normalize_required(payload.image, "image") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let public_id = match normalize_optional(payload.public_id, "publicId") {
        Ok(value) => value.unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
        Err(response) => return response,
    };

    let room = match state.directory.room_in_scope(&identity, &room_id).await {
        Ok(room) => room,
        Err(err) => return service_error(err),
    };
    let decoded = match decode_image(&image, state.settings.max_image_bytes) {
        Ok(decoded) => decoded,
        Err(err) => return service_error(HostelError::from(err)),
    };
    if let Err(err) = ensure_public_id(&public_id) {
        return service_error(HostelError::from(err));
    }
    let folder = room_folder(&state.settings.blob_folder, &room.id);
    let uploaded = match state.blob.upload(&decoded, &folder, &public_id).await {
        Ok(uploaded) => uploaded,
        Err(err) => return service_error(HostelError::from(err)),
    };
    let images = match state
        .directory
        .append_room_image(&room.id, &uploaded.secure_url)
        .await
    {
        Ok(images) => images,
        Err(err) => return service_error(err),
    };
    record_image_upload();
    tracing::info!(
        target: "hostel.api",
        room_id = %room.id,
        uploaded_by = %identity.id,
        bytes = decoded.bytes.len(),
        "room image uploaded"
    );
    (
        StatusCode::OK,
        Json(ApiResponse::success(UploadImageResponse {
            url: uploaded.secure_url,
            images,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use crate::test_support::{chief, floor_warden, send, student, test_app, token_for};
    use axum::http::StatusCode;
    use serde_json::json;

    // "hello" 的 base64
    const PNG_URI: &str = "data:image/png;base64,aGVsbG8=";

    #[tokio::test]
    async fn rooms_follow_floor_scope() {
        let app = test_app();
        let (status, body) =
            send(&app, "GET", "/rooms", Some(&token_for(&floor_warden())), None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .expect("rooms")
            .iter()
            .filter_map(|room| room["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["H1-101", "H1-102"]);
    }

    #[tokio::test]
    async fn upload_appends_url_to_room() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/rooms/H1-101/images",
            Some(&token_for(&floor_warden())),
            Some(json!({ "image": PNG_URI, "publicId": "front" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["url"], "memory://hostel/rooms/H1-101/front");
        assert_eq!(body["data"]["images"], json!(["memory://hostel/rooms/H1-101/front"]));
        let stored = app
            .blob
            .object("hostel/rooms/H1-101/front")
            .expect("object stored");
        assert_eq!(stored.bytes, b"hello".to_vec());
        assert_eq!(stored.content_type, "image/png");
    }

    #[tokio::test]
    async fn upload_rejects_out_of_scope_room_and_bad_images() {
        let app = test_app();
        let token = token_for(&floor_warden());
        let (status, _) = send(
            &app,
            "POST",
            "/rooms/H1-201/images",
            Some(&token),
            Some(json!({ "image": PNG_URI })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/rooms/H1-101/images",
            Some(&token),
            Some(json!({ "image": "data:text/plain;base64,aGVsbG8=" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let oversized = format!("data:image/png;base64,{}", "QUFB".repeat(400));
        let (status, _) = send(
            &app,
            "POST",
            "/rooms/H1-101/images",
            Some(&token_for(&chief())),
            Some(json!({ "image": oversized })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.blob.is_empty());

        let (status, _) = send(
            &app,
            "POST",
            "/rooms/H1-101/images",
            Some(&token_for(&student())),
            Some(json!({ "image": PNG_URI })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
