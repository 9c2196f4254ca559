use domain::HostelError;
use hostel_blob::{
    BlobError, BlobStore, InMemoryBlobStore, decode_image, ensure_public_id, room_folder,
};

#[test]
fn decodes_data_uri_and_raw_base64() {
    let image = decode_image("data:image/png;base64,aGVsbG8=", 1024).expect("decoded");
    assert_eq!(image.bytes, b"hello");
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.to_data_uri(), "data:image/png;base64,aGVsbG8=");

    let raw = decode_image("  aGVsbG8=  ", 1024).expect("decoded");
    assert_eq!(raw.content_type, "image/jpeg");
}

#[test]
fn rejects_bad_images() {
    assert!(matches!(
        decode_image("data:text/plain;base64,aGVsbG8=", 1024),
        Err(BlobError::InvalidImage(_))
    ));
    assert!(matches!(
        decode_image("data:image/png,hello", 1024),
        Err(BlobError::InvalidImage(_))
    ));
    assert!(matches!(decode_image("%%%", 1024), Err(BlobError::InvalidImage(_))));
    assert!(matches!(decode_image("", 1024), Err(BlobError::InvalidImage(_))));
    assert_eq!(
        decode_image("aGVsbG8=", 4),
        Err(BlobError::TooLarge { size: 5, max: 4 })
    );
}

#[test]
fn errors_map_to_service_errors() {
    assert!(matches!(
        HostelError::from(BlobError::TooLarge { size: 9, max: 4 }),
        HostelError::InvalidInput(_)
    ));
    assert_eq!(
        HostelError::from(BlobError::Upload("cdn down".to_string())),
        HostelError::Upstream("cdn down".to_string())
    );
}

#[test]
fn folders_and_ids() {
    assert_eq!(room_folder("/hostel/", "H1-101"), "hostel/rooms/H1-101");
    assert_eq!(room_folder("", "H1-101"), "rooms/H1-101");
    assert!(ensure_public_id("front_view-1").is_ok());
    assert!(ensure_public_id("../etc").is_err());
    assert!(ensure_public_id("").is_err());
}

#[tokio::test]
async fn in_memory_store_keeps_objects() {
    let store = InMemoryBlobStore::new();
    let image = decode_image("aGVsbG8=", 1024).expect("decoded");
    let uploaded = store
        .upload(&image, "hostel/rooms/H1-101", "front")
        .await
        .expect("uploaded");
    assert_eq!(uploaded.secure_url, "memory://hostel/rooms/H1-101/front");
    assert_eq!(store.object("hostel/rooms/H1-101/front"), Some(image));
    assert_eq!(store.len(), 1);
}
