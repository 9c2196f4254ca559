use hostel_config::{AppConfig, ConfigError};

// 环境变量为进程级共享状态，所有场景放在同一个测试中顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::remove_var("HOSTEL_JWT_SECRET");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Missing(key)) if key == "HOSTEL_JWT_SECRET"
    ));

    unsafe {
        std::env::set_var("HOSTEL_JWT_SECRET", "secret");
        std::env::set_var("HOSTEL_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("HOSTEL_BLOB_FOLDER", "/campus/");
        std::env::remove_var("HOSTEL_DATABASE_URL");
        std::env::remove_var("HOSTEL_ISSUE_LIST_LIMIT");
        std::env::remove_var("HOSTEL_MAX_IMAGE_BYTES");
    }
    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.jwt_secret, "secret");
    assert!(config.database_url.is_none());
    assert_eq!(config.blob.folder, "campus");
    assert_eq!(config.blob.max_image_bytes, 5 * 1024 * 1024);
    assert_eq!(config.issue_list_limit, 100);

    unsafe {
        std::env::set_var("HOSTEL_ISSUE_LIST_LIMIT", "many");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid(key, _)) if key == "HOSTEL_ISSUE_LIST_LIMIT"
    ));
    unsafe {
        std::env::remove_var("HOSTEL_ISSUE_LIST_LIMIT");
    }
}
