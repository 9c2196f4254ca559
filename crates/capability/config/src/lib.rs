//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 对象存储上传配置。
#[derive(Debug, Clone)]
pub struct BlobConfig {
    /// 未配置时使用内存对象存储。
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub folder: String,
    pub max_image_bytes: usize,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未配置时使用内存文档存储并写入演示数据。
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub blob: BlobConfig,
    pub issue_list_limit: usize,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = read_optional("HOSTEL_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("HOSTEL_JWT_SECRET".to_string()))?;
        let jwt_issuer = read_optional("HOSTEL_JWT_ISSUER");
        let http_addr =
            read_optional("HOSTEL_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let database_url = read_optional("HOSTEL_DATABASE_URL");
        let blob = BlobConfig {
            endpoint: read_optional("HOSTEL_BLOB_ENDPOINT"),
            api_key: read_optional("HOSTEL_BLOB_API_KEY"),
            folder: read_optional("HOSTEL_BLOB_FOLDER")
                .map(|folder| folder.trim_matches('/').to_string())
                .filter(|folder| !folder.is_empty())
                .unwrap_or_else(|| "hostel".to_string()),
            max_image_bytes: read_usize_with_default("HOSTEL_MAX_IMAGE_BYTES", 5 * 1024 * 1024)?,
        };
        let issue_list_limit = read_usize_with_default("HOSTEL_ISSUE_LIST_LIMIT", 100)?;
        if issue_list_limit == 0 {
            return Err(ConfigError::Invalid(
                "HOSTEL_ISSUE_LIST_LIMIT".to_string(),
                "0".to_string(),
            ));
        }

        Ok(Self {
            http_addr,
            database_url,
            jwt_secret,
            jwt_issuer,
            blob,
            issue_list_limit,
        })
    }
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match read_optional(key) {
        Some(value) => value,
        None => return Ok(default),
    };
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}
