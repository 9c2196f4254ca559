//! 图片上传适配。
//!
//! 房间图片以 base64 或 data URI 形式提交，解码并校验大小后交给 [`BlobStore`]。
//! 生产环境使用 [`HttpBlobStore`] 上传到外部对象存储 / CDN，
//! 本地与测试使用 [`InMemoryBlobStore`]。

mod http;
mod image;
mod in_memory;

pub use http::HttpBlobStore;
pub use image::{DecodedImage, decode_image};
pub use in_memory::InMemoryBlobStore;

use async_trait::async_trait;
use domain::HostelError;

/// 上传错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlobError {
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("upload failed: {0}")]
    Upload(String),
}

impl From<BlobError> for HostelError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::Upload(message) => HostelError::Upstream(message),
            other => HostelError::InvalidInput(format!("image: {other}")),
        }
    }
}

/// 上传结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedBlob {
    pub secure_url: String,
}

/// 对象存储抽象。
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 上传到 `folder/public_id`，返回可公开访问的 URL。
    async fn upload(
        &self,
        image: &DecodedImage,
        folder: &str,
        public_id: &str,
    ) -> Result<UploadedBlob, BlobError>;
}

/// 房间图片目录：`<root>/rooms/<roomId>`。
pub fn room_folder(root: &str, room_id: &str) -> String {
    let root = root.trim_matches('/');
    if root.is_empty() {
        format!("rooms/{room_id}")
    } else {
        format!("{root}/rooms/{room_id}")
    }
}

/// 校验上传 ID：仅允许字母、数字、`-`、`_`。
pub fn ensure_public_id(public_id: &str) -> Result<(), BlobError> {
    let valid = !public_id.is_empty()
        && public_id.len() <= 128
        && public_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidImage(format!("invalid public id: {public_id}")))
    }
}
