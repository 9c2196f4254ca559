//! HTTP 对象存储上传。
//!
//! 请求：`POST <endpoint>`，JSON `{file: <data uri>, folder, publicId}`，
//! 配置了密钥时附带 `Authorization: Bearer <key>`。
//! 响应：JSON 中的 `secure_url`（或 `secureUrl`）。

use crate::{BlobError, BlobStore, DecodedImage, UploadedBlob};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    file: String,
    folder: &'a str,
    public_id: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(alias = "secureUrl")]
    secure_url: String,
}

/// 外部对象存储 / CDN 上传器。
pub struct HttpBlobStore {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpBlobStore {
    pub fn new(http_client: reqwest::Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(
        &self,
        image: &DecodedImage,
        folder: &str,
        public_id: &str,
    ) -> Result<UploadedBlob, BlobError> {
        let body = UploadRequest {
            file: image.to_data_uri(),
            folder,
            public_id,
        };
        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request
            .send()
            .await
            .map_err(|err| BlobError::Upload(format!("transport error: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_string());
            tracing::warn!(target: "hostel.blob", %status, folder, public_id, "blob upload rejected");
            return Err(BlobError::Upload(format!("status {status}: {detail}")));
        }
        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|err| BlobError::Upload(format!("invalid response: {err}")))?;
        tracing::info!(target: "hostel.blob", folder, public_id, bytes = image.bytes.len(), "blob uploaded");
        Ok(UploadedBlob {
            secure_url: uploaded.secure_url,
        })
    }
}
