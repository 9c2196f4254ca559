//! 内存对象存储（仅用于本地演示和测试）。

use crate::{BlobError, BlobStore, DecodedImage, UploadedBlob};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// 以 `folder/public_id` 为键保存图片。
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<BTreeMap<String, DecodedImage>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取已上传对象（测试断言使用）。
    pub fn object(&self, path: &str) -> Option<DecodedImage> {
        self.objects.read().ok()?.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        image: &DecodedImage,
        folder: &str,
        public_id: &str,
    ) -> Result<UploadedBlob, BlobError> {
        let path = format!("{}/{public_id}", folder.trim_matches('/'));
        self.objects
            .write()
            .map_err(|_| BlobError::Upload("lock failed".to_string()))?
            .insert(path.clone(), image.clone());
        Ok(UploadedBlob {
            secure_url: format!("memory://{path}"),
        })
    }
}
