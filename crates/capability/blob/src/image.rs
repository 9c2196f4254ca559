use crate::BlobError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// 解码后的图片。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl DecodedImage {
    /// 重新编码为 data URI。
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// 解析 base64 或 `data:image/<type>;base64,<payload>`。
///
/// 纯 base64 输入按 `image/jpeg` 处理；解码后超过 `max_bytes` 返回 `TooLarge`。
pub fn decode_image(input: &str, max_bytes: usize) -> Result<DecodedImage, BlobError> {
    let input = input.trim();
    let (content_type, payload) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| BlobError::InvalidImage("malformed data uri".to_string()))?;
            let content_type = header
                .strip_suffix(";base64")
                .ok_or_else(|| BlobError::InvalidImage("data uri must be base64".to_string()))?;
            if !content_type.starts_with("image/") {
                return Err(BlobError::InvalidImage(format!("unsupported type {content_type}")));
            }
            (content_type.to_string(), payload)
        }
        None => ("image/jpeg".to_string(), input),
    };
    if payload.is_empty() {
        return Err(BlobError::InvalidImage("empty payload".to_string()));
    }
    let estimated = payload.len() / 4 * 3;
    if estimated > max_bytes.saturating_add(3) {
        return Err(BlobError::TooLarge {
            size: estimated,
            max: max_bytes,
        });
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| BlobError::InvalidImage(err.to_string()))?;
    if bytes.len() > max_bytes {
        return Err(BlobError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }
    Ok(DecodedImage {
        bytes,
        content_type,
    })
}
