use crate::AuthError;
use domain::Identity;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// 身份提供方签发的 claims。
///
/// `role`/`hostelId`/`floorIds` 可缺省：缺少角色视为未分配角色，
/// 缺少作用域时由档案目录补全。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_ids: Option<Vec<String>>,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl TokenClaims {
    /// 由身份构造 claims（本地工具与测试使用）。
    pub fn for_identity(identity: &Identity, ttl_seconds: u64) -> Self {
        let floor_ids: Vec<String> = identity.scope.assigned_floor_ids.iter().cloned().collect();
        Self {
            sub: identity.id.clone(),
            email: Some(identity.email.clone()).filter(|email| !email.is_empty()),
            name: Some(identity.display_name.clone()).filter(|name| !name.is_empty()),
            role: Some(identity.role.as_str().to_string()),
            hostel_id: identity.scope.assigned_hostel_id.clone(),
            floor_ids: (!floor_ids.is_empty()).then_some(floor_ids),
            exp: (now_epoch_seconds() + ttl_seconds) as usize,
            iss: None,
        }
    }
}

/// JWT 签发与校验（HS256）。
pub struct JwtManager {
    secret: Vec<u8>,
    issuer: Option<String>,
}

impl JwtManager {
    /// 创建 JWT 管理器；`issuer` 存在时校验 `iss`。
    pub fn new(secret: String, issuer: Option<String>) -> Self {
        Self {
            secret: secret.into_bytes(),
            issuer,
        }
    }

    /// 签发 token；配置了 issuer 时自动写入 `iss`。
    pub fn issue_token(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let mut claims = claims.clone();
        if claims.iss.is_none() {
            claims.iss = self.issuer.clone();
        }
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))
    }

    /// 校验签名、过期时间与 issuer，返回 claims。
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }
        let decoded = jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?;
        if decoded.claims.sub.trim().is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        Ok(decoded.claims)
    }
}

/// 当前时间戳（秒）。
fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 将 jwt 库错误映射为业务错误。
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::Unauthenticated,
    }
}
