//! 身份解析能力：bearer token 校验、角色与作用域提取。

mod jwt;
mod profile;

use async_trait::async_trait;
use domain::{HostelError, Identity, Role, Scope};
use std::sync::Arc;

pub use jwt::{JwtManager, TokenClaims};
pub use profile::{DocumentProfileDirectory, ProfileDirectory};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("token expired")]
    TokenExpired,
    /// 凭证有效但没有（可识别的）角色 claim。
    #[error("no role assigned")]
    NoRoleAssigned,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for HostelError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated | AuthError::TokenExpired => HostelError::Unauthenticated,
            AuthError::NoRoleAssigned => HostelError::forbidden("no role assigned"),
            AuthError::Internal(message) => HostelError::Upstream(message),
        }
    }
}

/// 身份解析服务（JWT + 可选档案目录）。
pub struct IdentityResolver {
    jwt: JwtManager,
    profiles: Option<Arc<dyn ProfileDirectory>>,
}

impl IdentityResolver {
    pub fn new(jwt: JwtManager) -> Self {
        Self {
            jwt,
            profiles: None,
        }
    }

    /// 挂载员工档案目录。
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileDirectory>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// 校验 token 并解析身份。
    pub async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.jwt.decode(token)?;
        let role = claims
            .role
            .as_deref()
            .and_then(Role::parse)
            .ok_or(AuthError::NoRoleAssigned)?;

        let mut scope = Scope {
            assigned_hostel_id: claims
                .hostel_id
                .map(|hostel| hostel.trim().to_string())
                .filter(|hostel| !hostel.is_empty()),
            assigned_floor_ids: claims
                .floor_ids
                .unwrap_or_default()
                .into_iter()
                .map(|floor| floor.trim().to_string())
                .filter(|floor| !floor.is_empty())
                .collect(),
        };
        if role.is_staff()
            && scope.is_empty()
            && let Some(profiles) = &self.profiles
        {
            match profiles
                .staff_scope(role, &claims.sub, claims.email.as_deref())
                .await
            {
                Ok(Some(found)) => scope = found,
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        target: "hostel.auth",
                        subject = %claims.sub,
                        role = %role,
                        error = %err,
                        "staff profile lookup failed, using claims scope"
                    );
                }
            }
        }

        Ok(Identity {
            id: claims.sub,
            email: claims.email.unwrap_or_default(),
            display_name: claims.name.unwrap_or_default(),
            role,
            scope,
        })
    }
}

/// 身份解析 trait，便于替换实现与测试。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError>;
}

#[async_trait]
impl Authenticator for IdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        IdentityResolver::resolve(self, token).await
    }
}
