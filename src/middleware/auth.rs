use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::role::{Capabilities, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn require(&self, capability: Capabilities) -> Result<()> {
        if self.role.can(capability) {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.id, role = %self.role, "capability check failed");
            Err(Error::Forbidden(format!(
                "Role '{}' is not allowed to perform this action",
                self.role
            )))
        }
    }

    /// `None` when the caller may see every candidate, otherwise their own id.
    pub fn candidate_scope(&self) -> Option<Uuid> {
        if self.role.can(Capabilities::VIEW_ALL_CANDIDATES) {
            None
        } else {
            Some(self.id)
        }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = Error;

    fn try_from(claims: Claims) -> Result<Self> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::Unauthorized("Token subject is not a user id".to_string()))?;
        let role = claims
            .role
            .as_deref()
            .ok_or_else(|| Error::Unauthorized("Token carries no role".to_string()))?
            .parse::<Role>()
            .map_err(Error::Unauthorized)?;
        Ok(Self { id, role })
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("missing_authorization".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| Error::Unauthorized("bad_authorization".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("unsupported_scheme".to_string()))
}

pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;
    AuthUser::try_from(data.claims)
}

pub async fn require_bearer_auth(mut req: Request, next: Next) -> Result<Response> {
    let config = crate::config::get_config();
    let user = verify_token(bearer_token(req.headers())?, &config.jwt_secret)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| Error::Unauthorized("missing_authorization".to_string()))
    }
}
