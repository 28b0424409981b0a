use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::errors::ErrorKind;
use tracing::warn;
use uuid::Uuid;

use crate::auth::claims::TokenKind;
use crate::auth::jwt::JwtKeys;
use crate::auth::repo_types::User;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Caller identity resolved from a valid access token. The user row is
/// looked up on every request so a stale token for a deleted account is
/// rejected; the password hash never leaves the repo layer.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("missing Authorization header".into()))?;

        let token = parse_bearer(header)
            .ok_or_else(|| AppError::Unauthenticated("invalid Authorization header".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!("bearer token rejected");
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                AppError::Unauthenticated("token expired".into())
            } else {
                AppError::Unauthenticated("invalid token".into())
            }
        })?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::Unauthenticated("access token required".into()));
        }

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("user not found".into()))?;

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        })
    }
}

/// Optional identity for the creation endpoints that permit anonymous
/// authorship. An absent header means anonymous; a present-but-invalid
/// token is still a hard rejection, never downgraded to anonymous.
#[derive(Debug)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .is_none()
        {
            return Ok(MaybeUser(None));
        }
        CurrentUser::from_request_parts(parts, state)
            .await
            .map(|user| MaybeUser(Some(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bearer_accepts_both_prefix_cases() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_bearer_rejects_other_schemes() {
        assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer(""), None);
    }
}
