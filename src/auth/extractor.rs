use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::jwt;
use crate::db;
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

pub const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Professors and admins may manage teaching content.
    pub fn require_professor(&self) -> Result<(), AppError> {
        match self.role {
            Role::Professor | Role::Admin => Ok(()),
            Role::Student => Err(AppError::Forbidden(
                "Professor access required".to_string(),
            )),
        }
    }

    pub fn require_self_or_admin(&self, user_id: i64) -> Result<(), AppError> {
        if self.user_id == user_id || self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only change your own profile".to_string(),
            ))
        }
    }
}

/// Pulls the access token from the `Authorization: Bearer` header, falling
/// back to the login cookie.
fn access_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth_header) = parts.headers.get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.to_string());
        }
    }

    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = access_token(parts)?;
        let claims = jwt::decode_token(&token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        // The account must still exist; its current role wins over the token's
        let user = db::users::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
