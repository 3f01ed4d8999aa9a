use axum::extract::{Multipart, Path, State};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::Activity;
use crate::auth::extractor::{AuthUser, ACCESS_COOKIE};
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::db;
use crate::error::{conflict_on_unique, AppError};
use crate::models::{Role, User};
use crate::routes::form::MultipartForm;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

fn auth_cookie(access_token: &str) -> CookieJar {
    let access = Cookie::build((ACCESS_COOKIE, access_token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();

    CookieJar::new().add(access)
}

fn issue_token(state: &SharedState, user: &User) -> Result<String, AppError> {
    encode_token(&Claims::for_user(user), &state.config.jwt_secret).map_err(AppError::Internal)
}

/// Creates the first account, which is always an admin. Closed once any user exists.
pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Activity, Json<AuthResponse>), AppError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    password::validate(&req.password)?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    // Advisory lock prevents concurrent bootstrap registrations
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    let count = db::users::count_all(&mut *tx).await?;
    if count > 0 {
        return Err(AppError::Forbidden(
            "Registration is disabled. Ask an administrator for an account.".to_string(),
        ));
    }

    let user = db::users::create(&mut *tx, req.username.trim(), &pw_hash, Role::Admin, None).await?;
    tx.commit().await?;

    tracing::info!(username = %user.username, "Bootstrap admin registered");

    let access_token = issue_token(&state, &user)?;
    let activity = Activity::new(&user.username, "User registered", user.role.as_str());

    Ok((
        auth_cookie(&access_token),
        activity,
        Json(AuthResponse { access_token, user }),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Activity, Json<AuthResponse>), AppError> {
    if state.login_limiter.check(&req.username).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let Some(user) = db::users::find_by_username(&state.pool, &req.username).await? else {
        state.login_limiter.record_failure(&req.username);
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    };

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&req.username);
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }
    state.login_limiter.clear(&req.username);

    let access_token = issue_token(&state, &user)?;
    let activity = Activity::new(&user.username, "User Logged In", user.role.as_str());

    Ok((
        auth_cookie(&access_token),
        activity,
        Json(AuthResponse { access_token, user }),
    ))
}

pub async fn update_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProfile>,
) -> Result<(Activity, Json<User>), AppError> {
    auth.require_self_or_admin(id)?;

    let existing = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let username = match req.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => existing.username.clone(),
    };

    // A blank password leaves the current one in place
    let password_hash = match req.password.as_deref() {
        Some(pw) if !pw.trim().is_empty() => {
            password::validate(pw)?;
            password::hash(pw).map_err(AppError::Internal)?
        }
        _ => existing.password_hash.clone(),
    };

    let user = db::users::update_profile(&state.pool, id, &username, &password_hash)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already exists"))?;

    let activity = Activity::new(&user.username, "Updated Profile", user.role.as_str());
    Ok((activity, Json(user)))
}

pub async fn upload_photo(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_self_or_admin(id)?;

    db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let uploader = state.uploader()?;
    let file = MultipartForm::read(multipart).await?.take_file()?;

    let image_url = uploader.upload(file.bytes, &file.file_name).await?;
    let user = db::users::update_profile_image(&state.pool, id, &image_url).await?;

    let activity = Activity::new(&user.username, "Updated Profile Picture", user.role.as_str());
    Ok((
        activity,
        Json(json!({ "message": "Upload successful", "image": image_url })),
    ))
}
