use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::audit::Activity;
use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::{conflict_on_unique, AppError};
use crate::models::{AuditRecordView, Role, User};
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
    pub course_id: Option<String>,
}

/// The activity log, newest first.
pub async fn logs(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<AuditRecordView>>, AppError> {
    auth.require_admin()?;
    let records = state.activity.list_all().await?;
    Ok(Json(records.into_iter().map(AuditRecordView::from).collect()))
}

pub async fn list_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_admin()?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn create_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateUser>,
) -> Result<(Activity, Json<User>), AppError> {
    auth.require_admin()?;

    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    password::validate(&req.password)?;

    let role = match req.role.as_deref() {
        None => Role::Student,
        Some(r) => Role::parse(r)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown role: {r}")))?,
    };
    let course_id = course_for_role(role, req.course_id.as_deref())?;

    if db::users::find_by_username(&state.pool, username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let user = db::users::create(&state.pool, username, &pw_hash, role, course_id)
        .await
        .map_err(|e| conflict_on_unique(e, "Username already exists"))?;

    let activity = Activity::new(&user.username, "User created", user.role.as_str());
    Ok((activity, Json(user)))
}

/// Professors must belong to a department, students may be enrolled in one,
/// admins never carry a course.
fn course_for_role(role: Role, course_id: Option<&str>) -> Result<Option<&str>, AppError> {
    let course_id = course_id.map(str::trim).filter(|id| !id.is_empty());
    match role {
        Role::Professor => course_id.map(Some).ok_or_else(|| {
            AppError::BadRequest("Professors must be assigned to a Course/Department.".to_string())
        }),
        Role::Student => Ok(course_id),
        Role::Admin => Ok(None),
    }
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_admin()?;
    if auth.user_id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    // Same lock as bootstrap registration, serialises changes to the admin set
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    let user = db::users::delete(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // The console must keep at least one administrator
    if user.role == Role::Admin && db::users::count_admins(&mut *tx).await? == 0 {
        return Err(AppError::Conflict(
            "Cannot delete the last administrator".to_string(),
        ));
    }
    tx.commit().await?;

    let activity = Activity::new(&user.username, "User deleted", user.role.as_str());
    Ok((
        activity,
        Json(json!({ "message": "User deleted successfully" })),
    ))
}
