use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::audit::Activity;
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::{conflict_on_unique, AppError};
use crate::models::Subject;
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFilter {
    pub course_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubject {
    pub code: String,
    pub title: String,
    pub color: Option<String>,
    pub course_id: Option<String>,
    #[serde(default)]
    pub year_level: i32,
    #[serde(default)]
    pub semester: i32,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubject {
    pub title: String,
    #[serde(default)]
    pub year_level: i32,
    #[serde(default)]
    pub semester: i32,
    pub status: Option<String>,
}

impl CreateSubject {
    /// Year level and semester start at 1, status at "active".
    fn into_subject(self) -> Subject {
        Subject {
            code: self.code.trim().to_string(),
            title: self.title,
            color: self.color,
            course_id: self.course_id.filter(|c| !c.is_empty()),
            year_level: if self.year_level == 0 { 1 } else { self.year_level },
            semester: if self.semester == 0 { 1 } else { self.semester },
            status: self.status.unwrap_or_else(|| "active".to_string()),
        }
    }
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Subject>>, AppError> {
    auth.require_admin()?;
    let subjects = match filter.course_id.as_deref().filter(|c| !c.is_empty()) {
        Some(course_id) => db::subjects::list_by_course(&state.pool, course_id).await?,
        None => db::subjects::list(&state.pool).await?,
    };
    Ok(Json(subjects))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<Subject>, AppError> {
    auth.require_admin()?;
    let subject = db::subjects::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;
    Ok(Json(subject))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateSubject>,
) -> Result<(Activity, Json<Subject>), AppError> {
    auth.require_admin()?;

    let subject = req.into_subject();
    if subject.code.is_empty() {
        return Err(AppError::BadRequest("Subject Code is required.".to_string()));
    }
    if db::subjects::find_by_code(&state.pool, &subject.code).await?.is_some() {
        return Err(AppError::Conflict("Subject Code already exists.".to_string()));
    }

    let subject = db::subjects::create(&state.pool, &subject)
        .await
        .map_err(|e| conflict_on_unique(e, "Subject Code already exists."))?;

    Ok((Activity::system(&subject.code, "Subject created"), Json(subject)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Json(req): Json<UpdateSubject>,
) -> Result<(Activity, Json<Subject>), AppError> {
    auth.require_admin()?;

    let existing = db::subjects::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;

    // Omitted fields keep their stored values
    let year_level = if req.year_level == 0 { existing.year_level } else { req.year_level };
    let semester = if req.semester == 0 { existing.semester } else { req.semester };
    let status = req.status.unwrap_or(existing.status);

    let subject = db::subjects::update(
        &state.pool,
        &code,
        &req.title,
        year_level,
        semester,
        &status,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;

    Ok((Activity::system(&code, "Subject updated"), Json(subject)))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_admin()?;

    if !db::subjects::delete(&state.pool, &code).await? {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }

    Ok((
        Activity::system(&code, "Subject deleted"),
        Json(json!({ "message": "Subject deleted successfully" })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let req: CreateSubject =
            serde_json::from_value(json!({ "code": " CC101 ", "title": "Intro to Computing" }))
                .unwrap();
        let subject = req.into_subject();

        assert_eq!(subject.code, "CC101");
        assert_eq!(subject.year_level, 1);
        assert_eq!(subject.semester, 1);
        assert_eq!(subject.status, "active");
        assert_eq!(subject.course_id, None);
    }

    #[test]
    fn explicit_values_are_kept() {
        let req: CreateSubject = serde_json::from_value(json!({
            "code": "CC102",
            "title": "Programming 1",
            "courseId": "BSIT",
            "yearLevel": 2,
            "semester": 2,
            "status": "inactive"
        }))
        .unwrap();
        let subject = req.into_subject();

        assert_eq!(subject.course_id.as_deref(), Some("BSIT"));
        assert_eq!(subject.year_level, 2);
        assert_eq!(subject.semester, 2);
        assert_eq!(subject.status, "inactive");
    }
}
