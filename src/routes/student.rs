use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{LearningMaterial, Quiz};
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    pub course_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuery {
    pub subject_code: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub module_id: Option<i64>,
}

/// Quizzes across every subject of the course.
pub async fn quizzes(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<Vec<Quiz>>, AppError> {
    let quizzes = db::quizzes::list_by_course(&state.pool, &query.course_id).await?;
    Ok(Json(quizzes))
}

/// A module's materials (optionally of one type), or one type across the
/// subject. Without either filter the list is empty.
pub async fn materials(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<MaterialQuery>,
) -> Result<Json<Vec<LearningMaterial>>, AppError> {
    let kind = query.kind.as_deref().filter(|k| !k.is_empty());
    if kind.is_none() && query.module_id.is_none() {
        return Ok(Json(Vec::new()));
    }

    let materials =
        db::materials::filter(&state.pool, &query.subject_code, kind, query.module_id).await?;
    Ok(Json(materials))
}
