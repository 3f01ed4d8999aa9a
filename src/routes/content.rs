use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{LearningMaterial, Module};
use crate::state::SharedState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectQuery {
    pub subject_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuery {
    pub subject_code: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub module_id: Option<i64>,
}

/// Modules of a subject in teaching order.
pub async fn modules(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<SubjectQuery>,
) -> Result<Json<Vec<Module>>, AppError> {
    auth.require_professor()?;
    let modules = db::modules::list_by_subject(&state.pool, &query.subject_code).await?;
    Ok(Json(modules))
}

pub async fn materials(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<MaterialQuery>,
) -> Result<Json<Vec<LearningMaterial>>, AppError> {
    auth.require_professor()?;
    let kind = query.kind.as_deref().filter(|k| !k.is_empty());
    let materials =
        db::materials::filter(&state.pool, &query.subject_code, kind, query.module_id).await?;
    Ok(Json(materials))
}
