use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit::Activity;
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::materials::NewMaterial;
use crate::db::modules::ModuleFields;
use crate::error::AppError;
use crate::models::material::kind_for_file;
use crate::models::{LearningMaterial, Module, Quiz, Subject};
use crate::routes::form::MultipartForm;
use crate::state::SharedState;
use crate::upload::local::save_lesson_file;

/// Actor recorded for teaching-content changes.
const SUBJECT: &str = "Professor";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseQuery {
    pub course_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    pub subject_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuery {
    pub subject_code: Option<String>,
    pub course_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuiz {
    pub title: String,
    pub subject_code: String,
    pub link: Option<String>,
    pub module_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModule {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub module_number: i32,
    pub status: Option<String>,
    pub subject_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModule {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub module_number: i32,
    pub status: Option<String>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ProfessorStats {
    pub students: i64,
    pub subjects: i64,
    pub lessons: i64,
}

/// Dashboards send the literal string "null" when no department is selected.
fn course_param(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty() && *id != "null")
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

pub async fn stats(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<ProfessorStats>, AppError> {
    auth.require_professor()?;

    let Some(course_id) = course_param(query.course_id.as_deref()) else {
        return Ok(Json(ProfessorStats::default()));
    };

    let students = db::users::count_students_in_course(&state.pool, course_id).await?;
    let codes = db::subjects::codes_by_course(&state.pool, course_id).await?;
    let lessons = if codes.is_empty() {
        0
    } else {
        db::materials::count_by_subjects(&state.pool, &codes).await?
    };

    Ok(Json(ProfessorStats {
        students,
        subjects: codes.len() as i64,
        lessons,
    }))
}

pub async fn subjects(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<Subject>>, AppError> {
    auth.require_professor()?;
    let subjects = match course_param(query.course_id.as_deref()) {
        Some(course_id) => db::subjects::list_by_course(&state.pool, course_id).await?,
        None => Vec::new(),
    };
    Ok(Json(subjects))
}

// Quizzes

pub async fn list_quizzes(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<Vec<Quiz>>, AppError> {
    auth.require_professor()?;
    let quizzes = match non_blank(query.subject_code.as_deref()) {
        Some(code) => db::quizzes::list_by_subject(&state.pool, code).await?,
        None => db::quizzes::list(&state.pool).await?,
    };
    Ok(Json(quizzes))
}

/// Creates the quiz together with the `quiz` material that links to it.
pub async fn create_quiz(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateQuiz>,
) -> Result<(Activity, Json<Quiz>), AppError> {
    auth.require_professor()?;

    let title = req.title.trim();
    let subject_code = req.subject_code.trim();
    if title.is_empty() || subject_code.is_empty() {
        return Err(AppError::BadRequest(
            "Title and Subject Code are required".to_string(),
        ));
    }

    let mut tx = state.pool.begin().await?;
    let quiz = db::quizzes::create(&mut *tx, title, subject_code).await?;
    db::materials::create(
        &mut *tx,
        &NewMaterial {
            title,
            kind: "quiz",
            file_path: non_blank(req.link.as_deref()),
            subject_code,
            module_id: req.module_id,
        },
    )
    .await?;
    tx.commit().await?;

    let activity = Activity::new(
        SUBJECT,
        &format!("Created Quiz: {}", quiz.title),
        auth.role.as_str(),
    );
    Ok((activity, Json(quiz)))
}

pub async fn delete_quiz(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_professor()?;

    let quiz = db::quizzes::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let activity = Activity::new(
        SUBJECT,
        &format!("Deleted Quiz: {}", quiz.title),
        auth.role.as_str(),
    );
    Ok((
        activity,
        Json(json!({ "message": "Quiz deleted successfully" })),
    ))
}

// Lessons

pub async fn list_materials(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<MaterialQuery>,
) -> Result<Json<Vec<LearningMaterial>>, AppError> {
    auth.require_professor()?;

    if let Some(code) = non_blank(query.subject_code.as_deref()) {
        return Ok(Json(db::materials::list_by_subject(&state.pool, code).await?));
    }

    let materials = match course_param(query.course_id.as_deref()) {
        Some(course_id) => {
            let codes = db::subjects::codes_by_course(&state.pool, course_id).await?;
            if codes.is_empty() {
                Vec::new()
            } else {
                db::materials::list_by_subjects(&state.pool, &codes).await?
            }
        }
        None => db::materials::list(&state.pool).await?,
    };
    Ok(Json(materials))
}

pub async fn delete_material(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_professor()?;

    let material = db::materials::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))?;

    let activity = Activity::new(
        SUBJECT,
        &format!("Deleted Lesson: {}", material.title),
        auth.role.as_str(),
    );
    Ok((
        activity,
        Json(json!({ "message": "Lesson deleted successfully" })),
    ))
}

/// Stores a lesson file under the upload directory and registers it as a material.
pub async fn upload_lesson(
    auth: AuthUser,
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<(Activity, Json<LearningMaterial>), AppError> {
    auth.require_professor()?;

    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file()?;
    let title = form.required("title")?.trim();
    let subject_code = form.required("subjectCode")?.trim();
    if title.is_empty() || subject_code.is_empty() {
        return Err(AppError::BadRequest(
            "Title and Subject Code are required".to_string(),
        ));
    }
    let module_id = match non_blank(form.text("moduleId")) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("Invalid moduleId: {raw}")))?,
        ),
        None => None,
    };

    let stored_name = save_lesson_file(&state.config.upload_dir, &file.file_name, &file.bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store lesson file: {e}")))?;

    let created = db::materials::create(
        &state.pool,
        &NewMaterial {
            title,
            kind: kind_for_file(&stored_name),
            file_path: Some(&stored_name),
            subject_code,
            module_id,
        },
    )
    .await;
    let material = match created {
        Ok(material) => material,
        Err(e) => {
            // Nothing references the file without its row
            let path = state.config.upload_dir.join(&stored_name);
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                tracing::warn!(file = %stored_name, "Failed to remove orphaned lesson file: {rm}");
            }
            return Err(e.into());
        }
    };

    tracing::info!(file = %stored_name, subject = %subject_code, "Lesson uploaded");

    let activity = Activity::new(
        SUBJECT,
        &format!("Uploaded Lesson: {}", material.title),
        auth.role.as_str(),
    );
    Ok((activity, Json(material)))
}

// Modules

pub async fn create_module(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateModule>,
) -> Result<(Activity, Json<Module>), AppError> {
    auth.require_professor()?;

    let subject_code = non_blank(req.subject_code.as_deref())
        .ok_or_else(|| AppError::BadRequest("Subject Code is required".to_string()))?;

    let fields = ModuleFields {
        title: &req.title,
        description: req.description.as_deref(),
        module_number: req.module_number,
        status: non_blank(req.status.as_deref()).unwrap_or("locked"),
    };
    let module = db::modules::create(&state.pool, subject_code, &fields).await?;

    let activity = Activity::new(
        SUBJECT,
        &format!("Created Module {}", module.module_number),
        auth.role.as_str(),
    );
    Ok((activity, Json(module)))
}

pub async fn update_module(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateModule>,
) -> Result<(Activity, Json<Module>), AppError> {
    auth.require_professor()?;

    let existing = db::modules::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

    // An omitted status keeps the module open or locked as it was
    let fields = ModuleFields {
        title: &req.title,
        description: req.description.as_deref(),
        module_number: req.module_number,
        status: non_blank(req.status.as_deref()).unwrap_or(existing.status.as_str()),
    };
    let module = db::modules::update(&state.pool, id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

    let activity = Activity::new(
        SUBJECT,
        &format!("Updated Module {}", module.module_number),
        auth.role.as_str(),
    );
    Ok((activity, Json(module)))
}

pub async fn delete_module(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_professor()?;

    let module = db::modules::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Module not found".to_string()))?;

    let activity = Activity::new(
        SUBJECT,
        &format!("Deleted Module {}", module.module_number),
        auth.role.as_str(),
    );
    Ok((
        activity,
        Json(json!({ "message": "Module deleted successfully" })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_param_ignores_placeholders() {
        assert_eq!(course_param(None), None);
        assert_eq!(course_param(Some("")), None);
        assert_eq!(course_param(Some("null")), None);
        assert_eq!(course_param(Some(" BSIT ")), Some("BSIT"));
    }

    #[test]
    fn stats_default_to_zero() {
        let json = serde_json::to_value(ProfessorStats::default()).unwrap();
        assert_eq!(json, json!({ "students": 0, "subjects": 0, "lessons": 0 }));
    }

    #[test]
    fn module_request_accepts_camel_case() {
        let req: CreateModule = serde_json::from_value(json!({
            "title": "Basics",
            "moduleNumber": 3,
            "subjectCode": "CC101"
        }))
        .unwrap();
        assert_eq!(req.module_number, 3);
        assert_eq!(req.subject_code.as_deref(), Some("CC101"));
        assert!(req.status.is_none());
    }
}
