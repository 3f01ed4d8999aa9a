use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde_json::json;

use crate::audit::Activity;
use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::courses::CourseFields;
use crate::error::{conflict_on_unique, AppError};
use crate::models::{Course, Subject};
use crate::routes::form::{MultipartForm, UploadedFile};
use crate::state::SharedState;

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Course>>, AppError> {
    auth.require_admin()?;
    let courses = db::courses::list(&state.pool).await?;
    Ok(Json(courses))
}

/// Uploads the optional course image, if one was attached.
async fn upload_image(
    state: &SharedState,
    file: Option<UploadedFile>,
) -> Result<Option<String>, AppError> {
    match file {
        Some(file) => {
            let url = state.uploader()?.upload(file.bytes, &file.file_name).await?;
            Ok(Some(url))
        }
        None => Ok(None),
    }
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<(Activity, Json<Course>), AppError> {
    auth.require_admin()?;

    let mut form = MultipartForm::read(multipart).await?;
    let id = form.required("id")?.trim().to_string();
    if id.is_empty() {
        return Err(AppError::BadRequest("Course Code (ID) is required.".to_string()));
    }

    if db::courses::find_by_id(&state.pool, &id).await?.is_some() {
        return Err(AppError::Conflict("Course Code (ID) already exists.".to_string()));
    }

    let file = form.file.take();
    let (title, description, theme_color) = (
        form.required("title")?,
        form.required("description")?,
        form.required("themeColor")?,
    );
    let image = upload_image(&state, file).await?;
    let fields = CourseFields {
        title,
        description,
        theme_color,
        image: image.as_deref(),
    };

    let course = db::courses::create(&state.pool, &id, &fields)
        .await
        .map_err(|e| conflict_on_unique(e, "Course Code (ID) already exists."))?;

    Ok((Activity::system(&course.id, "Course created"), Json(course)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(Activity, Json<Course>), AppError> {
    auth.require_admin()?;

    let mut form = MultipartForm::read(multipart).await?;

    if db::courses::find_by_id(&state.pool, &id).await?.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let file = form.file.take();
    let (title, description, theme_color) = (
        form.required("title")?,
        form.required("description")?,
        form.required("themeColor")?,
    );
    let image = upload_image(&state, file).await?;
    let fields = CourseFields {
        title,
        description,
        theme_color,
        image: image.as_deref(),
    };

    let course = db::courses::update(&state.pool, &id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    Ok((Activity::system(&course.id, "Course updated"), Json(course)))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<(Activity, Json<serde_json::Value>), AppError> {
    auth.require_admin()?;

    if !db::courses::delete(&state.pool, &id).await? {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    Ok((
        Activity::system(&id, "Course deleted"),
        Json(json!({ "message": "Course deleted successfully" })),
    ))
}

/// Catalogue view of a single course, open to every signed-in user.
pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = db::courses::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(Json(course))
}

pub async fn subjects(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = db::subjects::list_by_course(&state.pool, &id).await?;
    Ok(Json(subjects))
}
