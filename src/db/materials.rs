use sqlx::PgPool;

use crate::models::LearningMaterial;

pub struct NewMaterial<'a> {
    pub title: &'a str,
    pub kind: &'a str,
    pub file_path: Option<&'a str>,
    pub subject_code: &'a str,
    pub module_id: Option<i64>,
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    material: &NewMaterial<'_>,
) -> Result<LearningMaterial, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(
        "INSERT INTO learning_materials (title, type, file_path, subject_code, module_id)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(material.title)
    .bind(material.kind)
    .bind(material.file_path)
    .bind(material.subject_code)
    .bind(material.module_id)
    .fetch_one(executor)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<LearningMaterial>, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>("SELECT * FROM learning_materials ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn list_by_subject(
    pool: &PgPool,
    subject_code: &str,
) -> Result<Vec<LearningMaterial>, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(
        "SELECT * FROM learning_materials WHERE subject_code = $1 ORDER BY id",
    )
    .bind(subject_code)
    .fetch_all(pool)
    .await
}

pub async fn list_by_subjects(
    pool: &PgPool,
    subject_codes: &[String],
) -> Result<Vec<LearningMaterial>, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(
        "SELECT * FROM learning_materials WHERE subject_code = ANY($1) ORDER BY id",
    )
    .bind(subject_codes)
    .fetch_all(pool)
    .await
}

pub async fn count_by_subjects(pool: &PgPool, subject_codes: &[String]) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM learning_materials WHERE subject_code = ANY($1)")
            .bind(subject_codes)
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

/// Materials of a subject, narrowed by type and/or module when given.
pub async fn filter(
    pool: &PgPool,
    subject_code: &str,
    kind: Option<&str>,
    module_id: Option<i64>,
) -> Result<Vec<LearningMaterial>, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(
        "SELECT * FROM learning_materials
         WHERE subject_code = $1
           AND ($2::TEXT IS NULL OR type = $2)
           AND ($3::BIGINT IS NULL OR module_id = $3)
         ORDER BY id",
    )
    .bind(subject_code)
    .bind(kind)
    .bind(module_id)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<LearningMaterial>, sqlx::Error> {
    sqlx::query_as::<_, LearningMaterial>(
        "DELETE FROM learning_materials WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
