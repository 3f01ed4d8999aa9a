use sqlx::PgPool;

use crate::models::Module;

pub struct ModuleFields<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub module_number: i32,
    pub status: &'a str,
}

pub async fn list_by_subject(pool: &PgPool, subject_code: &str) -> Result<Vec<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "SELECT * FROM modules WHERE subject_code = $1 ORDER BY module_number ASC, id ASC",
    )
    .bind(subject_code)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    subject_code: &str,
    fields: &ModuleFields<'_>,
) -> Result<Module, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "INSERT INTO modules (title, description, module_number, status, subject_code)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(fields.title)
    .bind(fields.description)
    .bind(fields.module_number)
    .bind(fields.status)
    .bind(subject_code)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    fields: &ModuleFields<'_>,
) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>(
        "UPDATE modules SET title = $2, description = $3, module_number = $4, status = $5
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fields.title)
    .bind(fields.description)
    .bind(fields.module_number)
    .bind(fields.status)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Module>, sqlx::Error> {
    sqlx::query_as::<_, Module>("DELETE FROM modules WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
