use sqlx::PgPool;

use crate::models::Course;

pub struct CourseFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub theme_color: &'a str,
    pub image: Option<&'a str>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    fields: &CourseFields<'_>,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "INSERT INTO courses (id, title, description, theme_color, status, image)
         VALUES ($1, $2, $3, $4, 'active', $5) RETURNING *",
    )
    .bind(id)
    .bind(fields.title)
    .bind(fields.description)
    .bind(fields.theme_color)
    .bind(fields.image)
    .fetch_one(pool)
    .await
}

/// Keeps the stored image when `fields.image` is `None`.
pub async fn update(
    pool: &PgPool,
    id: &str,
    fields: &CourseFields<'_>,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "UPDATE courses
         SET title = $2, description = $3, theme_color = $4, image = COALESCE($5, image)
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(fields.title)
    .bind(fields.description)
    .bind(fields.theme_color)
    .bind(fields.image)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
