use sqlx::PgPool;

use crate::models::Subject;

pub async fn list(pool: &PgPool) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY code")
        .fetch_all(pool)
        .await
}

pub async fn list_by_course(pool: &PgPool, course_id: &str) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(
        "SELECT * FROM subjects WHERE course_id = $1 ORDER BY year_level, semester, code",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub async fn codes_by_course(pool: &PgPool, course_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT code FROM subjects WHERE course_id = $1")
        .bind(course_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, subject: &Subject) -> Result<Subject, sqlx::Error> {
    sqlx::query_as::<_, Subject>(
        "INSERT INTO subjects (code, title, color, course_id, year_level, semester, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&subject.code)
    .bind(&subject.title)
    .bind(&subject.color)
    .bind(&subject.course_id)
    .bind(subject.year_level)
    .bind(subject.semester)
    .bind(&subject.status)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    code: &str,
    title: &str,
    year_level: i32,
    semester: i32,
    status: &str,
) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(
        "UPDATE subjects SET title = $2, year_level = $3, semester = $4, status = $5
         WHERE code = $1 RETURNING *",
    )
    .bind(code)
    .bind(title)
    .bind(year_level)
    .bind(semester)
    .bind(status)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subjects WHERE code = $1")
        .bind(code)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
