use sqlx::PgPool;

use crate::models::Quiz;

pub async fn list(pool: &PgPool) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn list_by_subject(pool: &PgPool, subject_code: &str) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE subject_code = $1 ORDER BY id")
        .bind(subject_code)
        .fetch_all(pool)
        .await
}

pub async fn list_by_course(pool: &PgPool, course_id: &str) -> Result<Vec<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(
        "SELECT q.* FROM quizzes q
         JOIN subjects s ON s.code = q.subject_code
         WHERE s.course_id = $1
         ORDER BY q.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    title: &str,
    subject_code: &str,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(
        "INSERT INTO quizzes (title, subject_code, date_created)
         VALUES ($1, $2, CURRENT_DATE) RETURNING *",
    )
    .bind(title)
    .bind(subject_code)
    .fetch_one(executor)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>("DELETE FROM quizzes WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
