pub mod admin;
pub mod auth;
pub mod content;
pub mod courses;
pub mod form;
pub mod professor;
pub mod student;
pub mod subjects;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/users/{id}", put(auth::update_user))
        .route("/api/auth/users/{id}/photo", post(auth::upload_photo))
        // Admin
        .route("/api/admin/logs", get(admin::logs))
        .route(
            "/api/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route("/api/admin/users/{id}", delete(admin::delete_user))
        .route(
            "/api/admin/courses",
            get(courses::list).post(courses::create),
        )
        .route(
            "/api/admin/courses/{id}",
            put(courses::update).delete(courses::delete),
        )
        .route(
            "/api/admin/subjects",
            get(subjects::list).post(subjects::create),
        )
        .route(
            "/api/admin/subjects/{code}",
            get(subjects::get)
                .put(subjects::update)
                .delete(subjects::delete),
        )
        .route("/api/admin/modules", get(content::modules))
        .route("/api/admin/materials", get(content::materials))
        // Professor
        .route("/api/professor/stats", get(professor::stats))
        .route("/api/professor/subjects", get(professor::subjects))
        .route(
            "/api/professor/quizzes",
            get(professor::list_quizzes).post(professor::create_quiz),
        )
        .route("/api/professor/quizzes/{id}", delete(professor::delete_quiz))
        .route("/api/professor/materials", get(professor::list_materials))
        .route(
            "/api/professor/materials/{id}",
            delete(professor::delete_material),
        )
        .route("/api/professor/upload", post(professor::upload_lesson))
        .route("/api/professor/modules", post(professor::create_module))
        .route(
            "/api/professor/modules/{id}",
            put(professor::update_module).delete(professor::delete_module),
        )
        // Student
        .route("/api/student/quizzes", get(student::quizzes))
        .route("/api/student/materials", get(student::materials))
        // Catalogue
        .route("/api/courses/{id}", get(courses::get))
        .route("/api/courses/{id}/subjects", get(courses::subjects))
}
