use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Subject code, e.g. "CC101".
    pub code: String,
    pub title: String,
    pub color: Option<String>,
    pub course_id: Option<String>,
    pub year_level: i32,
    pub semester: i32,
    pub status: String,
}
