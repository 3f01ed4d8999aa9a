use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course code, e.g. "BSIT".
    pub id: String,
    pub title: String,
    pub description: String,
    pub theme_color: Option<String>,
    pub status: String,
    pub image: Option<String>,
}
