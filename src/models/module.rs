use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub module_number: i32,
    pub status: String,
    pub subject_code: String,
}
