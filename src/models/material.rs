use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningMaterial {
    pub id: i64,
    pub title: String,
    /// One of "pdf", "video", "ppt", "doc", "quiz" or "file".
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub file_path: Option<String>,
    pub subject_code: String,
    pub module_id: Option<i64>,
}

/// Infers the material type from a file name's extension.
pub fn kind_for_file(file_name: &str) -> &'static str {
    let name = file_name.to_lowercase();
    if name.ends_with(".pdf") {
        "pdf"
    } else if name.ends_with(".mp4") || name.ends_with(".avi") || name.ends_with(".mov") {
        "video"
    } else if name.ends_with(".ppt") || name.ends_with(".pptx") {
        "ppt"
    } else if name.ends_with(".doc") || name.ends_with(".docx") {
        "doc"
    } else {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(kind_for_file("1700000000000_Week1.PDF"), "pdf");
        assert_eq!(kind_for_file("lecture.mov"), "video");
        assert_eq!(kind_for_file("slides.pptx"), "ppt");
        assert_eq!(kind_for_file("notes.doc"), "doc");
        assert_eq!(kind_for_file("archive.zip"), "file");
        assert_eq!(kind_for_file("no-extension"), "file");
    }

    #[test]
    fn kind_serializes_as_type() {
        let material = LearningMaterial {
            id: 1,
            title: "Week 1".to_string(),
            kind: "pdf".to_string(),
            file_path: Some("1_week1.pdf".to_string()),
            subject_code: "CC101".to_string(),
            module_id: None,
        };
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["filePath"], "1_week1.pdf");
        assert!(json["moduleId"].is_null());
    }
}
