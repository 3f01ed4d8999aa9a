use std::path::Path;

use chrono::Utc;

/// Replaces anything outside `[A-Za-z0-9._-]` so the name is safe as a path segment.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Writes a lesson file into `dir` as `<millis>_<name>` and returns the stored name.
pub async fn save_lesson_file(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, std::io::Error> {
    tokio::fs::create_dir_all(dir).await?;

    let stored_name = format!(
        "{}_{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    );
    tokio::fs::write(dir.join(&stored_name), bytes).await?;

    Ok(stored_name)
}
