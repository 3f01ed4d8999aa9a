use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::AppError;

pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A drained `multipart/form-data` body: text fields plus at most one `file` part.
#[derive(Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or("unknown").to_string();

            if name == "file" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("File read error: {e}")))?;
                // Browsers send an empty part when no file was picked
                if !bytes.is_empty() {
                    form.file = Some(UploadedFile { file_name, bytes });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Field read error: {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing field: {name}")))
    }

    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("Missing file".to_string()))
    }
}
