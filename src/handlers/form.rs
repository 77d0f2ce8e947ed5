//! Multipart form reading shared by the upload endpoints.

use crate::{
    error::{AppError, AppResult},
    storage::UploadedFile,
};
use axum::extract::{Multipart, multipart::MultipartError};
use std::collections::HashMap;

/// Text fields and the optional file of a multipart form
#[derive(Debug, Default)]
pub struct Form {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl Form {
    /// Parse a JSON text field
    pub fn json<T: serde::de::DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        match self.fields.get(name) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| AppError::validation(format!("Invalid {}: {}", name, e))),
            None => Ok(None),
        }
    }
}

fn upload_error(e: MultipartError) -> AppError {
    let message = e.to_string();
    if message.contains("body longer than") || message.contains("body is too large") {
        AppError::validation("Uploaded file is too large")
    } else {
        AppError::validation(format!("Malformed multipart body: {}", message))
    }
}

/// Read every part; the part named `file_field` becomes the file
pub async fn read_form(multipart: &mut Multipart, file_field: &str) -> AppResult<Form> {
    let mut form = Form::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let data = field.bytes().await.map_err(upload_error)?.to_vec();
            form.file = Some(UploadedFile::new(file_name, content_type, data));
        } else if !name.is_empty() {
            let value = field.text().await.map_err(upload_error)?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
