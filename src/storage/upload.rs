//! Validation and placement of files received through multipart forms.

use super::Storage;
use crate::{
    error::{AppError, AppResult},
    models::FileDescriptor,
};
use uuid::Uuid;

const MAX_FILE_NAME_LEN: usize = 255;

/// A file part read from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    /// Content type announced by the client
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    pub fn validate(&self, max_size: u64) -> AppResult<()> {
        if self.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if self.data.len() as u64 > max_size {
            return Err(AppError::validation(format!(
                "File exceeds the maximum size of {} bytes",
                max_size
            )));
        }
        if self.file_name.trim().is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        if self.file_name.len() > MAX_FILE_NAME_LEN {
            return Err(AppError::validation(format!(
                "File name is longer than {} characters",
                MAX_FILE_NAME_LEN
            )));
        }
        Ok(())
    }

    /// Sniffed MIME type, falling back to the announced one
    pub fn mime_type(&self) -> String {
        if let Some(kind) = infer::get(&self.data) {
            return kind.mime_type().to_string();
        }
        match &self.content_type {
            Some(ct) if !ct.is_empty() => ct.clone(),
            _ if std::str::from_utf8(&self.data).is_ok() => "text/plain".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> AppResult<String> {
        String::from_utf8(self.data.clone())
            .map_err(|_| AppError::validation("Uploaded file must be UTF-8 text"))
    }

    /// Validate and store the file under `prefix`, describing where it went
    pub async fn store(
        &self,
        storage: &dyn Storage,
        prefix: &str,
        max_size: u64,
    ) -> AppResult<FileDescriptor> {
        self.validate(max_size)?;
        let key = format!("{}/{}_{}", prefix, Uuid::new_v4(), sanitize_file_name(&self.file_name));
        let storage_path = storage.upload(&key, &self.data).await?;

        Ok(FileDescriptor {
            original_name: self.file_name.clone(),
            storage_path,
            mime_type: self.mime_type(),
            size: self.data.len() as u64,
        })
    }
}

/// Keep only characters that are safe in a single path segment
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
