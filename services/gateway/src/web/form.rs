//! services/gateway/src/web/form.rs
//!
//! Reads `multipart/form-data` bodies into text fields and byte sources.

use axum::extract::{multipart::MultipartRejection, Multipart};
use gateway_core::ByteSource;
use std::collections::HashMap;
use std::io::Cursor;

use crate::web::response::{ApiFailure, ApiResult};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A parsed multipart form. Parts with a file name are files, all others are text.
#[derive(Debug, Default)]
pub struct Form {
    texts: HashMap<String, String>,
    files: HashMap<String, ByteSource>,
}

impl Form {
    pub async fn read(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<Self> {
        let mut multipart =
            multipart.map_err(|rejection| ApiFailure::bad_request(rejection.body_text()))?;
        let mut form = Form::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiFailure::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
                let size = data.len() as u64;
                form.files
                    .insert(name, ByteSource::new(Cursor::new(data), size, content_type));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiFailure::bad_request(e.body_text()))?;
                form.texts.insert(name, value);
            }
        }
        Ok(form)
    }

    /// A required, non-blank text field.
    pub fn text(&self, name: &str) -> ApiResult<&str> {
        self.texts
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ApiFailure::bad_request(format!("{} is required", name)))
    }

    /// Takes a required file part out of the form.
    pub fn take_file(&mut self, name: &str) -> ApiResult<ByteSource> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiFailure::bad_request(format!("{} is required", name)))
    }
}
