//! Resume text extraction (`bytes -> text`).

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("PDF text extraction aborted: {0}")]
    Aborted(String),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractError>;
}

/// Extracts text from PDF resumes with `pdf-extract`.
///
/// Runs on the blocking pool: parsing is CPU-bound and the library may panic
/// on malformed input, which surfaces here as `ExtractError::Aborted`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, bytes: Bytes) -> Result<String, ExtractError> {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractError::Aborted(e.to_string()))?
            .map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}
