//! Text extraction — turns an uploaded document into one string of text.
//!
//! Sits outside the analysis core: the core only ever sees the extracted string,
//! and an extraction failure means the core is never invoked.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Implement this to support another document format.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Short label for logs.
    fn kind(&self) -> &'static str;

    async fn extract(&self, bytes: Bytes) -> Result<String, AppError>;
}

/// PDF text in page order via `pdf-extract`. Layout (columns, tables) is not
/// reconstructed; garbled extraction passes through unchanged.
pub struct PdfExtractor;

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    fn kind(&self) -> &'static str {
        "pdf"
    }

    async fn extract(&self, bytes: Bytes) -> Result<String, AppError> {
        // pdf-extract is CPU-bound and may panic on malformed input; a panic
        // surfaces here as a JoinError.
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| AppError::Extraction(format!("PDF parser aborted: {e}")))?
        .map_err(|e| AppError::Extraction(format!("Failed to read PDF: {e}")))
    }
}

pub struct PlainTextExtractor;

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    fn kind(&self) -> &'static str {
        "text"
    }

    async fn extract(&self, bytes: Bytes) -> Result<String, AppError> {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Extraction("Document is not valid UTF-8 text".to_string()))
    }
}

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Picks an extractor from the leading bytes, falling back to the declared content type.
pub fn extractor_for(
    bytes: &[u8],
    content_type: Option<&str>,
) -> Result<Box<dyn DocumentExtractor>, AppError> {
    let content_type = content_type.map(|c| c.to_ascii_lowercase());
    let content_type = content_type.as_deref();

    if bytes.starts_with(PDF_MAGIC) || content_type == Some("application/pdf") {
        return Ok(Box::new(PdfExtractor));
    }
    if content_type.is_some_and(|c| c.starts_with("text/")) || std::str::from_utf8(bytes).is_ok()
    {
        return Ok(Box::new(PlainTextExtractor));
    }
    Err(AppError::Validation(format!(
        "Unsupported document type '{}': upload a PDF or plain text file",
        content_type.unwrap_or("unknown")
    )))
}

/// Detects the format and extracts text in one step.
pub async fn extract_document(bytes: Bytes, content_type: Option<&str>) -> Result<String, AppError> {
    let extractor = extractor_for(&bytes, content_type)?;
    debug!("Extracting {} bytes as {}", bytes.len(), extractor.kind());
    extractor.extract(bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detected_by_magic_bytes() {
        let extractor = extractor_for(b"%PDF-1.7 ...", None).unwrap();
        assert_eq!(extractor.kind(), "pdf");
    }

    #[test]
    fn test_pdf_detected_by_content_type() {
        let extractor = extractor_for(b"garbage", Some("Application/PDF")).unwrap();
        assert_eq!(extractor.kind(), "pdf");
    }

    #[test]
    fn test_utf8_detected_as_text() {
        let extractor = extractor_for("Python, SQL".as_bytes(), None).unwrap();
        assert_eq!(extractor.kind(), "text");
    }

    #[test]
    fn test_binary_without_type_rejected() {
        let err = extractor_for(&[0xff, 0xfe, 0x00, 0x81], Some("image/png")).err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_plain_text_round_trips() {
        let text = extract_document(Bytes::from_static(b"Python and SQL"), Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(text, "Python and SQL");
    }

    #[tokio::test]
    async fn test_text_content_type_with_invalid_utf8_fails() {
        let err = extract_document(Bytes::from_static(&[0xff, 0xfe]), Some("text/plain"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_extraction_error() {
        let err = extract_document(Bytes::from_static(b"%PDF-1.4\nnot really a pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
