//! Text extraction — turns an uploaded PDF into one plain-text string.
//!
//! Pages are concatenated in order with no separator. A page that yields no
//! text contributes an empty string; only a document that cannot be opened at
//! all is an error.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
#[error("Error reading PDF file: {source}")]
pub struct ExtractionError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl ExtractionError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// A parsed document that can report the text of each of its pages, in order.
///
/// `None` means the page carried no extractable text.
pub trait PageSource {
    fn page_texts(&self) -> Vec<Option<String>>;
}

/// A PDF whose pages have been decoded by `pdf-extract`.
#[derive(Debug)]
pub struct PdfDocument {
    pages: Vec<String>,
}

impl PdfDocument {
    /// Parses a PDF held in memory. Fails if the bytes are not a readable PDF.
    ///
    /// `pdf-extract` panics on some malformed content streams (text shown
    /// before any font is selected, fonts missing from `Resources`); those
    /// panics are reported as extraction errors too.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }));
        let pages = match outcome {
            Ok(result) => result.map_err(|e| ExtractionError::new(e.to_string()))?,
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!("PDF parser aborted on malformed content: {reason}");
                return Err(ExtractionError::new(format!("malformed PDF content ({reason})")));
            }
        };
        Ok(Self { pages })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown parser failure".to_string()
    }
}

impl PageSource for PdfDocument {
    fn page_texts(&self) -> Vec<Option<String>> {
        self.pages
            .iter()
            .map(|p| if p.is_empty() { None } else { Some(p.clone()) })
            .collect()
    }
}

/// Concatenates page texts in order, substituting `""` for pages with none.
pub fn join_pages(source: &impl PageSource) -> String {
    source
        .page_texts()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

/// Extracts the full text of a PDF held in memory.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = PdfDocument::from_bytes(bytes)?;
    let text = join_pages(&document);
    debug!(
        "Extracted {} characters from {} pages",
        text.chars().count(),
        document.pages.len()
    );
    Ok(text)
}
