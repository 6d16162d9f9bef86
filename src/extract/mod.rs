//! Extraction of structured API records from raw documentation pages
//!
//! Extraction runs a fixed, ordered list of page-shape detectors against the
//! raw content. The first detector that recognizes the page produces the
//! record. When none match, extraction fails with
//! [`ExtractError::UnrecognizedShape`]; it never guesses. A shape that
//! claims the page but cannot read it fails with
//! [`ExtractError::MalformedContent`].
//!
//! Sub-fields a matched shape cannot parse are filled with [`UNKNOWN`]
//! instead of failing the whole record.

mod record;
pub mod shapes;

pub use record::{ExtractedRecord, HttpMethod, Parameter, UNKNOWN};
pub use shapes::{Detection, PageShape};

use thiserror::Error;

/// Errors that can occur while extracting a record from page content
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("unrecognized page shape")]
    UnrecognizedShape,

    #[error("malformed {shape} content: {reason}")]
    MalformedContent { shape: PageShape, reason: String },
}

/// Turns raw page content into a structured record
///
/// Implementations must be pure: the same content always yields the same
/// result.
pub trait PageExtractor: Send + Sync {
    fn extract(&self, raw: &str) -> Result<ExtractedRecord, ExtractError>;
}

/// Extractor that tries each [`PageShape`] in priority order
#[derive(Debug, Clone)]
pub struct ShapeExtractor {
    shapes: Vec<PageShape>,
}

impl ShapeExtractor {
    /// Creates an extractor that only tries the given shapes, in order
    pub fn with_shapes(shapes: Vec<PageShape>) -> Self {
        Self { shapes }
    }

    /// Returns the shapes this extractor tries, in order
    pub fn shapes(&self) -> &[PageShape] {
        &self.shapes
    }
}

impl Default for ShapeExtractor {
    fn default() -> Self {
        Self::with_shapes(PageShape::PRIORITY.to_vec())
    }
}

impl PageExtractor for ShapeExtractor {
    fn extract(&self, raw: &str) -> Result<ExtractedRecord, ExtractError> {
        match shapes::detect(raw, &self.shapes) {
            Detection::Matched { shape, record } => {
                tracing::debug!(shape = %shape, endpoint = %record.endpoint, "Page shape matched");
                Ok(record)
            }
            Detection::Malformed { shape, reason } => {
                Err(ExtractError::MalformedContent { shape, reason })
            }
            Detection::Unrecognized => Err(ExtractError::UnrecognizedShape),
        }
    }
}

/// Extracts a record using every known page shape
///
/// # Example
///
/// ```
/// use apizoo_harvest::extract::{extract, HttpMethod};
///
/// let html = r#"<html><body><h1>Users</h1><code>GET /v1/users</code></body></html>"#;
/// let record = extract(html).unwrap();
/// assert_eq!(record.method, HttpMethod::Get);
/// assert_eq!(record.endpoint, "/v1/users");
/// ```
pub fn extract(raw: &str) -> Result<ExtractedRecord, ExtractError> {
    ShapeExtractor::default().extract(raw)
}
