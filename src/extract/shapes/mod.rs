//! Page-shape detectors
//!
//! Each shape is a pure function from page content to an optional record.
//! [`detect`] walks the shapes in the order given and stops at the first
//! shape that claims the page, whether or not it could parse it. Falling
//! through every shape yields [`Detection::Unrecognized`].

mod openapi;
mod reference;
mod swagger_ui;

use crate::extract::ExtractedRecord;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// Known documentation page layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageShape {
    /// Raw OpenAPI 3 / Swagger 2 JSON document
    OpenApi,

    /// Rendered Swagger UI page with `.opblock` operation blocks
    SwaggerUi,

    /// Hand-written reference page with a `METHOD /path` code line
    EndpointReference,
}

impl PageShape {
    /// Default detection order, most specific first
    pub const PRIORITY: [PageShape; 3] = [Self::OpenApi, Self::SwaggerUi, Self::EndpointReference];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenApi => "openapi",
            Self::SwaggerUi => "swagger_ui",
            Self::EndpointReference => "endpoint_reference",
        }
    }
}

impl fmt::Display for PageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of running the shape detectors over one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// A shape recognized the page
    Matched {
        shape: PageShape,
        record: ExtractedRecord,
    },

    /// A shape claimed the page but its content is unusable
    Malformed { shape: PageShape, reason: String },

    /// No shape recognized the page
    Unrecognized,
}

/// What one detector reports: `None` when the page is not its shape,
/// `Some(Err(reason))` when it is but cannot be parsed
type DetectorResult = Option<Result<ExtractedRecord, String>>;

/// Runs the given shapes in order and returns the first match
///
/// The HTML document is parsed at most once, and only if an HTML shape is
/// reached.
pub fn detect(raw: &str, shapes: &[PageShape]) -> Detection {
    let mut document: Option<Html> = None;

    for &shape in shapes {
        let found = match shape {
            PageShape::OpenApi => openapi::detect(raw),
            PageShape::SwaggerUi => {
                swagger_ui::detect(document.get_or_insert_with(|| Html::parse_document(raw)))
                    .map(Ok)
            }
            PageShape::EndpointReference => {
                reference::detect(document.get_or_insert_with(|| Html::parse_document(raw)))
                    .map(Ok)
            }
        };

        match found {
            Some(Ok(record)) => return Detection::Matched { shape, record },
            Some(Err(reason)) => return Detection::Malformed { shape, reason },
            None => {}
        }
    }

    Detection::Unrecognized
}

/// Parses a CSS selector; the selectors used here are static and valid
fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Collapses runs of whitespace (including zero-width and non-breaking
/// spaces) into single spaces and trims the result
fn clean_text(text: &str) -> String {
    text.replace('\u{200b}', "")
        .split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleaned text content of an element, `None` if blank
fn element_text(element: ElementRef<'_>) -> Option<String> {
    non_empty(clean_text(&element.text().collect::<String>()))
}

/// Text content of an element with line breaks kept, `None` if blank
fn block_text(element: ElementRef<'_>) -> Option<String> {
    non_empty(element.text().collect::<String>().trim().to_string())
}

/// First element matching `css` under `root` with non-blank text
fn first_text(root: ElementRef<'_>, css: &str) -> Option<String> {
    let sel = selector(css)?;
    root.select(&sel).find_map(element_text)
}

/// Text of the document `<title>`
fn document_title(document: &Html) -> Option<String> {
    first_text(document.root_element(), "title")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
