//! Hand-written endpoint reference pages
//!
//! Recognized by a `code` or `pre` element whose entire text is a request
//! line such as `GET /v1/users` or `POST https://api.example.com/orders`.

use super::{block_text, document_title, element_text, first_text, selector};
use crate::extract::record::or_unknown;
use crate::extract::{ExtractedRecord, HttpMethod, Parameter};
use regex::Regex;
use scraper::{ElementRef, Html};

const REQUEST_LINE: &str =
    r"(?i)^(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\s+((?:https?://|/)\S*)$";

/// Header labels that mark a parameter table's name column
const NAME_HEADERS: [&str; 7] = [
    "name",
    "parameter",
    "parameters",
    "param",
    "field",
    "argument",
    "attribute",
];

pub(super) fn detect(document: &Html) -> Option<ExtractedRecord> {
    let request_line = Regex::new(REQUEST_LINE).ok()?;
    let code_sel = selector("code, pre")?;
    let root = document.root_element();

    let (line, method, endpoint) = document.select(&code_sel).find_map(|element| {
        let text = element_text(element)?;
        let captures = request_line.captures(&text)?;
        let method = HttpMethod::parse_lenient(captures.get(1)?.as_str());
        let endpoint = captures.get(2)?.as_str().to_string();
        Some((text, method, endpoint))
    })?;

    let name = first_text(root, "h1").or_else(|| document_title(document));

    Some(ExtractedRecord {
        name: or_unknown(name),
        endpoint,
        method,
        parameters: parameter_table(root).unwrap_or_default(),
        description: or_unknown(description(document, &line)),
        example: example(root, &line),
    })
}

/// Meta description, else the first paragraph that is not the request line
fn description(document: &Html, request_line: &str) -> Option<String> {
    if let Some(meta_sel) = selector(r#"meta[name="description"]"#) {
        let meta = document
            .select(&meta_sel)
            .filter_map(|m| m.value().attr("content"))
            .map(super::clean_text)
            .find(|c| !c.is_empty());
        if meta.is_some() {
            return meta;
        }
    }

    let p_sel = selector("p")?;
    document
        .select(&p_sel)
        .filter_map(element_text)
        .find(|text| text != request_line)
}

/// Rows of the first table with a recognizable name column
///
/// Columns the table lacks (type, description) become sentinels per row.
fn parameter_table(root: ElementRef<'_>) -> Option<Vec<Parameter>> {
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    root.select(&table_sel).find_map(|table| {
        let mut rows = table.select(&row_sel);
        let header: Vec<String> = rows
            .next()?
            .select(&cell_sel)
            .map(|cell| element_text(cell).unwrap_or_default().to_lowercase())
            .collect();

        let name_col = header.iter().position(|h| NAME_HEADERS.contains(&h.as_str()))?;
        let type_col = header.iter().position(|h| h.contains("type"));
        let desc_col = header
            .iter()
            .position(|h| h.contains("description") || h == "details");

        let params = rows
            .filter_map(|row| {
                let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
                let name = cells.get(name_col).and_then(|c| element_text(*c))?;
                let cell_text = |col: Option<usize>| {
                    col.and_then(|i| cells.get(i)).and_then(|c| element_text(*c))
                };
                Some(Parameter::new(
                    Some(name),
                    cell_text(type_col),
                    cell_text(desc_col),
                ))
            })
            .collect();

        Some(params)
    })
}

/// First `pre` containing a curl call, else the first `pre` that is not the
/// request line itself
fn example(root: ElementRef<'_>, request_line: &str) -> Option<String> {
    let pre_sel = selector("pre")?;
    let blocks: Vec<String> = root
        .select(&pre_sel)
        .filter_map(block_text)
        .filter(|text| super::clean_text(text) != request_line)
        .collect();

    blocks
        .iter()
        .find(|text| text.contains("curl"))
        .or_else(|| blocks.first())
        .cloned()
}
