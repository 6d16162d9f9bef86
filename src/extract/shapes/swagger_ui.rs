//! Rendered Swagger UI pages

use super::{block_text, clean_text, document_title, element_text, first_text, non_empty, selector};
use crate::extract::record::or_unknown;
use crate::extract::{ExtractedRecord, HttpMethod, Parameter};
use scraper::{ElementRef, Html};

/// Recognizes the first `.opblock` that carries both a method and a path
pub(super) fn detect(document: &Html) -> Option<ExtractedRecord> {
    let opblock_sel = selector(".opblock")?;

    let (opblock, method, path) = document.select(&opblock_sel).find_map(|block| {
        let method = first_text(block, ".opblock-summary-method")?;
        let path = summary_path(block)?;
        Some((block, method, path))
    })?;

    let name = first_own_text(document.root_element(), ".info .title")
        .or_else(|| document_title(document));

    let description = first_text(opblock, ".opblock-summary-description")
        .or_else(|| first_text(opblock, ".opblock-description"));

    Some(ExtractedRecord {
        name: or_unknown(name),
        endpoint: path,
        method: HttpMethod::parse_lenient(&method),
        parameters: parameters(opblock),
        description: or_unknown(description),
        example: example(opblock).or_else(|| example(document.root_element())),
    })
}

/// Operation path from `data-path`, falling back to the rendered text
fn summary_path(block: ElementRef<'_>) -> Option<String> {
    let sel = selector(".opblock-summary-path")?;
    let element = block.select(&sel).next()?;

    element
        .value()
        .attr("data-path")
        .map(clean_text)
        .and_then(non_empty)
        .or_else(|| element_text(element))
}

fn parameters(opblock: ElementRef<'_>) -> Vec<Parameter> {
    let (Some(row_sel), Some(name_sel)) = (selector("tr"), selector(".parameter__name")) else {
        return Vec::new();
    };

    opblock
        .select(&row_sel)
        .filter_map(|row| {
            let name_cell = row.select(&name_sel).next()?;
            let name = own_text(name_cell).map(|n| n.trim_end_matches('*').trim_end().to_string());

            let description = first_text(row, ".parameters-col_description .markdown")
                .or_else(|| first_text(row, ".parameters-col_description .renderedMarkdown"))
                .or_else(|| first_text(row, ".parameters-col_description"));

            Some(Parameter::new(
                name,
                first_text(row, ".parameter__type"),
                description,
            ))
        })
        .collect()
}

fn example(root: ElementRef<'_>) -> Option<String> {
    [".example", ".microlight", ".highlight-code pre"]
        .iter()
        .find_map(|css| {
            let sel = selector(css)?;
            root.select(&sel).find_map(block_text)
        })
}

/// First non-blank text node directly inside the element
///
/// Swagger UI nests version badges and required markers in child spans,
/// which must not leak into titles and parameter names.
fn own_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| clean_text(text))
        .find(|text| !text.is_empty())
}

fn first_own_text(root: ElementRef<'_>, css: &str) -> Option<String> {
    let sel = selector(css)?;
    root.select(&sel).find_map(own_text)
}
