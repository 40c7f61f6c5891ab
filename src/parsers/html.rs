use crate::heuristics::{CompiledRule, Heuristics};
use crate::parsers::{ExtractedPage, text};
use crate::results::{ProductRecord, SENTINEL};
use scraper::{ElementRef, Html};
use url::Url;

/// Extracts product records and the next-page link from one listing page.
///
/// Every element whose class or id matches the candidate pattern becomes one
/// record, in document order. Each field is resolved on its own; a missing
/// sub-element only affects that field.
pub fn extract_page(html: &str, page_url: &Url, heuristics: &Heuristics) -> ExtractedPage {
    let doc = Html::parse_document(html);

    let records = candidates(&doc, heuristics)
        .map(|candidate| extract_record(candidate, page_url, heuristics))
        .collect::<Vec<_>>();

    let next_link = find_next_link(&doc, page_url, heuristics);

    ::log::debug!(
        "Extracted {} candidates from {} (next link: {:?})",
        records.len(),
        page_url,
        next_link.as_ref().map(Url::as_str)
    );

    ExtractedPage::new(records, next_link)
}

/// Iterates over candidate elements in document order
pub fn candidates<'a>(
    doc: &'a Html,
    heuristics: &'a Heuristics,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| heuristics.is_candidate(el.value().attr("class"), el.value().id()))
}

/// Resolves all five fields of a single candidate
pub fn extract_record(
    candidate: ElementRef<'_>,
    page_url: &Url,
    heuristics: &Heuristics,
) -> ProductRecord {
    let field = |rules: &[CompiledRule]| {
        resolve_field(candidate, rules, heuristics).unwrap_or_else(|| SENTINEL.to_string())
    };

    let image = field(&heuristics.image);

    ProductRecord::new(
        field(&heuristics.name),
        field(&heuristics.price),
        field(&heuristics.description),
        field(&heuristics.model_number),
        normalize_image_url(&image, page_url),
    )
}

/// Walks the ranked rules and returns the first non-empty value found
fn resolve_field(
    candidate: ElementRef<'_>,
    rules: &[CompiledRule],
    heuristics: &Heuristics,
) -> Option<String> {
    for rule in rules {
        // skip(1): the candidate itself is not one of its own fields
        for node in candidate.descendants().skip(1) {
            let Some(el) = ElementRef::wrap(node) else {
                continue;
            };
            if !rule.matches(el.value().name(), el.value().attr("class")) {
                continue;
            }

            let value = match rule.attribute() {
                Some(attr) => el.value().attr(attr).map(str::trim).unwrap_or_default().to_string(),
                None => text::clean_with_options(
                    &el.text().collect::<String>(),
                    &heuristics.text_options,
                ),
            };

            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Normalizes an image source into an absolute http(s) URL or the sentinel.
///
/// Inline `data:` URLs and anything that does not resolve to http(s) become
/// the sentinel. Relative paths are joined against the page URL.
pub fn normalize_image_url(raw: &str, page_url: &Url) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw == SENTINEL || raw.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:")) {
        return SENTINEL.to_string();
    }

    let resolved = match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => page_url.join(raw).ok(),
        Err(e) => {
            ::log::debug!("Unparseable image URL '{}': {}", raw, e);
            None
        }
    };

    match resolved {
        Some(url) if matches!(url.scheme(), "http" | "https") => url.to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Finds the first "next page" link and resolves it against the page URL.
///
/// Only http(s) targets count; `javascript:` and `mailto:` anchors are skipped.
pub fn find_next_link(doc: &Html, page_url: &Url, heuristics: &Heuristics) -> Option<Url> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter(|el| heuristics.is_next_link(el.value().attr("class"), el.value().attr("rel")))
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .filter_map(|href| page_url.join(href).ok())
        .find(|url| matches!(url.scheme(), "http" | "https"))
}
