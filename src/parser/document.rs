//! Tree-based extraction from HTML content
//!
//! Each function parses its own copy of the document so extraction units
//! can run on separate threads without sharing a (non-`Send`) tree.

use crate::report::HeadingHistogram;
use scraper::{Html, Selector};

/// Marker the login-form check looks for in the raw markup
const PASSWORD_FIELD_MARKER: &str = r#"type="password""#;

/// Extracts the page title
///
/// Returns the trimmed text of the first `<title>` element in document
/// order, or an empty string when the page has none.
///
/// # Example
///
/// ```
/// use web_analyzer::parser::extract_title;
///
/// let html = r#"<html><head><title>  Test Page </title></head></html>"#;
/// assert_eq!(extract_title(html), "Test Page");
/// ```
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Counts heading elements by tag name
///
/// Any element named `h` followed by a single digit is counted, so the
/// non-standard `h7`..`h9` are tolerated while `hr` is not.
pub fn count_headings(html: &str) -> HeadingHistogram {
    let document = Html::parse_document(html);
    let mut histogram = HeadingHistogram::new();

    for node in document.tree.root().descendants() {
        if let Some(element) = node.value().as_element() {
            if is_heading_tag(element.name()) {
                histogram.record(element.name());
            }
        }
    }

    tracing::debug!(distinct = histogram.len(), total = histogram.total(), "Headings counted");
    histogram
}

/// Returns true if the raw markup contains a password input
///
/// This is a literal, case-sensitive substring check for
/// `type="password"`. Single-quoted or unquoted attributes are not
/// recognized.
pub fn contains_login_form(html: &str) -> bool {
    let found = html.contains(PASSWORD_FIELD_MARKER);
    if found {
        tracing::debug!("Login form detected");
    } else {
        tracing::debug!("No login form detected");
    }
    found
}

/// Collects the `href` of every anchor in document order
///
/// Values are returned as written: relative references, fragments and
/// duplicates are all kept. Resolution happens in the link prober.
pub fn collect_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

fn is_heading_tag(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('h'), Some(digit), None) if digit.is_ascii_digit()
    )
}
