//! Document parser for page structure extraction
//!
//! This module turns raw HTML into the pieces the report needs:
//! - Page title
//! - HTML version (from the doctype declaration)
//! - Heading histogram
//! - Login form presence
//! - Raw hyperlink targets
//!
//! Parsing is best-effort. Malformed markup is recovered by html5ever and
//! never turns into an error; extraction degrades to empty/zero results.

mod doctype;
mod document;

pub use doctype::{classify_doctype, detect_html_version, HtmlVersion};
pub use document::{collect_links, contains_login_form, count_headings, extract_title};
