//! HTML version detection from the doctype declaration

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DOCTYPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!DOCTYPE\s+([^>]+)>").unwrap());

/// Public identifiers checked in precedence order, matched against the
/// lowercased doctype body
const KNOWN_IDENTIFIERS: [(&str, HtmlVersion); 4] = [
    (r#"html public "-//w3c//dtd html 2.0//en""#, HtmlVersion::Html20),
    (
        r#"html public "-//w3c//dtd html 3.2 final//en""#,
        HtmlVersion::Html32,
    ),
    (r#"html public "-//w3c//dtd html 4.01//en""#, HtmlVersion::Html401),
    (r#"html public "-//w3c//dtd xhtml 1.0"#, HtmlVersion::Xhtml10),
];

/// HTML version inferred from a document's doctype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HtmlVersion {
    Html20,
    Html32,
    Html401,
    Xhtml10,
    /// Any other doctype mentioning `html`; HTML5 has no public identifier
    Html5,
    /// No doctype, or one that does not mention `html`
    #[default]
    Unknown,
}

impl HtmlVersion {
    /// Returns the label shown in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Html20 => "HTML 2.0",
            Self::Html32 => "HTML 3.2",
            Self::Html401 => "HTML 4.01",
            Self::Xhtml10 => "XHTML 1.0",
            Self::Html5 => "HTML5",
            Self::Unknown => "Unknown HTML version",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies the body of a doctype declaration (the text after `<!DOCTYPE`)
///
/// The input is trimmed and lowercased before matching, so the result only
/// depends on the normalized string.
///
/// # Examples
///
/// ```
/// use web_analyzer::parser::{classify_doctype, HtmlVersion};
///
/// assert_eq!(classify_doctype("html"), HtmlVersion::Html5);
/// assert_eq!(
///     classify_doctype(r#"HTML PUBLIC "-//W3C//DTD HTML 4.01//EN""#),
///     HtmlVersion::Html401
/// );
/// assert_eq!(classify_doctype("svg"), HtmlVersion::Unknown);
/// ```
pub fn classify_doctype(doctype: &str) -> HtmlVersion {
    let normalized = doctype.trim().to_lowercase();

    for (identifier, version) in KNOWN_IDENTIFIERS {
        if normalized.contains(identifier) {
            return version;
        }
    }

    if normalized.contains("html") {
        HtmlVersion::Html5
    } else {
        tracing::warn!(doctype = %normalized, "Unknown HTML version detected");
        HtmlVersion::Unknown
    }
}

/// Detects the HTML version of a page from its first doctype declaration
pub fn detect_html_version(html: &str) -> HtmlVersion {
    match DOCTYPE_REGEX.captures(html).and_then(|caps| caps.get(1)) {
        Some(body) => classify_doctype(body.as_str()),
        None => {
            tracing::debug!("Doctype not found");
            HtmlVersion::Unknown
        }
    }
}
