use crate::links::LinkKind;
use crate::parser::HtmlVersion;
use crate::{AnalysisError, UrlError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display value used when a page has no (or an empty) `<title>`
pub const TITLE_NOT_FOUND: &str = "Title not found";

/// Occurrence count per heading tag name
///
/// Only tags seen at least once have an entry. Keys serialize in sorted
/// order so reports are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeadingHistogram(BTreeMap<String, usize>);

impl HeadingHistogram {
    /// Creates an empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `tag`
    pub fn record(&mut self, tag: &str) {
        *self.0.entry(tag.to_string()).or_insert(0) += 1;
    }

    /// Returns the count for `tag`, zero when it never occurred
    pub fn get(&self, tag: &str) -> usize {
        self.0.get(tag).copied().unwrap_or(0)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Number of distinct heading tags seen
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for HeadingHistogram {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(tag, count)| (tag.into(), count))
                .collect(),
        )
    }
}

/// Link counters for one page
///
/// Every counted link lands in exactly one of `internal`/`external`;
/// `inaccessible` is counted independently for links whose probe failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTally {
    #[serde(rename = "internal_links")]
    pub internal: usize,

    #[serde(rename = "external_links")]
    pub external: usize,

    #[serde(rename = "inaccessible_links")]
    pub inaccessible: usize,
}

impl LinkTally {
    /// Records one probed link
    pub fn record(&mut self, kind: LinkKind, accessible: bool) {
        match kind {
            LinkKind::Internal => self.internal += 1,
            LinkKind::External => self.external += 1,
        }
        if !accessible {
            self.inaccessible += 1;
        }
    }

    /// Number of links that were classified (internal + external)
    pub fn total(&self) -> usize {
        self.internal + self.external
    }
}

/// Structural report for one analyzed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub title: String,
    pub html_version: String,
    pub headings: HeadingHistogram,
    #[serde(flatten)]
    pub links: LinkTally,
    pub has_login_form: bool,
}

impl AnalysisReport {
    /// Merges the partial results of one run
    ///
    /// An empty title is replaced by [`TITLE_NOT_FOUND`]; the version is
    /// stored as its display label.
    pub fn new(
        title: String,
        html_version: HtmlVersion,
        headings: HeadingHistogram,
        links: LinkTally,
        has_login_form: bool,
    ) -> Self {
        let title = if title.is_empty() {
            TITLE_NOT_FOUND.to_string()
        } else {
            title
        };

        Self {
            title,
            html_version: html_version.to_string(),
            headings,
            links,
            has_login_form,
        }
    }
}

/// JSON error body returned for failed requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

/// Input problems are the caller's fault
impl From<&UrlError> for ErrorResponse {
    fn from(err: &UrlError) -> Self {
        Self::new(400, err.to_string())
    }
}

/// Fetch, read and probe failures are server-side
impl From<&AnalysisError> for ErrorResponse {
    fn from(err: &AnalysisError) -> Self {
        Self::new(500, err.to_string())
    }
}
