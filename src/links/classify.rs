use url::Url;

/// Where a link points relative to the analyzed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Same host (and effective port) as the page
    Internal,
    /// Any other host
    External,
}

/// A resolved href and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    pub url: Url,
    pub kind: LinkKind,
}

/// Resolves and classifies a raw href against the page URL
///
/// Only absolute references are counted. Relative paths, fragments and
/// anything that fails to parse yield `None` and stay out of the tally.
///
/// The link is internal when its host, including any port written in the
/// href, equals the page's host. The scheme is ignored, so
/// `https://example.com/login` is internal to `http://example.com/`, while
/// `http://example.com:80/` is not.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_analyzer::links::{classify_link, LinkKind};
///
/// let base = Url::parse("https://example.com/page").unwrap();
///
/// let link = classify_link("https://example.com/about", &base).unwrap();
/// assert_eq!(link.kind, LinkKind::Internal);
///
/// let link = classify_link("https://other.org/", &base).unwrap();
/// assert_eq!(link.kind, LinkKind::External);
///
/// assert!(classify_link("#section", &base).is_none());
/// assert!(classify_link("/relative", &base).is_none());
/// ```
pub fn classify_link(href: &str, base: &Url) -> Option<ClassifiedLink> {
    // A successful parse always carries a scheme
    let url = Url::parse(href).ok()?;

    let kind = if same_host(href, &url, base) {
        LinkKind::Internal
    } else {
        LinkKind::External
    };

    Some(ClassifiedLink { url, kind })
}

fn same_host(href: &str, url: &Url, base: &Url) -> bool {
    match (url.host_str(), base.host_str()) {
        (Some(host), Some(base_host)) => {
            let base_port = base.port().map(|port| port.to_string());
            host == base_host && written_port(href) == base_port.as_deref()
        }
        _ => false,
    }
}

/// Port as written in the href's authority
///
/// The URL parser drops a port equal to the scheme default, so it is read
/// from the raw text instead.
fn written_port(href: &str) -> Option<&str> {
    let (_, rest) = href.split_once("://")?;
    let authority = rest
        .split(|c| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
    // Skip past an IPv6 literal, whose colons are not port separators
    let after_host = host_port.rsplit_once(']').map_or(host_port, |(_, tail)| tail);

    after_host.rsplit_once(':').map(|(_, port)| port)
}
