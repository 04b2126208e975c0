use crate::UrlError;
use url::Url;

/// Parses a start URL and checks that it can be fetched
///
/// Only HTTP and HTTPS URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use quote_harvest::url::parse_http_url;
///
/// let url = parse_http_url("https://quotes.toscrape.com").unwrap();
/// assert_eq!(url.as_str(), "https://quotes.toscrape.com/");
///
/// assert!(parse_http_url("ftp://quotes.toscrape.com").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves a pagination href against the page it was found on
///
/// Returns None for hrefs that cannot lead to another page:
/// - empty or fragment-only hrefs
/// - `javascript:` and `mailto:` links
/// - anything that does not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use quote_harvest::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://quotes.toscrape.com").unwrap();
/// let next = resolve_link("/page/2/", &base).unwrap();
/// assert_eq!(next.as_str(), "https://quotes.toscrape.com/page/2/");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

/// Returns true if both URLs point at the same page, ignoring fragments
pub fn same_page(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}
