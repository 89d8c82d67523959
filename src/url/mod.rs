//! URL handling module for linkwalk
//!
//! This module provides seed parsing and reference resolution. URL identity
//! is the serialized form produced by the WHATWG parser; no further
//! canonicalization is applied, so `https://a.example/x` and
//! `https://a.example/x/` are distinct pages.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the seed URL given on the command line
///
/// The seed must be absolute and use `http` or `https`, since it is handed
/// straight to the HTTP client.
///
/// # Arguments
///
/// * `input` - The raw seed string
///
/// # Returns
///
/// * `Ok(Url)` - The parsed seed
/// * `Err(UrlError)` - The seed is malformed or uses another scheme
///
/// # Examples
///
/// ```
/// use linkwalk::url::parse_seed;
///
/// let seed = parse_seed("https://example.com/start").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/start");
///
/// assert!(parse_seed("not a url").is_err());
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input).map_err(|source| UrlError::Parse {
        input: input.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::UnsupportedScheme(other.to_string())),
    }
}

/// Resolves an href against the URL of the document it appeared in
///
/// Standard reference resolution: absolute hrefs replace the base, relative
/// ones are merged with its scheme, authority and path.
///
/// # Examples
///
/// ```
/// use linkwalk::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://a.example/dir/page.html").unwrap();
/// let resolved = resolve_href(&base, "../x?y=1").unwrap();
/// assert_eq!(resolved.as_str(), "https://a.example/x?y=1");
/// ```
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    base.join(href).map_err(|source| UrlError::Resolve {
        href: href.to_string(),
        base: base.to_string(),
        source,
    })
}
