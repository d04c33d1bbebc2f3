use thiserror::Error;
use url::Url;

/// Why an article link may not be handed to the system opener.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Article has no link (`#` placeholder or blank).
    #[error("Article has no link")]
    Missing,
    /// The link string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The link uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The link has no host to connect to.
    #[error("URL has no host")]
    MissingHost,
}

/// Validate an article link before opening it in the browser.
///
/// Feed links come from third-party RSS sources, so anything that is not a
/// plain `http`/`https` URL with a host (`javascript:`, `file:`, custom
/// handlers) is rejected.
///
/// ```
/// use makedon_news::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://mia.mk/vest/1").is_ok());
/// assert!(validate_url_for_open("#").is_err());
/// assert!(validate_url_for_open("javascript:alert(1)").is_err());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(link: &str) -> Result<Url, LinkError> {
    let link = link.trim();
    if link.is_empty() || link == "#" {
        return Err(LinkError::Missing);
    }

    let url = Url::parse(link)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(LinkError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_https_accepted() {
        assert!(validate_url_for_open("https://www.bbc.com/news/1").is_ok());
        assert!(validate_url_for_open("http://example.mk:8080/a?b=c").is_ok());
    }

    #[test]
    fn test_placeholder_is_missing() {
        assert!(matches!(validate_url_for_open("#"), Err(LinkError::Missing)));
        assert!(matches!(validate_url_for_open("  "), Err(LinkError::Missing)));
    }

    #[test]
    fn test_other_schemes_rejected() {
        for link in ["javascript:alert(1)", "file:///etc/passwd", "ftp://example.com/x"] {
            assert!(
                matches!(validate_url_for_open(link), Err(LinkError::UnsupportedScheme(_))),
                "{} should be rejected",
                link
            );
        }
    }

    #[test]
    fn test_relative_link_invalid() {
        assert!(matches!(
            validate_url_for_open("/vesti/1"),
            Err(LinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let url = validate_url_for_open("  https://example.com/x \n").unwrap();
        assert_eq!(url.as_str(), "https://example.com/x");
    }
}
