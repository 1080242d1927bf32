//! Validation of user-supplied Google Maps links.
//!
//! Pure string/URL work, no network access.

use reqwest::Url;

use crate::error::ResolveError;

/// Hosts accepted as Google Maps or share-link origins. A host matches when
/// it equals one of these or ends with `.` + one of these.
pub const ALLOWED_HOSTS: [&str; 5] = [
    "share.google",
    "maps.google.com",
    "www.google.com",
    "google.com",
    "goo.gl",
];

const SHARE_LINK_HOST: &str = "share.google";

/// A link that passed [`normalize`]: http(s), has a host, host is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    raw: String,
    url: Url,
}

impl ValidatedUrl {
    /// The link exactly as the caller supplied it (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Whether this is a `share.google` short link. Google tends to block
    /// non-browser clients on these.
    #[must_use]
    pub fn is_share_link(&self) -> bool {
        host_matches(self.host(), SHARE_LINK_HOST)
    }
}

/// Validate that `raw` is an http(s) link on a Google Maps domain.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidUrl`] when the link does not parse, uses a
/// scheme other than `http`/`https`, has no host, or its host is not one of
/// [`ALLOWED_HOSTS`] (or a subdomain of one).
pub fn normalize(raw: &str) -> Result<ValidatedUrl, ResolveError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ResolveError::InvalidUrl {
        url: trimmed.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(format!("could not parse URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "URL must use http or https, got {}",
            url.scheme()
        )));
    }

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.to_ascii_lowercase(),
        _ => return Err(invalid("URL must have a valid domain".to_string())),
    };

    if !is_allowed_host(&host) {
        return Err(invalid(format!(
            "URL must be from a Google Maps domain, got: {host}"
        )));
    }

    Ok(ValidatedUrl {
        raw: trimmed.to_string(),
        url,
    })
}

/// Label-anchored allow-list check: `maps.google.com` and `google.com`
/// pass, `evilgoogle.com` does not.
#[must_use]
pub fn is_allowed_host(host: &str) -> bool {
    let host = host.trim_end_matches('.');
    ALLOWED_HOSTS
        .iter()
        .any(|allowed| host_matches(host, allowed))
}

pub(crate) fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
