//! Redirect-chain resolution for short and share links.
//!
//! One HEAD request, escalated to a single GET if the HEAD transport fails.
//! No retry loop, no backoff.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, RequestBuilder, Url};

use crate::error::ResolveError;
use crate::normalize::host_matches;

const CONSENT_HOST: &str = "consent.google.com";
const SHARE_LINK_HOST: &str = "share.google";
const SHARE_LINK_REFERER: &str = "https://www.google.com/";
pub(crate) const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub(crate) const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Follow `url`'s redirect chain and return the final destination.
///
/// When the chain ends on Google's cookie-consent interstitial, the decoded
/// `continue` target is returned instead of the consent page.
///
/// # Errors
///
/// Returns [`ResolveError::RedirectFailure`] carrying the GET error when both
/// the HEAD request and the GET fallback fail at the transport level (including
/// timeouts).
pub async fn resolve_redirects(
    client: &Client,
    url: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<String, ResolveError> {
    let final_url = match browser_request(client.head(url), url, timeout, user_agent)
        .send()
        .await
    {
        Ok(response) => response.url().clone(),
        Err(head_err) => {
            tracing::debug!(url, error = %head_err, "HEAD request failed; retrying with GET");
            let response = browser_request(client.get(url), url, timeout, user_agent)
                .send()
                .await
                .map_err(|source| ResolveError::RedirectFailure {
                    url: url.to_string(),
                    source,
                })?;
            response.url().clone()
        }
    };

    if let Some(target) = unwrap_consent(&final_url) {
        tracing::debug!(consent = %final_url, continue_url = %target, "unwrapped consent interstitial");
        return Ok(target);
    }

    Ok(final_url.to_string())
}

/// The decoded `continue` target of a `consent.google.com` URL, if `url` is
/// one and carries a non-empty target.
#[must_use]
pub fn unwrap_consent(url: &Url) -> Option<String> {
    if !url.host_str().is_some_and(|h| h.eq_ignore_ascii_case(CONSENT_HOST)) {
        return None;
    }
    url.query_pairs()
        .find(|(k, _)| k == "continue")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Whether `url` points at Google's "unusual traffic" CAPTCHA page.
pub(crate) fn is_bot_wall(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| u.path().starts_with("/sorry/"))
}

fn browser_request(
    builder: RequestBuilder,
    url: &str,
    timeout: Duration,
    user_agent: &str,
) -> RequestBuilder {
    let builder = builder
        .timeout(timeout)
        .header(USER_AGENT, user_agent)
        .header(ACCEPT, BROWSER_ACCEPT)
        .header(ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE);

    let is_share_link = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| host_matches(h, SHARE_LINK_HOST)))
        .unwrap_or(false);
    if is_share_link {
        builder.header(REFERER, SHARE_LINK_REFERER)
    } else {
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_consent_continue_target() {
        let url = Url::parse(
            "https://consent.google.com/ml?continue=https%3A%2F%2Fmaps.google.com%2Fmaps%2Fplace%2FAcme%2F%4040.1%2C-74.2&gl=US",
        )
        .unwrap();
        assert_eq!(
            unwrap_consent(&url).as_deref(),
            Some("https://maps.google.com/maps/place/Acme/@40.1,-74.2")
        );
    }

    #[test]
    fn leaves_non_consent_hosts_alone() {
        let url = Url::parse("https://www.google.com/maps?continue=https%3A%2F%2Fx").unwrap();
        assert_eq!(unwrap_consent(&url), None);
    }

    #[test]
    fn consent_without_continue_is_not_unwrapped() {
        let url = Url::parse("https://consent.google.com/ml?gl=US").unwrap();
        assert_eq!(unwrap_consent(&url), None);
    }

    #[test]
    fn detects_sorry_page() {
        assert!(is_bot_wall(
            "https://www.google.com/sorry/index?continue=https://www.google.com/search"
        ));
        assert!(!is_bot_wall("https://www.google.com/maps/place/Acme"));
        assert!(!is_bot_wall("not a url"));
    }
}
