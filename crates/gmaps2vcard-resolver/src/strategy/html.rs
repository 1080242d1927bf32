//! Plain-HTML scrape of a Maps place page.
//!
//! Best effort: three independent regexes run against raw, minified markup
//! with no JavaScript execution. Any of them may stop matching when Google
//! changes its page structure; a miss only leaves that field empty.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Url};

use gmaps2vcard_core::BusinessRecord;

use crate::features::UrlFeatures;
use crate::normalize::host_matches;
use crate::redirect::{is_bot_wall, BROWSER_ACCEPT, BROWSER_ACCEPT_LANGUAGE};
use crate::strategy::record_from_features;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]*?\b(?:Calle|Avenida|Street|Ave|Road|Rd)[^"]*)""#).expect("valid regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\+\d{1,3}[\d\s().\-]{6,20}\d)""#).expect("valid regex"));
static WEBSITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(https?://[^"\s\\<>]+)""#).expect("valid regex"));

const MIN_ADDRESS_CHARS: usize = 10;

/// Hosts whose links are never the business's own website: Google's asset
/// and tracking domains, plus markup namespaces.
const NON_BUSINESS_HOSTS: [&str; 5] = [
    "google.com",
    "gstatic.com",
    "googleapis.com",
    "w3.org",
    "schema.org",
];

pub struct HtmlScrapeStrategy {
    client: Client,
    timeout: Duration,
    user_agent: String,
}

impl HtmlScrapeStrategy {
    #[must_use]
    pub fn new(client: Client, timeout: Duration, user_agent: &str) -> Self {
        Self {
            client,
            timeout,
            user_agent: user_agent.to_owned(),
        }
    }

    /// Seed a record from the URL, then fill address, phone and website from
    /// the page markup. A failed fetch returns the URL-only record.
    pub async fn extract(&self, url: &str) -> BusinessRecord {
        let mut record = record_from_features(&UrlFeatures::extract(url));

        let html = match self.fetch_page(url).await {
            Ok(Some(html)) => html,
            Ok(None) => return record,
            Err(err) => {
                tracing::warn!(url, error = %err, "place page fetch failed; using URL data only");
                return record;
            }
        };

        record.address = scrape_address(&html);
        record.phone = scrape_phone(&html);
        record.website = scrape_website(&html);
        tracing::debug!(
            url,
            address = record.address.is_some(),
            phone = record.phone.is_some(),
            website = record.website.is_some(),
            "scraped place page"
        );
        record
    }

    /// Page body, or `None` when Google answered with its bot-check page.
    async fn fetch_page(&self, url: &str) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, BROWSER_ACCEPT)
            .header(ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
            .send()
            .await?
            .error_for_status()?;

        let landed = response.url().to_string();
        if is_bot_wall(&landed) {
            tracing::warn!(url, landed = %landed, "Google served a bot-check page; skipping markup");
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}

/// First quoted string of at least ten characters containing a street-type
/// keyword.
pub(crate) fn scrape_address(html: &str) -> Option<String> {
    ADDRESS_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| clean_quoted(m.as_str()))
        .find(|candidate| candidate.chars().count() >= MIN_ADDRESS_CHARS)
}

/// First quoted international-format phone number (`+<country> ...`).
pub(crate) fn scrape_phone(html: &str) -> Option<String> {
    PHONE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// First quoted http(s) URL whose host is not a Google or markup domain.
pub(crate) fn scrape_website(html: &str) -> Option<String> {
    WEBSITE_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|candidate| {
            Url::parse(candidate).ok().is_some_and(|u| {
                u.host_str().is_some_and(|host| {
                    !NON_BUSINESS_HOSTS
                        .iter()
                        .any(|blocked| host_matches(host, blocked))
                })
            })
        })
        .map(str::to_string)
}

fn clean_quoted(raw: &str) -> String {
    raw.trim_matches(|c: char| c == '\\' || c.is_whitespace())
        .to_string()
}
