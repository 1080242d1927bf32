//! Resolution orchestrator: normalize, follow redirects, run the chosen
//! strategy, and fall back to basic extraction at most once.

use std::fmt;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use gmaps2vcard_core::config::{DEFAULT_PLACES_BASE_URL, DEFAULT_USER_AGENT};
use gmaps2vcard_core::{AppConfig, BusinessRecord, ExtractionMethod};

use crate::error::ResolveError;
use crate::normalize::{normalize, ValidatedUrl};
use crate::places::PlacesClient;
use crate::redirect::resolve_redirects;
use crate::strategy::{ApiStrategy, BasicStrategy, BrowserStrategy, HtmlScrapeStrategy};

/// Environment variable named in [`ResolveError::MissingCredential`].
pub const API_KEY_VAR: &str = "GOOGLE_PLACES_API_KEY";

const MAX_REDIRECTS: usize = 10;

/// Everything the resolver needs, passed in explicitly rather than read
/// from the environment.
#[derive(Clone)]
pub struct ResolverSettings {
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
}

impl ResolverSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            places_api_key: config.places_api_key.clone(),
            places_base_url: config.places_base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            user_agent: config.user_agent.clone(),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            places_api_key: None,
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout: Duration::from_millis(30_000),
            settle_delay: Duration::from_millis(2_000),
        }
    }
}

impl fmt::Debug for ResolverSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverSettings")
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("navigation_timeout", &self.navigation_timeout)
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}

/// Non-fatal conditions worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Redirects could not be followed; the pre-redirect URL was used.
    RedirectFailed { reason: String },
    /// A `share.google` link failed to resolve without a real browser.
    ShareLinkBlocked,
    /// The chosen method produced no name; basic extraction was used instead.
    FellBack { method: ExtractionMethod },
    /// No business name could be resolved by any strategy.
    NoBusinessName,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedirectFailed { reason } => write!(f, "Could not follow redirects: {reason}"),
            Self::ShareLinkBlocked => f.write_str(
                "share.google links block programmatic access; try --method playwright, \
                 or open the link in a browser and copy the full Google Maps URL",
            ),
            Self::FellBack { method } => write!(
                f,
                "{method} method found no business name, falling back to basic extraction"
            ),
            Self::NoBusinessName => f.write_str(
                "Could not extract business name; vCard may be incomplete. \
                 Try --method api or --method playwright",
            ),
        }
    }
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub input_url: String,
    pub final_url: String,
    pub method: ExtractionMethod,
    pub fallback_used: bool,
    pub record: BusinessRecord,
    pub advisories: Vec<Advisory>,
}

impl Resolution {
    /// Whether redirect following landed somewhere other than the input.
    #[must_use]
    pub fn redirected(&self) -> bool {
        self.final_url != self.input_url
    }
}

/// Runs the full link-to-record pipeline.
pub struct Resolver {
    client: Client,
    settings: ResolverSettings,
    places: Option<PlacesClient>,
}

impl Resolver {
    /// # Errors
    ///
    /// - [`ResolveError::Http`] if the HTTP client cannot be constructed.
    /// - [`ResolveError::Places`] if the Places base URL does not parse.
    pub fn new(settings: ResolverSettings) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .connect_timeout(settings.request_timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        let places = match settings.places_api_key.as_deref() {
            Some(key) => Some(PlacesClient::with_base_url(
                client.clone(),
                key,
                &settings.places_base_url,
                settings.request_timeout,
            )?),
            None => None,
        };

        Ok(Self {
            client,
            settings,
            places,
        })
    }

    /// Pre-flight check: `method` can run with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingCredential`] when `method` is
    /// [`ExtractionMethod::Api`] and no API key is configured.
    pub fn ensure_credentials(&self, method: ExtractionMethod) -> Result<(), ResolveError> {
        if method.needs_api_key() && self.places.is_none() {
            return Err(ResolveError::MissingCredential(API_KEY_VAR.to_string()));
        }
        Ok(())
    }

    /// Validate `raw` and resolve it to a record.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingCredential`] before any network activity.
    /// - [`ResolveError::InvalidUrl`] if `raw` is not a Google Maps link.
    pub async fn resolve(
        &self,
        raw: &str,
        method: ExtractionMethod,
    ) -> Result<Resolution, ResolveError> {
        self.ensure_credentials(method)?;
        let validated = normalize(raw)?;
        self.resolve_validated(&validated, method).await
    }

    /// Resolve an already-validated link. Redirect and strategy failures
    /// degrade into advisories; only a missing credential is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingCredential`] as [`Resolver::ensure_credentials`].
    pub async fn resolve_validated(
        &self,
        url: &ValidatedUrl,
        method: ExtractionMethod,
    ) -> Result<Resolution, ResolveError> {
        self.ensure_credentials(method)?;
        let mut advisories = Vec::new();

        let redirect = resolve_redirects(
            &self.client,
            url.as_str(),
            self.settings.request_timeout,
            &self.settings.user_agent,
        )
        .await;
        let final_url = landing_url(url, method, redirect, &mut advisories);
        tracing::debug!(final_url = %final_url, %method, "extracting business data");

        let (record, fallback_used) = self.extract(method, &final_url).await;
        note_extraction(method, fallback_used, &record, &mut advisories);

        Ok(Resolution {
            input_url: url.as_str().to_string(),
            final_url,
            method,
            fallback_used,
            record,
            advisories,
        })
    }

    /// Run `method` on an already-resolved URL; if it yields no name, run
    /// basic extraction once and use that instead. The flag reports whether
    /// the fallback ran.
    pub async fn extract(
        &self,
        method: ExtractionMethod,
        final_url: &str,
    ) -> (BusinessRecord, bool) {
        let record = match method {
            ExtractionMethod::Api => match &self.places {
                Some(places) => ApiStrategy::new(places.clone()).extract(final_url).await,
                None => BusinessRecord::default(),
            },
            ExtractionMethod::Playwright => {
                BrowserStrategy::new(
                    &self.settings.user_agent,
                    self.settings.navigation_timeout,
                    self.settings.settle_delay,
                )
                .extract(final_url)
                .await
            }
            // Basic is its own fallback target; running it twice changes nothing.
            ExtractionMethod::Basic => return (self.basic().extract(final_url).await, false),
        };

        if record.is_sufficient() {
            return (record, false);
        }
        tracing::warn!(%method, "strategy found no business name; falling back to basic");
        (self.basic().extract(final_url).await, true)
    }

    fn basic(&self) -> BasicStrategy {
        BasicStrategy::new(HtmlScrapeStrategy::new(
            self.client.clone(),
            self.settings.request_timeout,
            &self.settings.user_agent,
        ))
    }
}

/// URL to extract from. A failed redirect degrades to the link as given,
/// with an advisory; share links additionally get the browser hint unless
/// the browser is already the chosen method.
fn landing_url(
    url: &ValidatedUrl,
    method: ExtractionMethod,
    redirect: Result<String, ResolveError>,
    advisories: &mut Vec<Advisory>,
) -> String {
    match redirect {
        Ok(final_url) => final_url,
        Err(err) => {
            tracing::warn!(
                url = url.as_str(),
                error = %err,
                "redirects not followed; using original URL"
            );
            advisories.push(Advisory::RedirectFailed {
                reason: err.to_string(),
            });
            if url.is_share_link() && method != ExtractionMethod::Playwright {
                advisories.push(Advisory::ShareLinkBlocked);
            }
            url.as_str().to_string()
        }
    }
}

fn note_extraction(
    method: ExtractionMethod,
    fallback_used: bool,
    record: &BusinessRecord,
    advisories: &mut Vec<Advisory>,
) {
    if fallback_used {
        advisories.push(Advisory::FellBack { method });
    }
    if !record.is_sufficient() {
        advisories.push(Advisory::NoBusinessName);
    }
}
