use thiserror::Error;

/// Errors that end or degrade a resolution run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid Google Maps URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to follow redirects for {url}: {source}")]
    RedirectFailure {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} is not set; the api method needs a Google Places API key")]
    MissingCredential(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Places(#[from] PlacesError),
}

/// Errors returned by the Places API client.
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Places {endpoint} returned status {status}{}", status_detail(.message.as_deref()))]
    Status {
        endpoint: &'static str,
        status: String,
        message: Option<String>,
    },

    #[error("no Places candidates for \"{query}\"")]
    NoCandidates { query: String },

    #[error("invalid Places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

fn status_detail(message: Option<&str>) -> String {
    message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Why an extraction strategy produced nothing useful.
///
/// Never escapes a strategy: each strategy logs it and hands back an empty
/// or partial record instead.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("URL carries no place id, knowledge-graph id or place name")]
    NoIdentifier,

    #[error(transparent)]
    Places(#[from] PlacesError),

    #[error("browser automation unavailable: {0}")]
    BrowserUnavailable(String),

    #[error("browser automation failed: {0}")]
    Browser(String),

    #[error("Google served a bot-check page at {0}")]
    BotWall(String),

    #[error("search page {0} links to no Maps place")]
    NoPlaceLink(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_includes_api_message() {
        let err = PlacesError::Status {
            endpoint: "details",
            status: "REQUEST_DENIED".to_string(),
            message: Some("The provided API key is invalid.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Places details returned status REQUEST_DENIED: The provided API key is invalid."
        );
    }

    #[test]
    fn status_error_without_message_ends_at_status() {
        let err = PlacesError::Status {
            endpoint: "findplacefromtext",
            status: "ZERO_RESULTS".to_string(),
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "Places findplacefromtext returned status ZERO_RESULTS"
        );
    }
}
