//! HTTP client for the Google Places web service.
//!
//! Wraps `reqwest` with Places-specific status handling. Both endpoints
//! check the `"status"` field of the JSON envelope and surface anything
//! other than `"OK"` as [`PlacesError::Status`].

pub mod types;

use std::time::Duration;

use reqwest::{Client, Url};

use gmaps2vcard_core::BusinessRecord;

use crate::error::PlacesError;
use types::{DetailsResponse, FindPlaceResponse, DETAILS_FIELDS};

const STATUS_OK: &str = "OK";

/// Client for the Places `details` and `findplacefromtext` endpoints.
///
/// Use [`PlacesClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout: Duration,
}

impl PlacesClient {
    /// Creates a client rooted at `base_url` (normally
    /// `https://maps.googleapis.com/maps/api/place/`).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        client: Client,
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, PlacesError> {
        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            timeout,
        })
    }

    /// Fetches name, address, phone, website and location for a place id.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if the API answers with a non-`OK` status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<BusinessRecord, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        let body: DetailsResponse = self
            .request_json(&url, &format!("details(place_id={place_id})"))
            .await?;

        if body.status != STATUS_OK {
            return Err(PlacesError::Status {
                endpoint: "details",
                status: body.status,
                message: body.error_message,
            });
        }

        Ok(body.result.unwrap_or_default().into())
    }

    /// Runs a text search and returns the first candidate's place id.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if the API answers with a non-`OK` status.
    /// - [`PlacesError::NoCandidates`] if the search returned no candidates.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] as for
    ///   [`PlacesClient::place_details`].
    pub async fn find_place_id(&self, query: &str) -> Result<String, PlacesError> {
        let url = self.build_url(
            "findplacefromtext/json",
            &[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "place_id"),
            ],
        )?;
        let body: FindPlaceResponse = self
            .request_json(&url, &format!("findplacefromtext(input={query})"))
            .await?;

        if body.status != STATUS_OK {
            return Err(PlacesError::Status {
                endpoint: "findplacefromtext",
                status: body.status,
                message: body.error_message,
            });
        }

        body.candidates
            .into_iter()
            .next()
            .map(|c| c.place_id)
            .ok_or_else(|| PlacesError::NoCandidates {
                query: query.to_string(),
            })
    }

    /// Endpoint URL with percent-encoded query parameters; the API key is
    /// always appended last.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, PlacesError> {
        // reqwest errors render their URL, and ours carries the API key.
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;
        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url(Client::new(), "test-key", base_url, Duration::from_secs(5))
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_joins_endpoint_and_appends_key() {
        let client = test_client("https://maps.googleapis.com/maps/api/place");
        let url = client
            .build_url("details/json", &[("place_id", "ChIJ1"), ("fields", "name")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/details/json?place_id=ChIJ1&fields=name&key=test-key"
        );
    }

    #[test]
    fn build_url_tolerates_trailing_slashes() {
        let client = test_client("https://maps.googleapis.com/maps/api/place///");
        let url = client.build_url("findplacefromtext/json", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/findplacefromtext/json?key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.googleapis.com/maps/api/place/");
        let url = client
            .build_url("findplacefromtext/json", &[("input", "Joe's Pizza & Pasta")])
            .unwrap();
        assert!(
            url.as_str().contains("input=Joe%27s+Pizza+%26+Pasta"),
            "input should be form-encoded: {url}"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result =
            PlacesClient::with_base_url(Client::new(), "k", "not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
    }
}
