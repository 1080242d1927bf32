//! Places API strategy.

use gmaps2vcard_core::BusinessRecord;

use crate::error::StrategyError;
use crate::features::UrlFeatures;
use crate::places::PlacesClient;

/// Looks the place up through the Places details API.
///
/// Identifier preference: place id, then knowledge-graph id reused as a
/// place id (best effort, the details endpoint may reject it), then a
/// find-place text search on the place name.
pub struct ApiStrategy {
    places: PlacesClient,
}

impl ApiStrategy {
    #[must_use]
    pub fn new(places: PlacesClient) -> Self {
        Self { places }
    }

    /// Never fails: any error is logged and yields an empty record.
    pub async fn extract(&self, url: &str) -> BusinessRecord {
        match self.try_extract(url).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(url, error = %err, "Places API lookup failed");
                BusinessRecord::default()
            }
        }
    }

    /// # Errors
    ///
    /// - [`StrategyError::NoIdentifier`] if the URL carries nothing to look up.
    /// - [`StrategyError::Places`] for any Places API or transport failure,
    ///   including a rejected knowledge-graph id.
    pub async fn try_extract(&self, url: &str) -> Result<BusinessRecord, StrategyError> {
        let features = UrlFeatures::extract(url);

        if let Some(place_id) = features.place_id.as_deref() {
            tracing::debug!(place_id, "looking up place details by place id");
            return Ok(self.places.place_details(place_id).await?);
        }

        if let Some(kgmid) = features.knowledge_graph_id.as_deref() {
            tracing::debug!(kgmid, "trying knowledge-graph id as a place id");
            return Ok(self.places.place_details(kgmid).await?);
        }

        if let Some(name) = features.place_name.as_deref() {
            tracing::debug!(name, "searching Places by name");
            let place_id = self.places.find_place_id(name).await?;
            return Ok(self.places.place_details(&place_id).await?);
        }

        Err(StrategyError::NoIdentifier)
    }
}
