//! Google Places web-service response types.
//!
//! Both endpoints answer with a `{"status": "OK", ...}` envelope; any other
//! status (`ZERO_RESULTS`, `INVALID_REQUEST`, `REQUEST_DENIED`, ...) means the
//! payload fields are absent or meaningless.

use serde::Deserialize;

use gmaps2vcard_core::BusinessRecord;

/// Fields requested from the details endpoint. Billing follows the field
/// list, so only what ends up on the record is asked for.
pub const DETAILS_FIELDS: &str =
    "name,formatted_address,formatted_phone_number,website,geometry/location,opening_hours";

// ---------------------------------------------------------------------------
// findplacefromtext
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    pub status: String,
    #[serde(default)]
    pub candidates: Vec<PlaceCandidate>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: String,
}

// ---------------------------------------------------------------------------
// details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub location: Option<LatLng>,
}

/// Coordinates kept as JSON numbers so their text form is exactly what the
/// API delivered.
#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: serde_json::Number,
    pub lng: serde_json::Number,
}

/// Only the human-readable per-day lines are used; `periods` would need
/// the place's locale to render.
#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

impl From<PlaceDetails> for BusinessRecord {
    fn from(details: PlaceDetails) -> Self {
        let location = details.geometry.and_then(|g| g.location);
        Self {
            name: non_blank(details.name),
            address: non_blank(details.formatted_address),
            phone: non_blank(details.formatted_phone_number),
            website: non_blank(details.website),
            latitude: location.as_ref().map(|l| l.lat.to_string()),
            longitude: location.as_ref().map(|l| l.lng.to_string()),
            hours: details
                .opening_hours
                .map(|h| h.weekday_text.join("\n"))
                .filter(|h| !h.trim().is_empty()),
            photo_url: None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
