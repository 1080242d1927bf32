//! Extraction strategies.
//!
//! Each strategy turns a post-redirect Maps URL into a [`BusinessRecord`].
//! Failures stay inside the strategy: it logs a [`crate::StrategyError`] and
//! returns whatever partial record it has, so the orchestrator only ever has
//! to look at [`BusinessRecord::is_sufficient`].

mod api;
mod basic;
pub mod browser;
mod html;

pub use api::ApiStrategy;
pub use basic::BasicStrategy;
pub use browser::{BrowserStrategy, PageSession};
pub use html::HtmlScrapeStrategy;

use gmaps2vcard_core::BusinessRecord;

use crate::features::UrlFeatures;

const PLACE_PAGE_SEGMENT: &str = "/maps/place/";

/// Whether `url` looks like a Maps place page worth fetching.
#[must_use]
pub fn is_place_page(url: &str) -> bool {
    url.contains(PLACE_PAGE_SEGMENT)
}

/// Record built from URL features alone: name and coordinates, nothing else.
#[must_use]
pub fn record_from_features(features: &UrlFeatures) -> BusinessRecord {
    BusinessRecord {
        name: features.place_name.clone(),
        latitude: features.latitude.clone(),
        longitude: features.longitude.clone(),
        ..BusinessRecord::default()
    }
}
