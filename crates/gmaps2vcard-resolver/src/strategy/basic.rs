//! Default and fallback strategy.

use gmaps2vcard_core::BusinessRecord;

use crate::features::UrlFeatures;
use crate::strategy::{is_place_page, record_from_features, HtmlScrapeStrategy};

/// URL features only, plus an HTML scrape when the URL is a place page.
pub struct BasicStrategy {
    html: HtmlScrapeStrategy,
}

impl BasicStrategy {
    #[must_use]
    pub fn new(html: HtmlScrapeStrategy) -> Self {
        Self { html }
    }

    pub async fn extract(&self, url: &str) -> BusinessRecord {
        if is_place_page(url) {
            return self.html.extract(url).await;
        }
        record_from_features(&UrlFeatures::extract(url))
    }
}
