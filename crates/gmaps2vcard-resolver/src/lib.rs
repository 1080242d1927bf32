//! Turns a Google Maps link into a [`gmaps2vcard_core::BusinessRecord`].
//!
//! The pipeline validates the link, follows its redirect chain, then runs
//! one of three extraction strategies with a single fallback to basic
//! extraction. Entry point is [`Resolver`].

pub mod error;
pub mod features;
pub mod normalize;
pub mod pipeline;
pub mod places;
pub mod redirect;
pub mod strategy;

pub use error::{PlacesError, ResolveError, StrategyError};
pub use features::{extract_coordinates, UrlFeatures};
pub use normalize::{normalize, ValidatedUrl};
pub use pipeline::{Advisory, Resolution, Resolver, ResolverSettings, API_KEY_VAR};
pub use places::PlacesClient;
pub use redirect::resolve_redirects;
