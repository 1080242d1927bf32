//! Identifiers recoverable from a Maps URL without any network call.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::Url;

static DATA_PLACE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!1s([^!]+)").expect("valid regex"));
static CID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!1s(0x[0-9a-fA-F]+:0x[0-9a-fA-F]+)").expect("valid regex"));
static PLACE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/place/([^/@?#]+)").expect("valid regex"));
static COORDINATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid regex"));

/// Identifiers pulled from a URL's path, query and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFeatures {
    pub place_id: Option<String>,
    pub knowledge_graph_id: Option<String>,
    pub place_name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl UrlFeatures {
    /// Extract every known identifier from `url`. Total: a URL that doesn't
    /// parse still gets the regex-based fields.
    #[must_use]
    pub fn extract(url: &str) -> Self {
        let parsed = Url::parse(url).ok();
        let (latitude, longitude) = extract_coordinates(url);
        Self {
            place_id: extract_place_id(url, parsed.as_ref()),
            knowledge_graph_id: parsed.as_ref().and_then(|u| query_param(u, "kgmid")),
            place_name: extract_place_name(url, parsed.as_ref()),
            latitude,
            longitude,
        }
    }
}

/// Place id, first match wins: `place_id` query parameter, then the `!1s`
/// entry of a `data=` blob (query parameter or path segment), then a
/// `!1s0x…:0x…` CID token anywhere in the URL.
fn extract_place_id(url: &str, parsed: Option<&Url>) -> Option<String> {
    if let Some(id) = parsed.and_then(|u| query_param(u, "place_id")) {
        return Some(id);
    }

    if let Some(blob) = parsed.and_then(data_blob) {
        if let Some(id) = DATA_PLACE_ID_RE
            .captures(&blob)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
        {
            return Some(id);
        }
    }

    CID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn data_blob(url: &Url) -> Option<String> {
    if let Some(data) = query_param(url, "data") {
        return Some(data);
    }
    url.path_segments()?
        .find_map(|seg| seg.strip_prefix("data="))
        .map(decode_component)
        .filter(|d| !d.is_empty())
}

/// Place name from a `/place/<name>` segment, else the `q` parameter.
fn extract_place_name(url: &str, parsed: Option<&Url>) -> Option<String> {
    if let Some(raw) = PLACE_NAME_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
    {
        let name = decode_component(raw);
        let name = name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    parsed.and_then(|u| query_param(u, "q"))
}

/// `(latitude, longitude)` from the first `@lat,lng` pair, kept verbatim.
#[must_use]
pub fn extract_coordinates(url: &str) -> (Option<String>, Option<String>) {
    match COORDINATES_RE.captures(url) {
        Some(c) => (
            c.get(1).map(|m| m.as_str().to_string()),
            c.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, None),
    }
}

/// Form-style decoding of a path component: `+` is a space, `%XX` escapes
/// are decoded (so `%2B` survives as a literal plus).
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
