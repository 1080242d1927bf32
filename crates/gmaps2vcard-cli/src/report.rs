//! Human-readable extraction summary.

use std::fmt::Write as _;

use gmaps2vcard_core::{BusinessRecord, WeekSchedule};

const NOT_FOUND: &str = "(not found)";
const MAX_URL_CHARS: usize = 80;

/// The "Extracted information" block. Hours show as a grouped schedule
/// when they parse, otherwise as the raw text. `Location` appears only when
/// both coordinates are known.
pub(crate) fn summary(record: &BusinessRecord) -> String {
    let mut out = String::from("Extracted information:\n");
    for (label, value) in [
        ("Name", &record.name),
        ("Address", &record.address),
        ("Phone", &record.phone),
        ("Website", &record.website),
    ] {
        let _ = writeln!(out, "  {label}: {}", value.as_deref().unwrap_or(NOT_FOUND));
    }
    match record.hours.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
        Some(raw) => match WeekSchedule::parse(raw) {
            Some(schedule) => {
                let _ = writeln!(out, "  Hours: {schedule}");
            }
            None => {
                let _ = writeln!(out, "  Hours (raw): {}", one_line(raw));
            }
        },
        None => {
            let _ = writeln!(out, "  Hours: {NOT_FOUND}");
        }
    }
    if let Some((lat, lng)) = record.coordinates() {
        let _ = writeln!(out, "  Location: {lat}, {lng}");
    }
    out
}

fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// First 80 characters of `url`, with an ellipsis when cut.
pub(crate) fn truncate_url(url: &str) -> String {
    if url.chars().count() <= MAX_URL_CHARS {
        return url.to_string();
    }
    let head: String = url.chars().take(MAX_URL_CHARS).collect();
    format!("{head}...")
}
