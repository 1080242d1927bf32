//! vCard 3.0 serialization for [`BusinessRecord`].
//!
//! Produces one card per record with `FN`, an empty structured `N`, `ORG`,
//! and `ADR`/`TEL`/`URL`/`GEO`/`PHOTO` lines only when the matching field is
//! present. Opening hours go in a `NOTE`, normalised through
//! [`display_hours`] when they parse as a weekly schedule.
//! Lines end in CRLF and are folded at 75 octets.

use crate::record::BusinessRecord;
use crate::schedule::display_hours;

const FALLBACK_NAME: &str = "Unknown Business";
const FALLBACK_FILE_STEM: &str = "business";
const MAX_LINE_OCTETS: usize = 75;

/// Serialize a record as a vCard 3.0 document.
#[must_use]
pub fn to_vcard(record: &BusinessRecord) -> String {
    let name = present(record.name.as_deref()).unwrap_or(FALLBACK_NAME);

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape_text(name)),
        "N:;;;;".to_string(),
        format!("ORG:{}", escape_text(name)),
    ];

    if let Some(address) = present(record.address.as_deref()) {
        // PO box; extended; street; locality; region; postal code; country
        lines.push(format!("ADR;TYPE=WORK:;;{};;;;", escape_text(address)));
    }
    if let Some(phone) = present(record.phone.as_deref()) {
        lines.push(format!("TEL;TYPE=WORK:{}", escape_text(phone)));
    }
    if let Some(website) = present(record.website.as_deref()) {
        lines.push(format!("URL;TYPE=WORK:{website}"));
    }
    if let Some((lat, lng)) = record.coordinates() {
        lines.push(format!("GEO:{lat};{lng}"));
    }
    if let Some(photo) = present(record.photo_url.as_deref()) {
        lines.push(format!("PHOTO;VALUE=URI:{photo}"));
    }
    if let Some(hours) = present(record.hours.as_deref()) {
        let note = format!("Hours: {}", display_hours(hours));
        lines.push(format!("NOTE:{}", escape_text(&note)));
    }
    lines.push("END:VCARD".to_string());

    let mut out = String::new();
    for line in &lines {
        fold_line(line, &mut out);
    }
    out
}

/// File name for a record's card: the business name with `/` replaced by
/// `-`, or `business` when no name was resolved.
#[must_use]
pub fn vcard_file_name(record: &BusinessRecord) -> String {
    let stem = present(record.name.as_deref()).unwrap_or(FALLBACK_FILE_STEM);
    format!("{}.vcf", stem.replace('/', "-"))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Append `line` to `out`, folding so that no physical line exceeds
/// [`MAX_LINE_OCTETS`]. Continuation lines start with a single space, which
/// counts toward the limit. Never splits a UTF-8 sequence.
fn fold_line(line: &str, out: &mut String) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if used + len > budget {
            out.push_str("\r\n ");
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(ch);
        used += len;
    }
    out.push_str("\r\n");
}
