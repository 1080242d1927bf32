//! Opening-hours normalisation.
//!
//! Maps renders hours as loose text in the page locale, e.g.
//! `"jueves 8:00–13:00 15:00–18:00 viernes ... sábado domingo"` or the
//! Places API's `"Monday: 9:00 AM – 5:00 PM"` lines. [`WeekSchedule::parse`]
//! reads English or Spanish day names with 24-hour or AM/PM ranges, and its
//! `Display` groups consecutive identical days:
//! `"Mon-Fri 08:00-13:00, 15:00-18:00; Sat-Sun Closed"`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2})(?::(\d{2}))?\s*([ap])?\.?m?\.?\s*-\s*(\d{1,2})(?::(\d{2}))?\s*([ap])?\.?m?\.?",
    )
    .expect("valid regex")
});

/// Spanish day names and keywords rewritten to English before parsing.
const TRANSLATIONS: [(&str, &str); 10] = [
    ("lunes", "monday"),
    ("martes", "tuesday"),
    ("miércoles", "wednesday"),
    ("miercoles", "wednesday"),
    ("jueves", "thursday"),
    ("viernes", "friday"),
    ("sábado", "saturday"),
    ("sabado", "saturday"),
    ("domingo", "sunday"),
    ("cerrado", "closed"),
];

const ROUND_THE_CLOCK: [&str; 2] = ["24 hours", "24 horas"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Monday first.
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }

    fn english_name(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One opening period, both ends as zero-padded `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Opening periods for each day, Monday first. A day with no ranges is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [Vec<TimeRange>; 7],
}

impl WeekSchedule {
    /// Parse free-form hours text.
    ///
    /// Days that are absent, empty or marked closed come out closed. Returns
    /// `None` when no day name appears at all, or when a day carries text
    /// that is neither a time range nor a closed marker; callers then show
    /// the raw text instead of a guess.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let text = normalize_text(raw);

        let positions: Vec<(Weekday, usize)> = Weekday::ALL
            .iter()
            .filter_map(|&day| text.find(day.english_name()).map(|at| (day, at)))
            .collect();
        if positions.is_empty() {
            return None;
        }

        let mut schedule = Self::default();
        for &(day, at) in &positions {
            let from = at + day.english_name().len();
            let until = positions
                .iter()
                .map(|&(_, other)| other)
                .filter(|&other| other >= from)
                .min()
                .unwrap_or(text.len());
            let content = text[from..until].trim_matches(|c: char| c.is_whitespace() || c == ':');

            schedule.days[day.index()] = parse_day(content)?;
        }
        Some(schedule)
    }

    /// Ranges for `day`, empty when closed.
    #[must_use]
    pub fn ranges(&self, day: Weekday) -> &[TimeRange] {
        &self.days[day.index()]
    }

    #[must_use]
    pub fn is_closed(&self, day: Weekday) -> bool {
        self.days[day.index()].is_empty()
    }

    /// Runs of consecutive days sharing identical ranges.
    fn groups(&self) -> Vec<(Weekday, Weekday, &[TimeRange])> {
        let mut groups: Vec<(Weekday, Weekday, &[TimeRange])> = Vec::new();
        for day in Weekday::ALL {
            let ranges = self.ranges(day);
            if let Some((_, end, current)) = groups.last_mut() {
                if *current == ranges {
                    *end = day;
                    continue;
                }
            }
            groups.push((day, day, ranges));
        }
        groups
    }
}

impl fmt::Display for WeekSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (first, last, ranges)) in self.groups().into_iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(first.abbreviation())?;
            if first != last {
                write!(f, "-{}", last.abbreviation())?;
            }

            if ranges.is_empty() {
                f.write_str(" Closed")?;
                continue;
            }
            let mut sorted = ranges.to_vec();
            sorted.sort();
            let joined = sorted
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " {joined}")?;
        }
        Ok(())
    }
}

/// Hours text as it should be shown: the grouped schedule when the text
/// parses, otherwise the raw text on one line.
#[must_use]
pub fn display_hours(raw: &str) -> String {
    WeekSchedule::parse(raw).map_or_else(
        || {
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join("; ")
        },
        |schedule| schedule.to_string(),
    )
}

fn normalize_text(raw: &str) -> String {
    let dashed: String = raw
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{00a0}' | '\u{202f}' | '\u{2009}' => ' ',
            other => other,
        })
        .collect();
    let mut text = SPACES_RE.replace_all(&dashed, " ").to_lowercase();
    for (from, to) in TRANSLATIONS {
        text = text.replace(from, to);
    }
    text
}

/// `None` when `content` is something other than ranges or a closed marker.
fn parse_day(content: &str) -> Option<Vec<TimeRange>> {
    if content.is_empty() || content.contains("closed") {
        return Some(Vec::new());
    }
    if ROUND_THE_CLOCK.iter().any(|marker| content.contains(marker)) {
        return Some(vec![TimeRange {
            start: "00:00".to_string(),
            end: "24:00".to_string(),
        }]);
    }

    let ranges: Vec<TimeRange> = RANGE_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let start = to_24h(
                caps.get(1)?.as_str(),
                caps.get(2).map(|m| m.as_str()),
                caps.get(3).map(|m| m.as_str()),
            )?;
            let end = to_24h(
                caps.get(4)?.as_str(),
                caps.get(5).map(|m| m.as_str()),
                caps.get(6).map(|m| m.as_str()),
            )?;
            Some(TimeRange { start, end })
        })
        .collect();

    (!ranges.is_empty()).then_some(ranges)
}

/// A bare hour with neither minutes nor a meridiem is too ambiguous to keep.
fn to_24h(hour: &str, minute: Option<&str>, meridiem: Option<&str>) -> Option<String> {
    if minute.is_none() && meridiem.is_none() {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute = minute.unwrap_or("00");

    let hour = match meridiem {
        Some("a") if hour == 12 => 0,
        Some("p") if hour < 12 => hour + 12,
        _ => hour,
    };
    (hour <= 24).then(|| format!("{hour:02}:{minute}"))
}
