//! Headless-browser strategy.
//!
//! Renders the place page in a real browser and reads the populated DOM,
//! including the business photo and the expanded opening-hours panel. A
//! Google search result page is first followed to the place page it links.
//! Browser work is blocking, so it runs on tokio's blocking pool. When no
//! browser can be launched the strategy returns an empty record, which
//! sends the orchestrator to its fallback.

#[cfg(feature = "browser")]
mod chrome;

use std::time::Duration;

use gmaps2vcard_core::BusinessRecord;

use crate::error::StrategyError;
use crate::features::extract_coordinates;
use crate::redirect::is_bot_wall;
use crate::strategy::is_place_page;

const NAME_SELECTOR: &str = "h1";
const ADDRESS_SELECTOR: &str = r#"button[data-item-id="address"]"#;
const PHONE_SELECTOR: &str = r#"button[data-item-id*="phone"]"#;
const WEBSITE_SELECTOR: &str = r#"a[data-item-id="authority"]"#;
const HOURS_BUTTON_SELECTOR: &str = r#"button[data-item-id="oh"]"#;
const HOURS_PANEL_SELECTOR: &str = "div.OqCZI.fontBodyMedium.WVXvdc";
const BODY_SELECTOR: &str = "body";

/// Tried in order; the hero image comes first.
const PHOTO_SELECTORS: [&str; 5] = [
    r#"button[jsaction*="pane.heroHeaderImage"] img"#,
    "div.ZKCDEc img",
    r#"img[src*="googleusercontent.com"]"#,
    r#"img[src*="gstatic.com/images"]"#,
    "button.aoRNLd img",
];

/// Links from a search result's knowledge panel to the place page.
const SEARCH_PLACE_LINKS: [(&str, &str); 2] = [
    (
        r#"div[data-attrid="kc:/location/location:address"] a[href*="/maps/place/"]"#,
        "href",
    ),
    (r#"a[data-url*="/maps/place/"]"#, "data-url"),
];
const SEARCH_ORIGIN: &str = "https://www.google.com";

/// Headings that open the hours panel in the page text.
const HOURS_HEADINGS: [&str; 3] = ["Hours\n", "Horas\n", "Horario\n"];
/// Link text at the foot of the hours list.
const HOURS_FOOTERS: [&str; 2] = ["Suggest new hours", "Sugerir nuevo horario"];
const PANEL_CLOSERS: [&str; 2] = ["Hide", "Ocultar el panel"];
const HOURS_EXPAND_DELAY: Duration = Duration::from_secs(1);

/// Locale prefixes Maps puts in front of accessible labels.
const LABEL_PREFIXES: [&str; 7] = [
    "Address: ",
    "Dirección: ",
    "Phone: ",
    "Telephone: ",
    "Teléfono: ",
    "Website: ",
    "Sitio web: ",
];

/// The slice of browser automation this strategy needs.
pub trait PageSession {
    /// Load `url` and wait, up to `timeout`, for the page to settle.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Browser`] if navigation fails or times out.
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), StrategyError>;

    /// Text content of the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Browser`] if the DOM query fails.
    fn text(&self, selector: &str) -> Result<Option<String>, StrategyError>;

    /// Value of `attribute` on the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Browser`] if the DOM query fails.
    fn attribute(&self, selector: &str, attribute: &str)
        -> Result<Option<String>, StrategyError>;

    /// Click the first element matching `selector`. `Ok(false)` when there
    /// is no such element.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Browser`] if the click fails.
    fn click(&self, selector: &str) -> Result<bool, StrategyError>;

    /// URL the page ended up on after client-side redirects.
    fn current_url(&self) -> String;

    /// Release the session. Called exactly once, on every exit path.
    fn close(&mut self);
}

/// Closes the wrapped session when dropped.
struct SessionGuard<S: PageSession> {
    session: S,
}

impl<S: PageSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}

#[derive(Debug, Clone)]
pub struct BrowserStrategy {
    user_agent: String,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl BrowserStrategy {
    #[must_use]
    pub fn new(user_agent: &str, navigation_timeout: Duration, settle_delay: Duration) -> Self {
        Self {
            user_agent: user_agent.to_owned(),
            navigation_timeout,
            settle_delay,
        }
    }

    /// Never fails: an unavailable browser, a navigation error or a bot-check
    /// page all yield an empty record.
    pub async fn extract(&self, url: &str) -> BusinessRecord {
        let strategy = self.clone();
        let target = url.to_owned();
        let task = tokio::task::spawn_blocking(move || {
            let session = launch_session(&strategy.user_agent)?;
            strategy.read_place(session, &target)
        });

        match task.await {
            Ok(Ok(record)) => record,
            Ok(Err(err)) => {
                tracing::warn!(url, error = %err, "browser extraction failed");
                BusinessRecord::default()
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "browser task panicked");
                BusinessRecord::default()
            }
        }
    }

    /// Navigate `session` to `url` and read the place's fields. Each field
    /// read is isolated; only navigation failure, a bot-check page or a
    /// search page without a place link aborts. The session is closed on
    /// every path.
    ///
    /// # Errors
    ///
    /// - [`StrategyError::Browser`] if navigation fails.
    /// - [`StrategyError::BotWall`] if Google answered with its CAPTCHA page.
    /// - [`StrategyError::NoPlaceLink`] if a search page links no place.
    pub fn read_place<S: PageSession>(
        &self,
        session: S,
        url: &str,
    ) -> Result<BusinessRecord, StrategyError> {
        let mut guard = SessionGuard { session };
        let mut landed = self.open(&mut guard.session, url)?;

        if is_search_page(&landed) {
            let place_url = find_place_link(&guard.session)
                .ok_or_else(|| StrategyError::NoPlaceLink(landed.clone()))?;
            tracing::debug!(
                search = %landed,
                place = %place_url,
                "following search result to place page"
            );
            landed = self.open(&mut guard.session, &place_url)?;
        }

        let page = &guard.session;
        let name = read_field("name", page.text(NAME_SELECTOR)).map(|n| n.trim().to_string());
        let address = read_field("address", page.attribute(ADDRESS_SELECTOR, "aria-label"))
            .map(|a| clean_label(&a));
        let phone = read_field("phone", page.attribute(PHONE_SELECTOR, "aria-label"))
            .map(|p| clean_label(&p));
        let website = read_field("website", page.attribute(WEBSITE_SELECTOR, "href"));
        // The photo is read before any click can open an overlay over it.
        let photo_url = read_photo(page);
        let hours = self.read_hours(page);
        let (latitude, longitude) = extract_coordinates(&landed);

        Ok(BusinessRecord {
            name: name.filter(|n| !n.is_empty()),
            address: address.filter(|a| !a.is_empty()),
            phone: phone.filter(|p| !p.is_empty()),
            website: website.filter(|w| !w.trim().is_empty()),
            latitude,
            longitude,
            hours,
            photo_url,
        })
    }

    /// Navigate, let scripts settle, and return the landed URL unless it is
    /// the bot-check page.
    fn open<S: PageSession>(&self, session: &mut S, url: &str) -> Result<String, StrategyError> {
        session.navigate(url, self.navigation_timeout)?;
        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }

        let landed = session.current_url();
        if is_bot_wall(&landed) {
            return Err(StrategyError::BotWall(landed));
        }
        Ok(landed)
    }

    /// Expand the hours panel and read the schedule out of the page text,
    /// falling back to the collapsed summary line.
    fn read_hours<S: PageSession>(&self, page: &S) -> Option<String> {
        if click_field("hours", page.click(HOURS_BUTTON_SELECTOR)) {
            let pause = self.settle_delay.min(HOURS_EXPAND_DELAY);
            if !pause.is_zero() {
                std::thread::sleep(pause);
            }
        }

        read_field("hours", page.text(BODY_SELECTOR))
            .and_then(|body| hours_section(&body))
            .or_else(|| read_field("hours", page.text(HOURS_PANEL_SELECTOR)))
            .map(|raw| clean_hours(&raw))
            .filter(|h| !h.is_empty())
    }
}

fn click_field(field: &str, result: Result<bool, StrategyError>) -> bool {
    result.unwrap_or_else(|err| {
        tracing::debug!(field, error = %err, "browser click failed");
        false
    })
}

fn read_photo<S: PageSession>(page: &S) -> Option<String> {
    PHOTO_SELECTORS.iter().find_map(|selector| {
        read_field("photo", page.attribute(selector, "src"))
            .map(|src| src.trim().to_string())
            .filter(|src| src.starts_with("http"))
    })
}

/// A Google web search result rather than a Maps page.
fn is_search_page(url: &str) -> bool {
    !is_place_page(url)
        && reqwest::Url::parse(url).is_ok_and(|u| u.path().starts_with("/search"))
}

/// Absolute place-page URL linked from a search result, if any.
fn find_place_link<S: PageSession>(page: &S) -> Option<String> {
    SEARCH_PLACE_LINKS.iter().find_map(|(selector, attribute)| {
        read_field("place link", page.attribute(selector, attribute))
            .map(|link| link.trim().to_string())
            .filter(|link| !link.is_empty())
            .map(|link| {
                if link.starts_with('/') {
                    format!("{SEARCH_ORIGIN}{link}")
                } else {
                    link
                }
            })
    })
}

/// The text between an hours heading and the panel's footer.
fn hours_section(body: &str) -> Option<String> {
    let start = HOURS_HEADINGS
        .iter()
        .find_map(|heading| body.find(heading).map(|at| at + heading.len()))?;
    let rest = &body[start..];
    let end = HOURS_FOOTERS
        .iter()
        .chain(&PANEL_CLOSERS)
        .find_map(|marker| rest.find(marker))
        .unwrap_or(rest.len());

    let section = rest[..end].trim();
    (!section.is_empty()).then(|| section.to_string())
}

/// Tidy scraped hours: drop the footer link text and a leading bare
/// "Closed"/"Cerrado" status line, trim every line, and squeeze runs of
/// spaces and blank lines.
fn clean_hours(raw: &str) -> String {
    let without_footer = HOURS_FOOTERS
        .iter()
        .find_map(|marker| raw.find(marker))
        .map_or(raw, |at| &raw[..at]);

    let lines: Vec<String> = without_footer
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();

    let status_line = lines
        .first()
        .is_some_and(|l| l.eq_ignore_ascii_case("closed") || l.eq_ignore_ascii_case("cerrado"));
    let skip = usize::from(status_line && lines.len() > 1);
    lines[skip..].join("\n")
}

/// Collapse one field lookup to an optional value, logging failures.
fn read_field(field: &str, result: Result<Option<String>, StrategyError>) -> Option<String> {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(field, error = %err, "browser field read failed");
            None
        }
    }
}

/// Strip a leading locale prefix (`Address: `, `Teléfono: `, ...) from an
/// accessible label.
pub(crate) fn clean_label(label: &str) -> String {
    let trimmed = label.trim();
    LABEL_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

#[cfg(feature = "browser")]
fn launch_session(user_agent: &str) -> Result<chrome::ChromeSession, StrategyError> {
    chrome::ChromeSession::launch(user_agent)
}

#[cfg(not(feature = "browser"))]
fn launch_session(_user_agent: &str) -> Result<UnavailableSession, StrategyError> {
    Err(StrategyError::BrowserUnavailable(
        "built without the `browser` feature".to_string(),
    ))
}

#[cfg(not(feature = "browser"))]
enum UnavailableSession {}

#[cfg(not(feature = "browser"))]
impl PageSession for UnavailableSession {
    fn navigate(&mut self, _url: &str, _timeout: Duration) -> Result<(), StrategyError> {
        match *self {}
    }

    fn text(&self, _selector: &str) -> Result<Option<String>, StrategyError> {
        match *self {}
    }

    fn attribute(&self, _selector: &str, _attribute: &str) -> Result<Option<String>, StrategyError> {
        match *self {}
    }

    fn click(&self, _selector: &str) -> Result<bool, StrategyError> {
        match *self {}
    }

    fn current_url(&self) -> String {
        match *self {}
    }

    fn close(&mut self) {
        match *self {}
    }
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod tests;
