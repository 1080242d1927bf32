use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::*;

const PLACE_URL: &str = "https://www.google.com/maps/place/Joe's+Pizza/@40.7306,-74.0021,17z";

const SEARCH_URL: &str = "https://www.google.com/search?q=Joe%27s+Pizza&kgmid=/g/11abc";

#[derive(Default)]
struct FakeSession {
    landed: String,
    /// Navigating to a key lands on its value.
    routes: HashMap<String, String>,
    visited: Rc<RefCell<Vec<String>>>,
    fail_navigation: bool,
    texts: HashMap<&'static str, String>,
    attributes: HashMap<(&'static str, &'static str), String>,
    clickable: Vec<&'static str>,
    clicks: Rc<Cell<u32>>,
    broken_selectors: Vec<&'static str>,
    closed: Rc<Cell<u32>>,
}

impl FakeSession {
    fn landing_on(url: &str) -> Self {
        Self {
            landed: url.to_string(),
            ..Self::default()
        }
    }

    fn with_listing(mut self) -> Self {
        self.texts.insert(NAME_SELECTOR, "  Joe's Pizza \n".to_string());
        self.attributes.insert(
            (ADDRESS_SELECTOR, "aria-label"),
            "Address: 7 Carmine St, New York, NY 10014 ".to_string(),
        );
        self.attributes.insert(
            (PHONE_SELECTOR, "aria-label"),
            "Phone: (212) 366-1182".to_string(),
        );
        self.attributes.insert(
            (WEBSITE_SELECTOR, "href"),
            "https://www.joespizzanyc.com/".to_string(),
        );
        self
    }

    fn broken(&self, selector: &str) -> Result<(), StrategyError> {
        if self.broken_selectors.contains(&selector) {
            return Err(StrategyError::Browser(format!("detached node {selector}")));
        }
        Ok(())
    }
}

impl PageSession for FakeSession {
    fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), StrategyError> {
        if self.fail_navigation {
            return Err(StrategyError::Browser(format!("timed out loading {url}")));
        }
        self.visited.borrow_mut().push(url.to_string());
        if let Some(to) = self.routes.get(url) {
            self.landed.clone_from(to);
        }
        Ok(())
    }

    fn text(&self, selector: &str) -> Result<Option<String>, StrategyError> {
        self.broken(selector)?;
        Ok(self.texts.get(selector).cloned())
    }

    fn attribute(&self, selector: &str, attribute: &str) -> Result<Option<String>, StrategyError> {
        self.broken(selector)?;
        Ok(self.attributes.get(&(selector, attribute)).cloned())
    }

    fn click(&self, selector: &str) -> Result<bool, StrategyError> {
        self.broken(selector)?;
        let found = self.clickable.contains(&selector);
        if found {
            self.clicks.set(self.clicks.get() + 1);
        }
        Ok(found)
    }

    fn current_url(&self) -> String {
        self.landed.clone()
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

fn strategy() -> BrowserStrategy {
    BrowserStrategy::new("test-agent", Duration::from_secs(1), Duration::ZERO)
}

#[test]
fn reads_listing_and_strips_label_prefixes() {
    let session = FakeSession::landing_on(PLACE_URL).with_listing();
    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert_eq!(record.name.as_deref(), Some("Joe's Pizza"));
    assert_eq!(
        record.address.as_deref(),
        Some("7 Carmine St, New York, NY 10014")
    );
    assert_eq!(record.phone.as_deref(), Some("(212) 366-1182"));
    assert_eq!(
        record.website.as_deref(),
        Some("https://www.joespizzanyc.com/")
    );
}

#[test]
fn coordinates_come_from_the_landed_url() {
    let landed = "https://www.google.com/maps/place/Joe's+Pizza/@40.7305991,-74.0021,17z/data=!3m1";
    let session = FakeSession::landing_on(landed).with_listing();
    let record = strategy()
        .read_place(session, "https://maps.app.goo.gl/abc")
        .unwrap();

    assert_eq!(record.coordinates(), Some(("40.7305991", "-74.0021")));
}

#[test]
fn failing_field_leaves_other_fields_intact() {
    let mut session = FakeSession::landing_on(PLACE_URL).with_listing();
    session.broken_selectors.push(PHONE_SELECTOR);
    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert!(record.phone.is_none());
    assert_eq!(record.name.as_deref(), Some("Joe's Pizza"));
    assert!(record.address.is_some());
    assert!(record.website.is_some());
}

#[test]
fn missing_elements_yield_empty_fields() {
    let session = FakeSession::landing_on(PLACE_URL);
    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert!(!record.is_sufficient());
    assert!(record.address.is_none());
    assert_eq!(record.coordinates(), Some(("40.7306", "-74.0021")));
}

#[test]
fn session_closed_once_on_success() {
    let session = FakeSession::landing_on(PLACE_URL).with_listing();
    let closed = Rc::clone(&session.closed);
    strategy().read_place(session, PLACE_URL).unwrap();

    assert_eq!(closed.get(), 1);
}

#[test]
fn session_closed_once_when_navigation_fails() {
    let session = FakeSession {
        fail_navigation: true,
        ..FakeSession::landing_on(PLACE_URL)
    };
    let closed = Rc::clone(&session.closed);
    let err = strategy().read_place(session, PLACE_URL).unwrap_err();

    assert!(matches!(err, StrategyError::Browser(_)));
    assert_eq!(closed.get(), 1);
}

#[test]
fn bot_wall_aborts_and_closes() {
    let session =
        FakeSession::landing_on("https://www.google.com/sorry/index?continue=x").with_listing();
    let closed = Rc::clone(&session.closed);
    let err = strategy().read_place(session, PLACE_URL).unwrap_err();

    assert!(matches!(err, StrategyError::BotWall(_)));
    assert_eq!(closed.get(), 1);
}

#[test]
fn clean_label_handles_locales_and_plain_text() {
    assert_eq!(clean_label("Dirección: Calle Mayor 1"), "Calle Mayor 1");
    assert_eq!(clean_label("Teléfono: +34 912 34 56 78"), "+34 912 34 56 78");
    assert_eq!(clean_label("  Sitio web: acme.es "), "acme.es");
    assert_eq!(clean_label("Telephone: 555"), "555");
    assert_eq!(clean_label("7 Carmine St"), "7 Carmine St");
}

#[test]
fn hours_are_read_from_the_expanded_panel() {
    let mut session = FakeSession::landing_on(PLACE_URL).with_listing();
    session.clickable.push(HOURS_BUTTON_SELECTOR);
    session.texts.insert(
        BODY_SELECTOR,
        "Joe's Pizza\nHours\nMonday\n10 AM–11 PM\n\n  Tuesday \n10 AM–11 PM\nSuggest new hours\nPhotos"
            .to_string(),
    );
    let clicks = Rc::clone(&session.clicks);

    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert_eq!(clicks.get(), 1);
    assert_eq!(
        record.hours.as_deref(),
        Some("Monday\n10 AM–11 PM\nTuesday\n10 AM–11 PM")
    );
}

#[test]
fn hours_fall_back_to_the_summary_line() {
    let mut session = FakeSession::landing_on(PLACE_URL).with_listing();
    session.texts.insert(BODY_SELECTOR, "Joe's Pizza\nDirections".to_string());
    session.texts.insert(
        HOURS_PANEL_SELECTOR,
        "Cerrado\nlunes\t8:00–13:00\nmartes 8:00–13:00\nSugerir nuevo horario".to_string(),
    );

    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert_eq!(
        record.hours.as_deref(),
        Some("lunes 8:00–13:00\nmartes 8:00–13:00")
    );
}

#[test]
fn failing_hours_click_still_reads_other_fields() {
    let mut session = FakeSession::landing_on(PLACE_URL).with_listing();
    session.broken_selectors.push(HOURS_BUTTON_SELECTOR);

    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert!(record.hours.is_none());
    assert_eq!(record.name.as_deref(), Some("Joe's Pizza"));
}

#[test]
fn photo_comes_from_first_selector_with_a_web_url() {
    let mut session = FakeSession::landing_on(PLACE_URL).with_listing();
    session
        .attributes
        .insert((PHOTO_SELECTORS[0], "src"), "data:image/gif;base64,R0lGOD".to_string());
    session.attributes.insert(
        (PHOTO_SELECTORS[2], "src"),
        "https://lh5.googleusercontent.com/p/AF1QipN=w408-h306".to_string(),
    );

    let record = strategy().read_place(session, PLACE_URL).unwrap();

    assert_eq!(
        record.photo_url.as_deref(),
        Some("https://lh5.googleusercontent.com/p/AF1QipN=w408-h306")
    );
}

#[test]
fn search_page_is_followed_to_the_linked_place() {
    let place = "https://www.google.com/maps/place/Joe's+Pizza/@40.7306,-74.0021,17z";
    let mut session = FakeSession::landing_on(SEARCH_URL).with_listing();
    session.attributes.insert(
        SEARCH_PLACE_LINKS[0],
        "/maps/place/Joe's+Pizza/@40.7306,-74.0021,17z".to_string(),
    );
    session.routes.insert(place.to_string(), place.to_string());
    let visited = Rc::clone(&session.visited);

    let record = strategy().read_place(session, SEARCH_URL).unwrap();

    assert_eq!(*visited.borrow(), [SEARCH_URL.to_string(), place.to_string()]);
    assert_eq!(record.coordinates(), Some(("40.7306", "-74.0021")));
    assert_eq!(record.name.as_deref(), Some("Joe's Pizza"));
}

#[test]
fn search_page_accepts_data_url_links() {
    let place = "https://www.google.com/maps/place/Joe's+Pizza";
    let mut session = FakeSession::landing_on(SEARCH_URL);
    session
        .attributes
        .insert(SEARCH_PLACE_LINKS[1], place.to_string());
    let visited = Rc::clone(&session.visited);

    strategy().read_place(session, SEARCH_URL).unwrap();

    assert_eq!(visited.borrow().last().map(String::as_str), Some(place));
}

#[test]
fn search_page_without_place_link_aborts_and_closes() {
    let session = FakeSession::landing_on(SEARCH_URL).with_listing();
    let closed = Rc::clone(&session.closed);

    let err = strategy().read_place(session, SEARCH_URL).unwrap_err();

    assert!(matches!(err, StrategyError::NoPlaceLink(ref url) if url == SEARCH_URL));
    assert_eq!(closed.get(), 1);
}

#[test]
fn hours_section_stops_at_footer() {
    let body = "Overview\nHorario\njueves 8:00–13:00\nviernes 8:00–13:00\nOcultar el panel";
    assert_eq!(
        hours_section(body).as_deref(),
        Some("jueves 8:00–13:00\nviernes 8:00–13:00")
    );
    assert!(hours_section("Overview\nReviews").is_none());
    assert!(hours_section("Hours\nSuggest new hours").is_none());
}

#[test]
fn clean_hours_squeezes_whitespace_and_status_line() {
    assert_eq!(
        clean_hours("Closed\n\tMonday   9:00–17:00 \r\n\n\nTuesday 9:00–17:00\n"),
        "Monday 9:00–17:00\nTuesday 9:00–17:00"
    );
    assert_eq!(clean_hours("Closed"), "Closed");
}
