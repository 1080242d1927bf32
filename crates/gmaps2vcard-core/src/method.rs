use std::fmt;

/// Which extraction strategy the resolver should run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMethod {
    /// Google Places details API; needs an API key.
    Api,
    /// Headless browser automation.
    Playwright,
    /// URL features plus a plain HTML fetch for place pages.
    #[default]
    Basic,
}

impl ExtractionMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Playwright => "playwright",
            Self::Basic => "basic",
        }
    }

    #[must_use]
    pub fn needs_api_key(self) -> bool {
        matches!(self, Self::Api)
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
