/// Business contact details resolved from a Maps link.
///
/// Every field is independently optional. A record without a name is still
/// valid output, but [`BusinessRecord::is_sufficient`] reports it as an
/// under-delivering extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessRecord {
    pub name: Option<String>,
    /// Single free-text address line.
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Decimal string, kept exactly as the upstream source delivered it.
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// Opening hours as scraped or returned by the API, before any
    /// schedule parsing.
    pub hours: Option<String>,
    pub photo_url: Option<String>,
}

impl BusinessRecord {
    /// A record is sufficient once it carries a non-blank name.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Both coordinates, or `None` when either one is missing.
    #[must_use]
    pub fn coordinates(&self) -> Option<(&str, &str)> {
        match (self.latitude.as_deref(), self.longitude.as_deref()) {
            (Some(lat), Some(lng)) if !lat.is_empty() && !lng.is_empty() => Some((lat, lng)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_insufficient() {
        assert!(!BusinessRecord::default().is_sufficient());
    }

    #[test]
    fn blank_name_is_insufficient() {
        let record = BusinessRecord {
            name: Some("   ".to_string()),
            ..BusinessRecord::default()
        };
        assert!(!record.is_sufficient());
    }

    #[test]
    fn named_record_is_sufficient() {
        let record = BusinessRecord {
            name: Some("Acme".to_string()),
            ..BusinessRecord::default()
        };
        assert!(record.is_sufficient());
    }

    #[test]
    fn coordinates_require_both_halves() {
        let mut record = BusinessRecord {
            latitude: Some("40.7128".to_string()),
            ..BusinessRecord::default()
        };
        assert_eq!(record.coordinates(), None);

        record.longitude = Some("-74.0060".to_string());
        assert_eq!(record.coordinates(), Some(("40.7128", "-74.0060")));
    }
}
