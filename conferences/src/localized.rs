use database::Translations;
use serde::{Deserialize, Serialize};

/// Text stored per locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(Translations);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(locale.into(), value.into());
        self
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Whether `locale` holds a non-blank value.
    pub fn is_present_in(&self, locale: &str) -> bool {
        self.get(locale).is_some_and(|value| !value.trim().is_empty())
    }

    /// Value for `locale`, falling back to `default_locale`, then to any non-blank translation.
    pub fn translated(&self, locale: &str, default_locale: &str) -> &str {
        [locale, default_locale]
            .into_iter()
            .find(|locale| self.is_present_in(locale))
            .and_then(|locale| self.get(locale))
            .or_else(|| self.0.values().map(String::as_str).find(|value| !value.trim().is_empty()))
            .unwrap_or_default()
    }
}

impl From<Translations> for LocalizedText {
    fn from(value: Translations) -> Self {
        Self(value)
    }
}

impl From<LocalizedText> for Translations {
    fn from(value: LocalizedText) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::LocalizedText;

    #[test]
    fn blank_values_are_not_present() {
        let text = LocalizedText::new().with("en", "  ").with("ca", "Ponent");

        assert!(!text.is_present_in("en"));
        assert!(text.is_present_in("ca"));
        assert!(!text.is_present_in("es"));
    }

    #[test]
    fn translated_falls_back_to_default_locale() {
        let text = LocalizedText::new().with("en", "Speaker").with("ca", "Ponent");

        assert_eq!(text.translated("ca", "en"), "Ponent");
        assert_eq!(text.translated("es", "en"), "Speaker");
        assert_eq!(LocalizedText::new().with("ca", "Ponent").translated("es", "en"), "Ponent");
        assert_eq!(LocalizedText::new().translated("es", "en"), "");
    }
}
