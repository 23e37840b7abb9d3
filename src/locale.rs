use crate::config::Config;

/// Active locale and currency used for money display.
///
/// Resolution is pure: the values come from configuration (or defaults),
/// never from I/O, so formatting is deterministic for a given settings value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    /// BCP 47 identifier, e.g. "en-US" or "de-DE".
    pub locale: String,
    /// ISO 4217 code, e.g. "USD" or "EUR".
    pub currency: String,
}

impl LocaleSettings {
    pub fn resolve(config: &Config) -> Self {
        Self {
            locale: config.locale.clone(),
            currency: config.currency.clone(),
        }
    }
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_follows_config() {
        let config = Config {
            locale: "de-DE".into(),
            currency: "EUR".into(),
            ..Config::default()
        };
        let settings = LocaleSettings::resolve(&config);
        assert_eq!(settings.locale, "de-DE");
        assert_eq!(settings.currency, "EUR");
    }

    #[test]
    fn test_default_is_en_us_dollars() {
        let settings = LocaleSettings::default();
        assert_eq!(settings.locale, "en-US");
        assert_eq!(settings.currency, "USD");
    }
}
