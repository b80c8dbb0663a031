use dioxus_i18n::prelude::*;
use unic_langid::{langid, LanguageIdentifier};

/// Initialize i18n configuration with the configured language, falling back
/// to English when the tag is unknown or malformed.
pub fn init_i18n(language: &str) -> I18nConfig {
    I18nConfig::new(select_language(language))
        .with_locale(Locale::new_static(
            langid!("en-US"),
            include_str!("../locales/en-US.ftl"),
        ))
        .with_locale(Locale::new_static(
            langid!("de-DE"),
            include_str!("../locales/de-DE.ftl"),
        ))
}

fn select_language(language: &str) -> LanguageIdentifier {
    match language.parse::<LanguageIdentifier>() {
        Ok(id) => supported_language(&id).unwrap_or_else(|| langid!("en-US")),
        Err(e) => {
            log::warn!("Invalid language tag {:?}: {}", language, e);
            langid!("en-US")
        }
    }
}

/// Catalog for a language, if one is bundled
fn supported_language(id: &LanguageIdentifier) -> Option<LanguageIdentifier> {
    match id.language.as_str() {
        "de" => Some(langid!("de-DE")),
        "en" => Some(langid!("en-US")),
        _ => None,
    }
}

/// Language to switch to when the provider's branding limits the locales.
///
/// `None` keeps the configured language: either branding lists no locales,
/// the configured one is allowed, or none of the listed ones is bundled.
pub fn branding_language(configured: &str, locales: &[String]) -> Option<LanguageIdentifier> {
    let allowed: Vec<LanguageIdentifier> = locales
        .iter()
        .filter_map(|tag| tag.parse::<LanguageIdentifier>().ok())
        .filter_map(|id| supported_language(&id))
        .collect();

    let current = select_language(configured);
    if allowed.is_empty() || allowed.contains(&current) {
        None
    } else {
        allowed.into_iter().next()
    }
}

/// Lower-case the first character, as used when a label is embedded in a
/// sentence ("Enter your email address").
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
