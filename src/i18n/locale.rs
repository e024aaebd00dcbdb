//! Locale tag resolution.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Locale used when nothing better matches
pub const DEFAULT_LOCALE: &str = "en";

/// Locales with a bundled catalog
pub const SUPPORTED_LOCALES: &[&str] = &[
    "en", "zh-CN", "zh-TW", "ja", "ru", "de", "fr", "es", "ko", "he",
];

fn locale_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid locale regex")
    })
}

/// Regional variants that map to the traditional Chinese catalog
const TRADITIONAL_CHINESE_REGIONS: &[&str] = &["tw", "hk", "mo", "hant"];

/// Resolve a requested locale tag to a supported locale.
///
/// Matching order:
/// 1. Exact (case-insensitive) match, e.g. "zh-cn" -> "zh-CN"
/// 2. Chinese regional variants: TW/HK/MO/Hant -> "zh-TW", other "zh" -> "zh-CN"
/// 3. Primary language subtag, e.g. "de-AT" -> "de"
/// 4. `DEFAULT_LOCALE`
pub fn resolve_locale(requested: &str) -> &'static str {
    let requested = requested.trim().replace('_', "-");

    if !locale_tag_regex().is_match(&requested) {
        if !requested.is_empty() {
            warn!("Malformed locale tag '{}', using {}", requested, DEFAULT_LOCALE);
        }
        return DEFAULT_LOCALE;
    }

    if let Some(exact) = SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| l.eq_ignore_ascii_case(&requested))
    {
        return exact;
    }

    let lower = requested.to_ascii_lowercase();
    let mut subtags = lower.split('-');
    let language = subtags.next().unwrap_or_default();

    if language == "zh" {
        let traditional = subtags.any(|s| TRADITIONAL_CHINESE_REGIONS.contains(&s));
        return if traditional { "zh-TW" } else { "zh-CN" };
    }

    if let Some(by_language) = SUPPORTED_LOCALES.iter().copied().find(|l| *l == language) {
        debug!("Locale '{}' resolved to '{}'", requested, by_language);
        return by_language;
    }

    debug!("Unsupported locale '{}', using {}", requested, DEFAULT_LOCALE);
    DEFAULT_LOCALE
}
