use crate::keys;
use crate::registry::read_text;
use crate::store::KeyValueStore;

pub const SYSTEM_LANGUAGE: &str = "system";
pub const FALLBACK_LANGUAGE: &str = "en";

/// Display language for widget text. `language_code` overrides the OS locale unless
/// it is absent or `system`.
pub fn resolve_language(store: &dyn KeyValueStore, system_locale: Option<&str>) -> String {
    match read_text(store, keys::LANGUAGE_CODE) {
        Some(code) if code.trim() != SYSTEM_LANGUAGE && !code.trim().is_empty() => {
            code.trim().to_string()
        }
        _ => system_locale
            .and_then(primary_subtag)
            .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string()),
    }
}

fn primary_subtag(locale: &str) -> Option<String> {
    let primary = locale.split(['-', '_', '.']).next()?.trim();
    if primary.is_empty() || primary.eq_ignore_ascii_case("c") || primary == "POSIX" {
        return None;
    }
    Some(primary.to_ascii_lowercase())
}
