//! Internationalization (i18n) support
//!
//! User-facing error descriptions and guidance are translated through
//! `rust-i18n`. Supported languages: English (en), Korean (ko).
//!
//! # Environment Variables
//!
//! - `EXPLORER_LANG`: Set the preferred language (en, ko). Defaults to English.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trends_explorer::i18n::{t, set_locale};
//!
//! set_locale("ko");
//! let msg = t!("guidance.empty");
//! ```

use std::sync::RwLock;

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

static CURRENT_LOCALE: RwLock<String> = RwLock::new(String::new());

/// Set the current locale for translations
///
/// # Arguments
///
/// * `locale` - Language code (en, ko) or a variant such as `ko-KR`
pub fn set_locale(locale: &str) {
    let normalized = normalize_locale(locale);
    rust_i18n::set_locale(normalized);

    if let Ok(mut current) = CURRENT_LOCALE.write() {
        *current = normalized.to_string();
    }
}

/// Get the current locale
///
/// Returns the currently active locale or the default fallback.
pub fn current_locale() -> String {
    CURRENT_LOCALE
        .read()
        .ok()
        .filter(|current| !current.is_empty())
        .map(|current| current.clone())
        .unwrap_or_else(|| "en".to_string())
}

/// Initialize i18n from environment variables
///
/// Reads `EXPLORER_LANG` to set the locale, falling back to English.
pub fn init_from_env() {
    let locale = std::env::var("EXPLORER_LANG").unwrap_or_else(|_| "en".to_string());
    set_locale(&locale);
}

/// Normalize locale code to supported format
///
/// - ko-KR, ko_KR, korean -> ko
/// - anything else -> en
fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.to_lowercase();

    if lower.starts_with("ko") || lower == "korean" {
        "ko"
    } else {
        "en"
    }
}

/// Translate a key with optional parameters
///
/// This is a re-export of rust_i18n::t! for convenience.
///
/// ```rust,ignore
/// use trends_explorer::i18n::t;
///
/// let msg = t!("errors.cooldown", wait = "3.5");
/// ```
#[doc(inline)]
pub use rust_i18n::t;
