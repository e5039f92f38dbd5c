//! Region names offered to users and their upstream geo codes

use serde::Serialize;

/// A selectable region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Display name shown to the user
    pub name: &'static str,

    /// Two-letter geo code; empty for worldwide
    pub code: &'static str,
}

/// Worldwide first, then countries in the order the picker lists them
pub const REGIONS: &[Region] = &[
    Region { name: "Worldwide", code: "" },
    Region { name: "United States", code: "US" },
    Region { name: "Nigeria", code: "NG" },
    Region { name: "India", code: "IN" },
    Region { name: "United Kingdom", code: "GB" },
    Region { name: "Canada", code: "CA" },
    Region { name: "Australia", code: "AU" },
    Region { name: "Germany", code: "DE" },
    Region { name: "France", code: "FR" },
    Region { name: "Japan", code: "JP" },
    Region { name: "Brazil", code: "BR" },
    Region { name: "South Korea", code: "KR" },
    Region { name: "China", code: "CN" },
    Region { name: "Russia", code: "RU" },
    Region { name: "Mexico", code: "MX" },
    Region { name: "Italy", code: "IT" },
    Region { name: "Spain", code: "ES" },
    Region { name: "Netherlands", code: "NL" },
    Region { name: "Sweden", code: "SE" },
    Region { name: "Norway", code: "NO" },
    Region { name: "Denmark", code: "DK" },
    Region { name: "Finland", code: "FI" },
    Region { name: "Switzerland", code: "CH" },
    Region { name: "Austria", code: "AT" },
    Region { name: "Belgium", code: "BE" },
    Region { name: "Poland", code: "PL" },
    Region { name: "Turkey", code: "TR" },
    Region { name: "South Africa", code: "ZA" },
    Region { name: "Egypt", code: "EG" },
    Region { name: "Kenya", code: "KE" },
    Region { name: "Ghana", code: "GH" },
    Region { name: "Morocco", code: "MA" },
    Region { name: "Argentina", code: "AR" },
    Region { name: "Chile", code: "CL" },
    Region { name: "Colombia", code: "CO" },
    Region { name: "Peru", code: "PE" },
    Region { name: "Venezuela", code: "VE" },
    Region { name: "Thailand", code: "TH" },
    Region { name: "Vietnam", code: "VN" },
    Region { name: "Malaysia", code: "MY" },
    Region { name: "Singapore", code: "SG" },
    Region { name: "Indonesia", code: "ID" },
    Region { name: "Philippines", code: "PH" },
    Region { name: "Taiwan", code: "TW" },
    Region { name: "Hong Kong", code: "HK" },
    Region { name: "New Zealand", code: "NZ" },
    Region { name: "Israel", code: "IL" },
];

/// Resolve a display name or a two-letter code to a geo code
///
/// Names match case-insensitively. An empty input means worldwide.
/// Any two ASCII letters are accepted as a code, upper-cased, even when
/// the region is not in [`REGIONS`].
pub fn resolve(input: &str) -> Option<String> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Some(String::new());
    }

    if let Some(region) = REGIONS
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(trimmed))
    {
        return Some(region.code.to_string());
    }

    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(trimmed.to_ascii_uppercase());
    }

    None
}

/// Display name for a geo code, if it is one of the listed regions
pub fn name_for_code(code: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|r| r.code.eq_ignore_ascii_case(code))
        .map(|r| r.name)
}
