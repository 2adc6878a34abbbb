//! Air-quality readings: the WAQI client, AQI bands, and input cleanup.

mod waqi;

pub use waqi::{AqiSource, WaqiClient, WaqiError};

use regex::Regex;
use std::sync::OnceLock;

/// Highest AQI on the US EPA scale that WAQI reports.
pub const MAX_AQI: i64 = 500;

/// US EPA AQI bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub fn classify(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitiveGroups,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "good",
            AqiLevel::Moderate => "moderate",
            AqiLevel::UnhealthyForSensitiveGroups => "unhealthy for sensitive groups",
            AqiLevel::Unhealthy => "unhealthy",
            AqiLevel::VeryUnhealthy => "very unhealthy",
            AqiLevel::Hazardous => "hazardous",
        }
    }
}

fn filler_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(right now|today|currently|please|now)\b").expect("static regex")
    })
}

fn non_location_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z\s,]").expect("static regex"))
}

/// Remove filler words such as "right now" or "please".
pub fn strip_filler_words(s: &str) -> String {
    filler_words().replace_all(s, "").into_owned()
}

/// Clean a candidate location: drop filler words and anything but letters,
/// whitespace and commas. None when nothing is left.
pub fn validate_location(location: Option<&str>) -> Option<String> {
    let location = location?.trim();
    if location.is_empty() {
        return None;
    }
    let stripped = strip_filler_words(location);
    let normalized = non_location_chars().replace_all(&stripped, "");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// AQI within 0..=500, else None.
pub fn validate_aqi(aqi: Option<i64>) -> Option<u16> {
    aqi.filter(|a| (0..=MAX_AQI).contains(a))
        .and_then(|a| u16::try_from(a).ok())
}

pub const NO_SUMMARY_GENERATED: &str = "Sorry, I couldn't generate a summary.";

/// Trimmed summary, or a fixed apology when blank.
pub fn validate_summary(summary: Option<&str>) -> String {
    summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUMMARY_GENERATED)
        .to_string()
}

/// "Air quality in {location} is {level} (AQI {aqi})."
pub fn describe(location: &str, aqi: u16) -> String {
    format!(
        "Air quality in {} is {} (AQI {}).",
        location,
        AqiLevel::classify(aqi).label(),
        aqi
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(AqiLevel::classify(0), AqiLevel::Good);
        assert_eq!(AqiLevel::classify(50), AqiLevel::Good);
        assert_eq!(AqiLevel::classify(51), AqiLevel::Moderate);
        assert_eq!(AqiLevel::classify(100), AqiLevel::Moderate);
        assert_eq!(AqiLevel::classify(150), AqiLevel::UnhealthyForSensitiveGroups);
        assert_eq!(AqiLevel::classify(200), AqiLevel::Unhealthy);
        assert_eq!(AqiLevel::classify(300), AqiLevel::VeryUnhealthy);
        assert_eq!(AqiLevel::classify(301), AqiLevel::Hazardous);
    }

    #[test]
    fn location_cleanup() {
        assert_eq!(validate_location(Some("  Lagos ")), Some("Lagos".to_string()));
        assert_eq!(validate_location(Some("Lagos right now")), Some("Lagos".to_string()));
        assert_eq!(validate_location(Some("São Paulo!")), Some("So Paulo".to_string()));
        assert_eq!(validate_location(Some("Abuja, Nigeria.")), Some("Abuja, Nigeria".to_string()));
        assert_eq!(validate_location(Some("today 123")), None);
        assert_eq!(validate_location(Some("   ")), None);
        assert_eq!(validate_location(None), None);
    }

    #[test]
    fn filler_words_are_whole_words_only() {
        assert_eq!(strip_filler_words("Nowshera"), "Nowshera");
        assert_eq!(strip_filler_words("Kano NOW").trim(), "Kano");
    }

    #[test]
    fn aqi_range() {
        assert_eq!(validate_aqi(Some(0)), Some(0));
        assert_eq!(validate_aqi(Some(500)), Some(500));
        assert_eq!(validate_aqi(Some(501)), None);
        assert_eq!(validate_aqi(Some(-1)), None);
        assert_eq!(validate_aqi(None), None);
    }

    #[test]
    fn summary_fallback() {
        assert_eq!(validate_summary(Some("  hi ")), "hi");
        assert_eq!(validate_summary(Some("")), NO_SUMMARY_GENERATED);
        assert_eq!(validate_summary(None), NO_SUMMARY_GENERATED);
    }

    #[test]
    fn description() {
        assert_eq!(describe("Lagos", 42), "Air quality in Lagos is good (AQI 42).");
        assert_eq!(
            describe("Delhi", 320),
            "Air quality in Delhi is hazardous (AQI 320)."
        );
    }
}
