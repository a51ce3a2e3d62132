use std::sync::LazyLock;

use regex::Regex;

/// Headings worth emitting as content sections.
static INTERESTING_SECTIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)towing|trailering|performance|interior|safety|technology|capability|award|awards|accolades|dependabil").unwrap()
});

/// Subset of section headings that describe awards/accolades.
static AWARD_HEADINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)award|accolade|dependabil").unwrap());

/// Brand-specific knowledge handed to the normalizer at construction: brand
/// names for title parsing, the heading label that precedes the trims slider,
/// pricing defaults and the known trim list.
#[derive(Debug, Clone)]
pub struct BrandProfile {
    pub brands: Vec<String>,
    pub models_heading: String,
    pub default_currency: String,
    pub default_locale: String,
    pub site_base: String,
    pub trim_names: Vec<String>,
}

impl BrandProfile {
    pub fn new(site_base: impl Into<String>) -> Self {
        BrandProfile {
            brands: ["Chevrolet", "GMC", "Buick", "Cadillac"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            models_heading: "Models".to_string(),
            default_currency: "CAD".to_string(),
            default_locale: "en-CA".to_string(),
            site_base: site_base.into(),
            trim_names: Vec::new(),
        }
    }

    /// Chevrolet Canada profile with the Silverado trim lineup.
    pub fn chevrolet() -> Self {
        let mut profile = BrandProfile::new("https://www.chevrolet.ca");
        profile.trim_names = [
            "WT",
            "Custom",
            "LT",
            "RST",
            "LTZ",
            "High Country",
            "Custom Trail Boss",
            "LT Trail Boss",
            "ZR2",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        profile
    }

    pub fn with_trims<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trim_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn section_of_interest(&self, heading: &str) -> bool {
        INTERESTING_SECTIONS.is_match(heading)
    }

    pub fn award_heading(&self, heading: &str) -> bool {
        AWARD_HEADINGS.is_match(heading)
    }

    /// Canonical form of a known trim name, matched case-insensitively.
    pub fn canon_trim_name(&self, raw: &str) -> Option<&str> {
        let raw = raw.trim();
        self.trim_names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(raw))
            .map(|n| n.as_str())
    }

    /// Longest known trim name found inside free text (word-bounded).
    pub fn trim_name_in_text(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let low = text.to_lowercase();
        let mut names: Vec<&String> = self.trim_names.iter().collect();
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        for name in names {
            let pattern = format!(r"\b{}\b", regex::escape(&name.to_lowercase()));
            if let Ok(re) = Regex::new(&pattern) {
                if re.is_match(&low) {
                    return Some(name.as_str());
                }
            }
        }
        None
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_pattern() {
        let p = BrandProfile::chevrolet();
        assert!(p.section_of_interest("Trailering & Towing"));
        assert!(p.section_of_interest("SAFETY FEATURES"));
        assert!(!p.section_of_interest("Gallery"));
    }

    #[test]
    fn award_pattern() {
        let p = BrandProfile::chevrolet();
        assert!(p.award_heading("Awards & Accolades"));
        assert!(p.award_heading("Dependability"));
        assert!(!p.award_heading("Towing"));
    }

    #[test]
    fn trim_matching() {
        let p = BrandProfile::chevrolet();
        assert_eq!(p.canon_trim_name(" high country "), Some("High Country"));
        assert_eq!(p.canon_trim_name("Turbo"), None);
        // Longest name wins over its prefix.
        assert_eq!(p.trim_name_in_text("2024 Silverado LT Trail Boss shown"), Some("LT Trail Boss"));
        assert_eq!(p.trim_name_in_text("the LT in red"), Some("LT"));
        assert_eq!(p.trim_name_in_text("nothing here"), None);
    }
}
