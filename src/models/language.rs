use serde::{Deserialize, Serialize};

/// Display languages supported by the localized content service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Nepali,
}

impl Language {
    /// Two-letter code used in the preference file and content paths.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Nepali => "ne",
        }
    }

    /// Name as the remote service spells it.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Nepali => "nepali",
        }
    }

    /// Parse a two-letter code, `None` for anything unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "hi" => Some(Language::Hindi),
            "ne" => Some(Language::Nepali),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Hindi => write!(f, "हिन्दी"),
            Language::Nepali => write!(f, "नेपाली"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        for lang in [Language::English, Language::Hindi, Language::Nepali] {
            let json = serde_json::to_string(&lang).unwrap();
            assert_eq!(json, format!("\"{}\"", lang.wire_name()));
            let back: Language = serde_json::from_str(&json).unwrap();
            assert_eq!(back, lang);
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ne"), Some(Language::Nepali));
        assert_eq!(Language::from_code("fr"), None);
    }
}
