//! Localized text pairs and the host language enumeration.

use serde::{Deserialize, Serialize};

/// Languages the host can report.
///
/// Only the Chinese family changes how a [`LocalText`] resolves; every other
/// language renders the English string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    /// English.
    #[default]
    English,
    /// Chinese (unspecified script).
    Chinese,
    /// Simplified Chinese.
    ChineseSimplified,
    /// Traditional Chinese.
    ChineseTraditional,
    /// Japanese.
    Japanese,
    /// Korean.
    Korean,
    /// French.
    French,
    /// German.
    German,
    /// Spanish.
    Spanish,
    /// Russian.
    Russian,
    /// Any language the host reports that is not listed above.
    Other,
}

impl Language {
    /// Returns true for every Chinese variant.
    #[inline]
    #[must_use]
    pub const fn is_chinese(self) -> bool {
        matches!(
            self,
            Self::Chinese | Self::ChineseSimplified | Self::ChineseTraditional
        )
    }
}

/// A Chinese/English text pair with a stable key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalText {
    /// Stable lookup key.
    pub key: String,
    /// Chinese rendering.
    pub chinese: String,
    /// English rendering.
    pub english: String,
}

impl LocalText {
    /// Creates a new text pair.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        chinese: impl Into<String>,
        english: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            chinese: chinese.into(),
            english: english.into(),
        }
    }

    /// Resolves the string to display for `language`.
    ///
    /// Chinese variants prefer the Chinese string, everything else prefers
    /// English. An empty preferred string falls back to the other one.
    #[must_use]
    pub fn resolve(&self, language: Language) -> &str {
        let (preferred, fallback) = if language.is_chinese() {
            (&self.chinese, &self.english)
        } else {
            (&self.english, &self.chinese)
        };

        if preferred.is_empty() {
            fallback
        } else {
            preferred
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_language() {
        let text = LocalText::new("K", "你好", "Hello");
        assert_eq!(text.resolve(Language::English), "Hello");
        assert_eq!(text.resolve(Language::German), "Hello");
        assert_eq!(text.resolve(Language::ChineseSimplified), "你好");
        assert_eq!(text.resolve(Language::ChineseTraditional), "你好");
    }

    #[test]
    fn test_resolve_falls_back_when_empty() {
        let english_only = LocalText::new("K", "", "Hello");
        assert_eq!(english_only.resolve(Language::Chinese), "Hello");

        let chinese_only = LocalText::new("K", "你好", "");
        assert_eq!(chinese_only.resolve(Language::French), "你好");
    }
}
