use std::fmt;

use crate::config::{LanguageConfig, LanguageRule};

/// Canonical language name. Empty means "let the translator detect it".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Language(String);

impl Language {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    pub fn unspecified() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unspecified(&self) -> bool {
        self.0.is_empty()
    }

    /// Source-language hint for the translator, omitted when unspecified.
    pub fn as_hint(&self) -> Option<&str> {
        if self.is_unspecified() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps the bracketed tag of a video title (e.g. `[Eng Sub]`) to a language.
#[derive(Debug, Clone)]
pub struct LanguageInferencer {
    rules: Vec<LanguageRule>,
}

impl LanguageInferencer {
    pub fn new(config: LanguageConfig) -> Self {
        let rules = config
            .rules
            .into_iter()
            .map(|rule| LanguageRule {
                keyword: rule.keyword.to_lowercase(),
                language: rule.language,
            })
            .collect();
        Self { rules }
    }

    pub fn infer(&self, title: &str) -> Language {
        let Some(tag) = bracketed_tag(title) else {
            return Language::unspecified();
        };
        let tag = tag.to_lowercase();

        self.rules
            .iter()
            .find(|rule| tag.contains(&rule.keyword))
            .map(|rule| Language::new(rule.language.clone()))
            .unwrap_or_default()
    }
}

impl Default for LanguageInferencer {
    fn default() -> Self {
        Self::new(LanguageConfig::default())
    }
}

/// Contents of the first `[...]` in `title`.
fn bracketed_tag(title: &str) -> Option<&str> {
    let start = title.find('[')? + 1;
    let len = title[start..].find(']')?;
    Some(&title[start..start + len])
}

/// Infer a language with the default keyword table.
pub fn infer_language(title: &str) -> Language {
    LanguageInferencer::default().infer(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(infer_language("Movie [Eng Sub]").as_str(), "English");
        assert_eq!(infer_language("Movie [RUS]").as_str(), "Russian");
        assert_eq!(infer_language("Película [Sub Español] 1080p").as_str(), "Spanish");
    }

    #[test]
    fn test_missing_bracket_is_unspecified() {
        let language = infer_language("Movie Eng Sub");
        assert_eq!(language.as_str(), "");
        assert_eq!(language.as_hint(), None);
    }

    #[test]
    fn test_unclosed_bracket_is_unspecified() {
        assert!(infer_language("Movie [Eng Sub").is_unspecified());
    }

    #[test]
    fn test_unknown_tag_is_unspecified() {
        assert!(infer_language("Movie [4K HDR]").is_unspecified());
    }

    #[test]
    fn test_specific_keys_checked_before_short_ones() {
        let inferencer = LanguageInferencer::new(LanguageConfig {
            rules: vec![
                LanguageRule { keyword: "Sub Rus".to_string(), language: "Russian".to_string() },
                LanguageRule { keyword: "sub".to_string(), language: "English".to_string() },
            ],
        });
        assert_eq!(inferencer.infer("Film [SUB RUS]").as_str(), "Russian");
        assert_eq!(inferencer.infer("Film [Sub]").as_str(), "English");
    }

    #[test]
    fn test_only_first_bracket_is_used() {
        assert_eq!(infer_language("Movie [1080p] [Eng Sub]").as_str(), "");
    }

    #[test]
    fn test_hint_for_known_language() {
        assert_eq!(Language::new("English").as_hint(), Some("English"));
    }
}
