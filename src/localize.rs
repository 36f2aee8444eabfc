//! Localized content fields and language fallback.
//!
//! Every translatable field in the content store is an object with up to three
//! keys (`zhHans`, `zhHant`, `en`). Picking a value is total: a missing or
//! empty translation falls back through [`FALLBACK_ORDER`], and a field with
//! nothing usable yields an empty value rather than an error.

use crate::language::{FALLBACK_ORDER, LanguageKey};
use crate::rich_text::Block;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A value translated into the site's three languages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: DeserializeOwned"))]
pub struct Localized<T> {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub zh_hans: Option<T>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub zh_hant: Option<T>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub en: Option<T>,
}

pub type LocalizedText = Localized<String>;
pub type LocalizedRichText = Localized<Vec<Block>>;

/// Values that can be "present but empty" (`""`, `[]`).
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Localized<T> {
    pub fn get(&self, key: LanguageKey) -> Option<&T> {
        match key {
            LanguageKey::ZhHans => self.zh_hans.as_ref(),
            LanguageKey::ZhHant => self.zh_hant.as_ref(),
            LanguageKey::En => self.en.as_ref(),
        }
    }
}

impl<T: Blank> Localized<T> {
    /// The value for `key`, or the first non-empty value in fallback order.
    pub fn pick(&self, key: LanguageKey) -> Option<&T> {
        std::iter::once(key)
            .chain(FALLBACK_ORDER)
            .filter_map(|k| self.get(k))
            .find(|v| !v.is_blank())
    }

    /// True when no language carries a non-empty value.
    pub fn is_empty(&self) -> bool {
        FALLBACK_ORDER
            .iter()
            .all(|k| self.get(*k).is_none_or(Blank::is_blank))
    }
}

/// Pick display text for `key`; never fails, may be empty.
pub fn pick_text(value: Option<&LocalizedText>, key: LanguageKey) -> String {
    value
        .and_then(|v| v.pick(key))
        .cloned()
        .unwrap_or_default()
}

/// Pick rich text blocks for `key`; never fails, may be empty.
pub fn pick_rich_text(value: Option<&LocalizedRichText>, key: LanguageKey) -> Vec<Block> {
    value
        .and_then(|v| v.pick(key))
        .cloned()
        .unwrap_or_default()
}

/// Deserialize a field, turning a malformed value into its default.
///
/// Stored documents are edited by hand in the studio and occasionally carry a
/// string where blocks are expected (or the reverse). Those fields read as
/// absent instead of failing the whole document.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{paragraph, text};

    #[test]
    fn requested_language_wins() {
        let field = Localized {
            zh_hans: Some("杯子".to_string()),
            zh_hant: Some("杯子".to_string()),
            en: Some("Cup".to_string()),
        };
        assert_eq!(pick_text(Some(&field), LanguageKey::En), "Cup");
    }

    #[test]
    fn missing_language_falls_back_in_order() {
        let field = Localized {
            zh_hans: None,
            zh_hant: Some("繁體".to_string()),
            en: Some("English".to_string()),
        };
        assert_eq!(pick_text(Some(&field), LanguageKey::ZhHans), "繁體");
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let field = Localized {
            zh_hans: Some(String::new()),
            zh_hant: None,
            en: Some("English".to_string()),
        };
        assert_eq!(pick_text(Some(&field), LanguageKey::ZhHans), "English");
    }

    #[test]
    fn pick_is_total_for_empty_fields() {
        let empty = LocalizedText::default();
        for key in FALLBACK_ORDER {
            assert_eq!(pick_text(Some(&empty), key), "");
            assert_eq!(pick_text(None, key), "");
            assert!(pick_rich_text(None, key).is_empty());
            assert!(pick_rich_text(Some(&LocalizedRichText::default()), key).is_empty());
        }
    }

    #[test]
    fn rich_text_falls_back_past_empty_sequences() {
        let field = LocalizedRichText {
            zh_hans: Some(vec![]),
            zh_hant: None,
            en: Some(vec![paragraph("hello")]),
        };
        let blocks = pick_rich_text(Some(&field), LanguageKey::ZhHant);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn is_empty_ignores_blank_values() {
        assert!(LocalizedText::default().is_empty());
        assert!(
            Localized {
                zh_hans: Some(String::new()),
                zh_hant: None,
                en: None,
            }
            .is_empty()
        );
        assert!(!text("a").is_empty());
    }

    #[test]
    fn malformed_language_value_reads_as_absent() {
        let field: LocalizedText =
            serde_json::from_str(r#"{"zhHans": ["not", "a", "string"], "en": "Cup"}"#).unwrap();
        assert_eq!(field.zh_hans, None);
        assert_eq!(pick_text(Some(&field), LanguageKey::ZhHans), "Cup");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let field: LocalizedText =
            serde_json::from_str(r#"{"_type": "localizedText", "zhHans": "茶"}"#).unwrap();
        assert_eq!(field.zh_hans.as_deref(), Some("茶"));
    }
}
