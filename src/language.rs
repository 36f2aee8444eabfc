//! Language parameters and content keys.
//!
//! URLs carry a language *param* (`zh-hans`, `zh-hant`, `en`); stored content
//! is keyed by a language *key* (`zhHans`, `zhHant`, `en`). Resolution never
//! fails: anything unrecognized lands on the default language.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key used inside localized content fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageKey {
    #[serde(rename = "zhHans")]
    ZhHans,
    #[serde(rename = "zhHant")]
    ZhHant,
    #[serde(rename = "en")]
    En,
}

/// Language segment used in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageParam {
    #[serde(rename = "zh-hans")]
    ZhHans,
    #[serde(rename = "zh-hant")]
    ZhHant,
    #[serde(rename = "en")]
    En,
}

pub const DEFAULT_LANGUAGE_PARAM: LanguageParam = LanguageParam::ZhHans;

/// Order in which localized values are tried when the requested key is empty.
pub const FALLBACK_ORDER: [LanguageKey; 3] = [LanguageKey::ZhHans, LanguageKey::ZhHant, LanguageKey::En];

/// Every language the site is generated in, in switcher order.
pub const ALL_PARAMS: [LanguageParam; 3] = [LanguageParam::En, LanguageParam::ZhHans, LanguageParam::ZhHant];

impl LanguageParam {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zh-hans" => Some(Self::ZhHans),
            "zh-hant" => Some(Self::ZhHant),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ZhHans => "zh-hans",
            Self::ZhHant => "zh-hant",
            Self::En => "en",
        }
    }

    pub fn key(self) -> LanguageKey {
        match self {
            Self::ZhHans => LanguageKey::ZhHans,
            Self::ZhHant => LanguageKey::ZhHant,
            Self::En => LanguageKey::En,
        }
    }

    /// Label shown in the language switcher.
    pub fn label(self) -> &'static str {
        match self {
            Self::ZhHans => "中文简体",
            Self::ZhHant => "中文繁體",
            Self::En => "En",
        }
    }

    /// Value for the `<html lang>` attribute.
    pub fn html_lang(self) -> &'static str {
        match self {
            Self::ZhHans => "zh-Hans",
            Self::ZhHant => "zh-Hant",
            Self::En => "en",
        }
    }
}

impl LanguageKey {
    pub fn param(self) -> LanguageParam {
        match self {
            Self::ZhHans => LanguageParam::ZhHans,
            Self::ZhHant => LanguageParam::ZhHant,
            Self::En => LanguageParam::En,
        }
    }

    pub fn is_chinese(self) -> bool {
        matches!(self, Self::ZhHans | Self::ZhHant)
    }
}

impl fmt::Display for LanguageParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw language param to a URL param, falling back to `default`.
pub fn ensure_param_or(param: Option<&str>, default: LanguageParam) -> LanguageParam {
    param.and_then(LanguageParam::parse).unwrap_or(default)
}

/// Normalize a raw language param, falling back to `zh-hans`.
pub fn ensure_param(param: Option<&str>) -> LanguageParam {
    ensure_param_or(param, DEFAULT_LANGUAGE_PARAM)
}

/// Resolve a raw language param to a content key.
///
/// Absent or unknown values resolve to the default language key.
pub fn resolve_key(param: Option<&str>) -> LanguageKey {
    ensure_param(param).key()
}

/// Multi-valued variant of [`resolve_key`]: only the first value counts.
pub fn resolve_key_from<S: AsRef<str>>(values: &[S]) -> LanguageKey {
    resolve_key(values.first().map(AsRef::as_ref))
}

/// Build `/{lang}/{segments...}`, skipping empty segments.
pub fn build_language_href(target: LanguageParam, segments: &[&str]) -> String {
    let cleaned: Vec<&str> = segments.iter().copied().filter(|s| !s.is_empty()).collect();
    if cleaned.is_empty() {
        format!("/{}/", target)
    } else {
        format!("/{}/{}/", target, cleaned.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_params_map_to_keys() {
        assert_eq!(resolve_key(Some("zh-hans")), LanguageKey::ZhHans);
        assert_eq!(resolve_key(Some("zh-hant")), LanguageKey::ZhHant);
        assert_eq!(resolve_key(Some("en")), LanguageKey::En);
    }

    #[test]
    fn missing_param_resolves_to_default() {
        assert_eq!(resolve_key(None), LanguageKey::ZhHans);
    }

    #[test]
    fn unknown_param_resolves_to_default() {
        assert_eq!(resolve_key(Some("fr")), LanguageKey::ZhHans);
        assert_eq!(resolve_key(Some("EN")), LanguageKey::ZhHans);
        assert_eq!(resolve_key(Some("")), LanguageKey::ZhHans);
    }

    #[test]
    fn multi_valued_param_uses_first() {
        assert_eq!(resolve_key_from(&["en", "zh-hant"]), LanguageKey::En);
        assert_eq!(resolve_key_from::<&str>(&[]), LanguageKey::ZhHans);
    }

    #[test]
    fn ensure_param_respects_configured_default() {
        assert_eq!(ensure_param_or(Some("xx"), LanguageParam::En), LanguageParam::En);
        assert_eq!(ensure_param_or(Some("zh-hant"), LanguageParam::En), LanguageParam::ZhHant);
    }

    #[test]
    fn key_and_param_round_trip() {
        for param in ALL_PARAMS {
            assert_eq!(param.key().param(), param);
            assert_eq!(LanguageParam::parse(param.as_str()), Some(param));
        }
    }

    #[test]
    fn language_href_joins_segments() {
        assert_eq!(build_language_href(LanguageParam::En, &[]), "/en/");
        assert_eq!(
            build_language_href(LanguageParam::ZhHant, &["category", "", "cat-1"]),
            "/zh-hant/category/cat-1/"
        );
    }

    #[test]
    fn key_serializes_as_content_field_name() {
        let json = serde_json::to_string(&LanguageKey::ZhHans).unwrap();
        assert_eq!(json, r#""zhHans""#);
    }
}
