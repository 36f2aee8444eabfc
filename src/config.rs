//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` in the content root.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (overrides stock defaults)
//! ├── dataset.ndjson           # Content store export
//! └── assets/                  # Copied verbatim into the output root
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = "gallery瓦聞"  # Suffix of every page title
//!
//! [store]
//! dataset = "dataset.ndjson" # Required. Export file, relative to the content root
//!
//! [languages]
//! default = "zh-hans"       # Language the site root redirects to
//!
//! [build]
//! assets_dir = "assets"     # Static files copied into the output root
//!
//! [colors.light]
//! background = "#faf8f5"
//! text = "#1f1c19"
//! text_muted = "#7a726a"    # Breadcrumbs, dates, captions
//! border = "#e4ded6"
//! link = "#3b342e"
//! link_hover = "#000000"
//! accent = "#a2472f"        # Event badges
//!
//! [colors.dark]
//! background = "#12100e"
//! text = "#ece7e1"
//! text_muted = "#9b928a"
//! border = "#3a342f"
//! link = "#d6cec6"
//! link_hover = "#ffffff"
//! accent = "#e0866c"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::language::{DEFAULT_LANGUAGE_PARAM, LanguageParam};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults except the store dataset, which must be set
/// before a build can open the content store. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Appended to every page title as `"{title} - {site_name}"`.
    pub site_name: String,
    /// Content store connection.
    pub store: StoreConfig,
    /// Language settings.
    pub languages: LanguagesConfig,
    /// Output settings.
    pub build: BuildConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "gallery瓦聞".to_string(),
            store: StoreConfig::default(),
            languages: LanguagesConfig::default(),
            build: BuildConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    ///
    /// A missing store dataset is not a validation error: `gen-config` and
    /// `check` work without one. Opening the store reports it instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_name must not be empty".into(),
            ));
        }
        if self.build.assets_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "build.assets_dir must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Content store settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Dataset export file, relative to the content root.
    pub dataset: Option<String>,
}

/// Language settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguagesConfig {
    /// Language the site root redirects to.
    pub default: LanguageParam,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_LANGUAGE_PARAM,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory of static files, relative to the content root.
    pub assets_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            assets_dir: "assets".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page renderers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (breadcrumbs, dates, captions).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
    /// Highlight color for event badges.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#faf8f5".to_string(),
            text: "#1f1c19".to_string(),
            text_muted: "#7a726a".to_string(),
            border: "#e4ded6".to_string(),
            link: "#3b342e".to_string(),
            link_hover: "#000000".to_string(),
            accent: "#a2472f".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#12100e".to_string(),
            text: "#ece7e1".to_string(),
            text_muted: "#9b928a".to_string(),
            border: "#3a342f".to_string(),
            link: "#d6cec6".to_string(),
            link_hover: "#ffffff".to_string(),
            accent: "#e0866c".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Configuration
# ==================
# All settings are optional except [store] dataset.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Appended to every page title: "{title} - {site_name}".
site_name = "gallery瓦聞"

# ---------------------------------------------------------------------------
# Content store
# ---------------------------------------------------------------------------
[store]
# Dataset export (newline-delimited JSON), relative to the content root.
# Required for `build` and `render`.
# dataset = "dataset.ndjson"

# ---------------------------------------------------------------------------
# Languages
# ---------------------------------------------------------------------------
[languages]
# Language the site root redirects to: "zh-hans", "zh-hant" or "en".
default = "zh-hans"

# ---------------------------------------------------------------------------
# Build output
# ---------------------------------------------------------------------------
[build]
# Static files copied verbatim into the output root, relative to the content root.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#faf8f5"
text = "#1f1c19"
text_muted = "#7a726a"    # Breadcrumbs, dates, captions
border = "#e4ded6"
link = "#3b342e"
link_hover = "#000000"
accent = "#a2472f"        # Event badges

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#12100e"
text = "#ece7e1"
text_muted = "#9b928a"
border = "#3a342f"
link = "#d6cec6"
link_hover = "#ffffff"
accent = "#e0866c"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page renderers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn scheme_vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("bg", &scheme.background),
            ("text", &scheme.text),
            ("text-muted", &scheme.text_muted),
            ("border", &scheme.border),
            ("link", &scheme.link),
            ("link-hover", &scheme.link_hover),
            ("accent", &scheme.accent),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};\n"))
        .collect()
    }

    format!(
        ":root {{\n{light}}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{dark}    }}\n}}",
        light = scheme_vars(&colors.light, "    "),
        dark = scheme_vars(&colors.dark, "        "),
    )
}
