//! Site configuration module.
//!
//! Handles loading and validating `config.toml` from the site root. Stock
//! defaults are the base layer; the user file is merged on top key by key,
//! so a config file only needs the values it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = "NorelWeb"              # Suffix of every document title
//! base_path = ""                      # Prefix for fetched paths ("" = site root)
//! manifest_path = "data/articles.json"
//!
//! [layout]
//! header = "includes/header.html"
//! footer = "includes/footer.html"
//!
//! [labels]
//! home = "Accueil"                    # Breadcrumb root and home page title
//! page_not_found = "❌ Cette page n'existe pas."
//! page_not_found_title = "Page introuvable"
//! home_not_found = "❌ Page d'accueil non trouvée."
//! home_not_found_title = "Accueil introuvable"
//! category_not_found = "Catégorie introuvable."
//! subcategory_not_found = "Sous-catégorie introuvable."
//! manifest_error = "Erreur de chargement des articles."
//! previous = "←"
//! next = "→"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::paths::base_path;
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
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Appended to every document title as `" - {site_name}"`.
    pub site_name: String,
    /// Prefix for every fetched path. Empty means the site root.
    pub base_path: String,
    /// Location of the content manifest, relative to `base_path`.
    pub manifest_path: String,
    /// Shared header and footer partials.
    pub layout: LayoutConfig,
    /// User-visible strings.
    pub labels: Labels,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "NorelWeb".to_string(),
            base_path: String::new(),
            manifest_path: "data/articles.json".to_string(),
            layout: LayoutConfig::default(),
            labels: Labels::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation("site_name must not be empty".into()));
        }
        if self.manifest_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "manifest_path must not be empty".into(),
            ));
        }
        if !self.base_path.is_empty() && !self.base_path.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_path must be empty or end with '/'".into(),
            ));
        }
        Ok(())
    }

    /// Take `base_path` from the location of the entry page, as a browser
    /// would: `/docs/index.html` serves the site from `/docs/`.
    pub fn apply_location(&mut self, location_path: &str) {
        self.base_path = base_path(location_path);
    }

    /// Prefix a site-relative path with `base_path`.
    pub fn site_path(&self, relative: &str) -> String {
        format!("{}{}", self.base_path, relative)
    }

    /// Document title for a page label: `"{label} - {site_name}"`.
    pub fn document_title(&self, label: &str) -> String {
        format!("{} - {}", label, self.site_name)
    }
}

/// Shared layout partials, relative to `base_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub header: String,
    pub footer: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header: "includes/header.html".to_string(),
            footer: "includes/footer.html".to_string(),
        }
    }
}

/// User-visible strings. Defaults match the French site the router was
/// built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    /// Breadcrumb root and home page document title.
    pub home: String,
    pub page_not_found: String,
    pub page_not_found_title: String,
    pub home_not_found: String,
    pub home_not_found_title: String,
    pub category_not_found: String,
    pub subcategory_not_found: String,
    /// Shown in the sitewide index when the manifest cannot be loaded.
    pub manifest_error: String,
    /// Arrow before the previous-article label.
    pub previous: String,
    /// Arrow after the next-article label.
    pub next: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            home: "Accueil".to_string(),
            page_not_found: "❌ Cette page n'existe pas.".to_string(),
            page_not_found_title: "Page introuvable".to_string(),
            home_not_found: "❌ Page d'accueil non trouvée.".to_string(),
            home_not_found_title: "Accueil introuvable".to_string(),
            category_not_found: "Catégorie introuvable.".to_string(),
            subcategory_not_found: "Sous-catégorie introuvable.".to_string(),
            manifest_error: "Erreur de chargement des articles.".to_string(),
            previous: "←".to_string(),
            next: "→".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
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

/// Load `config.toml` from a site root as a raw TOML value.
///
/// Returns `Ok(None)` if the site has no `config.toml`.
pub fn load_raw_config(site_root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = site_root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the config for a site root.
pub fn load_config(site_root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(site_root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-router configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Appended to every document title: "<page title> - <site_name>".
site_name = "NorelWeb"

# Prefix for every fetched path. Empty means the site root; otherwise it
# must end with "/", e.g. "/docs/".
base_path = ""

# Content manifest describing categories, subcategories and articles.
manifest_path = "data/articles.json"

# ---------------------------------------------------------------------------
# Shared layout partials
# ---------------------------------------------------------------------------
[layout]
header = "includes/header.html"
footer = "includes/footer.html"

# ---------------------------------------------------------------------------
# User-visible text
# ---------------------------------------------------------------------------
[labels]
# Breadcrumb root, and the title of the home page.
home = "Accueil"

# Shown when a page fragment cannot be loaded.
page_not_found = "❌ Cette page n'existe pas."
page_not_found_title = "Page introuvable"

# Shown when the home fragment cannot be loaded.
home_not_found = "❌ Page d'accueil non trouvée."
home_not_found_title = "Accueil introuvable"

# Shown by category listings for unknown keys.
category_not_found = "Catégorie introuvable."
subcategory_not_found = "Sous-catégorie introuvable."

# Shown in the article index when the manifest cannot be loaded.
manifest_error = "Erreur de chargement des articles."

# Arrows around previous/next article labels.
previous = "←"
next = "→"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site_name, "NorelWeb");
        assert_eq!(config.manifest_path, "data/articles.json");
        assert_eq!(config.layout.header, "includes/header.html");
        assert_eq!(config.labels.home, "Accueil");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
site_name = "Docs"

[labels]
home = "Home"
"#,
        )
        .unwrap();
        assert_eq!(config.site_name, "Docs");
        assert_eq!(config.labels.home, "Home");
        // Defaults preserved
        assert_eq!(config.labels.previous, "←");
        assert_eq!(config.layout.footer, "includes/footer.html");
    }

    #[test]
    fn site_path_prefixes_base() {
        let mut config = SiteConfig::default();
        assert_eq!(config.site_path("content/home.html"), "content/home.html");
        config.base_path = "/docs/".into();
        assert_eq!(config.site_path("content/home.html"), "/docs/content/home.html");
    }

    #[test]
    fn location_overrides_base_path() {
        let mut config = SiteConfig {
            base_path: "/static/".into(),
            ..SiteConfig::default()
        };
        config.apply_location("/docs/index.html");
        assert_eq!(config.base_path, "/docs/");
        assert_eq!(config.site_path("data/articles.json"), "/docs/data/articles.json");
        assert!(config.validate().is_ok());

        config.apply_location("index.html");
        assert_eq!(config.site_path("data/articles.json"), "data/articles.json");
    }

    #[test]
    fn document_title_appends_site_name() {
        let config = SiteConfig::default();
        assert_eq!(config.document_title("Accueil"), "Accueil - NorelWeb");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site_name, "NorelWeb");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
base_path = "/docs/"

[layout]
header = "partials/top.html"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base_path, "/docs/");
        assert_eq!(config.layout.header, "partials/top.html");
        // Sibling key in the same table keeps its default
        assert_eq!(config.layout.footer, "includes/footer.html");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "site_nmae = \"typo\"\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[theme]\ncolor = \"red\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn base_path_without_trailing_slash_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "base_path = \"/docs\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_site_name_rejected() {
        let config = SiteConfig {
            site_name: "  ".into(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").and_then(|v| v.as_integer()), Some(1));
        assert_eq!(merged.get("b").and_then(|v| v.as_integer()), Some(3));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site_name, defaults.site_name);
        assert_eq!(config.labels.page_not_found, defaults.labels.page_not_found);
        assert_eq!(config.labels.next, defaults.labels.next);
        assert!(config.validate().is_ok());
    }
}
