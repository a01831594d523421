use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::normalization::helpful::HelpfulTiers;
use crate::normalization::timestamp::TimestampMode;

/// How the generated SQL resolves a canonical product name to a product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// `name = '<product>'`: strict equality against the products table.
    #[default]
    Exact,
    /// `name ILIKE '%<product>%' LIMIT 1`: the looser lookup some stores
    /// need when display names drift from the mapping.
    #[value(name = "ilike")]
    ILike,
}

fn default_reviews_table() -> String {
    "product_reviews".to_string()
}

fn default_products_table() -> String {
    "products".to_string()
}

fn default_image_urls_column() -> Option<String> {
    Some("image_urls".to_string())
}

/// Everything a run needs besides the CSV itself: the handle -> canonical
/// name mapping, target table names, and the rendering policies.
///
/// Loaded from a JSON file so the mapping can be varied per store without
/// recompiling; only `product_mapping` is required, the rest have defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// External product handle -> canonical product name in the target store.
    /// Only handles listed here are eligible for import.
    pub product_mapping: IndexMap<String, String>,
    #[serde(default = "default_reviews_table")]
    pub reviews_table: String,
    #[serde(default = "default_products_table")]
    pub products_table: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    #[serde(default)]
    pub helpful_tiers: HelpfulTiers,
    #[serde(default)]
    pub timestamp_mode: TimestampMode,
    /// Column receiving the JSON-encoded image URL array; `null` omits the
    /// column from the INSERT entirely.
    #[serde(default = "default_image_urls_column")]
    pub image_urls_column: Option<String>,
}

impl ImportConfig {
    /// Build a config with defaults around the given mapping.
    pub fn with_mapping(product_mapping: IndexMap<String, String>) -> Self {
        Self {
            product_mapping,
            reviews_table: default_reviews_table(),
            products_table: default_products_table(),
            match_mode: MatchMode::default(),
            helpful_tiers: HelpfulTiers::default(),
            timestamp_mode: TimestampMode::default(),
            image_urls_column: default_image_urls_column(),
        }
    }

    /// Load and validate a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.product_mapping.is_empty() {
            bail!("product_mapping is empty; nothing could ever be imported");
        }
        for (handle, name) in &self.product_mapping {
            if handle.trim().is_empty() || name.trim().is_empty() {
                bail!("product_mapping contains a blank handle or product name");
            }
        }
        if self.reviews_table.trim().is_empty() || self.products_table.trim().is_empty() {
            bail!("reviews_table and products_table must be non-empty");
        }
        Ok(())
    }
}
