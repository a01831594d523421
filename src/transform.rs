use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::debug;

use crate::config::ImportConfig;
use crate::normalization::escape::sql_escape;
use crate::normalization::helpful::helpful_count;
use crate::normalization::timestamp::normalize_review_date;
use crate::source::SourceRow;

/// A review ready for rendering. String fields are already SQL-escaped;
/// nothing downstream may escape them again.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    /// Canonical product name from the mapping, raw (not escaped).
    pub product_name: String,
    pub rating: f64,
    /// The rating exactly as it appeared in the CSV, emitted verbatim so a
    /// regenerated script matches older exports ("5.0" stays "5.0").
    pub rating_literal: String,
    pub title: String,
    pub content: String,
    pub reviewer_name: String,
    pub reviewer_location: String,
    pub verified: bool,
    pub created_at: String,
    pub helpful_count: u64,
    pub image_urls: Vec<String>,
}

/// Inclusion predicate: the handle must be mapped and the review published.
/// Case-sensitive exact matches on both, no other field consulted.
pub fn row_included(row: &SourceRow, cfg: &ImportConfig) -> bool {
    cfg.product_mapping.contains_key(&row.product_handle) && row.status == "published"
}

/// Turn an included row into a `ReviewRecord`.
///
/// A rating that does not parse as a decimal aborts the whole run; one
/// malformed row must not silently corrupt the generated SQL.
pub fn normalize_row(row: &SourceRow, cfg: &ImportConfig) -> Result<ReviewRecord> {
    let product_name = cfg
        .product_mapping
        .get(&row.product_handle)
        .with_context(|| format!("unmapped product handle {:?}", row.product_handle))?
        .clone();

    let rating: f64 = row
        .rating
        .parse()
        .with_context(|| format!("review {}: invalid rating {:?}", row.review_id, row.rating))?;

    let title = sql_escape(&row.review_title);
    let content = if row.review_content.is_empty() {
        title.clone()
    } else {
        sql_escape(&row.review_content)
    };

    let image_urls = if row.image_urls.is_empty() {
        Vec::new()
    } else {
        row.image_urls
            .split(',')
            .map(|url| url.trim().to_string())
            .collect()
    };

    Ok(ReviewRecord {
        product_name,
        rating,
        rating_literal: row.rating.clone(),
        title,
        content,
        reviewer_name: sql_escape(&row.reviewer_name),
        reviewer_location: sql_escape(&row.reviewer_location),
        verified: row.verified == "True",
        created_at: normalize_review_date(&row.review_date, cfg.timestamp_mode)?,
        helpful_count: helpful_count(&row.review_id, rating, cfg.helpful_tiers),
        image_urls,
    })
}

/// Filter and normalize the whole export.
pub fn transform_rows(rows: &[SourceRow], cfg: &ImportConfig) -> Result<Vec<ReviewRecord>> {
    let mut records = Vec::new();
    for row in rows {
        if !row_included(row, cfg) {
            continue;
        }
        records.push(normalize_row(row, cfg)?);
    }
    debug!(
        total = rows.len(),
        kept = records.len(),
        "filtered review export"
    );
    Ok(records)
}

/// Group records by canonical product name, preserving first-seen group order
/// and intra-group insertion order.
pub fn group_by_product(records: Vec<ReviewRecord>) -> IndexMap<String, Vec<ReviewRecord>> {
    let mut groups: IndexMap<String, Vec<ReviewRecord>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.product_name.clone())
            .or_default()
            .push(record);
    }
    groups
}
