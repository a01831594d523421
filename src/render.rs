use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;

use crate::config::{ImportConfig, MatchMode};
use crate::normalization::escape::sql_escape;
use crate::transform::ReviewRecord;

fn product_id_subquery(cfg: &ImportConfig, product_name: &str) -> String {
    let name = sql_escape(product_name);
    match cfg.match_mode {
        MatchMode::Exact => format!(
            "(SELECT id FROM {} WHERE name = '{}')",
            cfg.products_table, name
        ),
        MatchMode::ILike => format!(
            "(SELECT id FROM {} WHERE name ILIKE '%{}%' LIMIT 1)",
            cfg.products_table, name
        ),
    }
}

fn product_exists_subquery(cfg: &ImportConfig, product_name: &str) -> String {
    let name = sql_escape(product_name);
    match cfg.match_mode {
        MatchMode::Exact => format!(
            "(SELECT 1 FROM {} WHERE name = '{}')",
            cfg.products_table, name
        ),
        MatchMode::ILike => format!(
            "(SELECT 1 FROM {} WHERE name ILIKE '%{}%')",
            cfg.products_table, name
        ),
    }
}

fn insert_columns(cfg: &ImportConfig) -> String {
    let mut cols = "product_id, rating, title, content, reviewer_name, reviewer_location, \
                    verified_purchase, is_approved, helpful_count, created_at"
        .to_string();
    if let Some(image_col) = &cfg.image_urls_column {
        cols.push_str(", ");
        cols.push_str(image_col);
    }
    cols
}

/// One `SELECT` arm of the bulk insert. Record fields arrive pre-escaped and
/// are interpolated verbatim.
fn render_select(cfg: &ImportConfig, product_name: &str, record: &ReviewRecord) -> Result<String> {
    let mut select = format!(
        "  SELECT\n    {},\n    {},\n    '{}',\n    '{}',\n    '{}',\n    '{}',\n    {},\n    true,\n    {},\n    TIMESTAMP '{}'",
        product_id_subquery(cfg, product_name),
        record.rating_literal,
        record.title,
        record.content,
        record.reviewer_name,
        record.reviewer_location,
        record.verified,
        record.helpful_count,
        record.created_at,
    );
    if cfg.image_urls_column.is_some() {
        let json = serde_json::to_string(&record.image_urls)
            .context("failed to encode image URLs as JSON")?;
        select.push_str(&format!(",\n    '{}'::jsonb", sql_escape(&json)));
    }
    Ok(select)
}

/// The statement block for one product: a no-op-safe DELETE guard, then (for
/// a non-empty record list) one bulk INSERT whose trailing WHERE EXISTS lets
/// the whole statement vanish quietly when the product row is absent.
pub fn render_product_block(
    cfg: &ImportConfig,
    product_name: &str,
    records: &[ReviewRecord],
) -> Result<String> {
    let mut block = format!(
        "-- Import {} reviews for {}\nDELETE FROM {} WHERE product_id = {};\n\n",
        records.len(),
        product_name,
        cfg.reviews_table,
        product_id_subquery(cfg, product_name),
    );

    if !records.is_empty() {
        let selects: Vec<String> = records
            .iter()
            .map(|record| render_select(cfg, product_name, record))
            .collect::<Result<_>>()?;
        block.push_str(&format!(
            "INSERT INTO {} ({})\n{}\nWHERE EXISTS {};\n\n\n",
            cfg.reviews_table,
            insert_columns(cfg),
            selects.iter().join("\nUNION ALL\n"),
            product_exists_subquery(cfg, product_name),
        ));
    }
    Ok(block)
}

/// Render the complete import script: summary header first, then one block
/// per product in first-seen order. The header is emitted even when there is
/// nothing to import.
pub fn render_script(
    groups: &IndexMap<String, Vec<ReviewRecord>>,
    cfg: &ImportConfig,
) -> Result<String> {
    let total: usize = groups.values().map(Vec::len).sum();

    let mut script = String::new();
    script.push_str("/*\n  # Import All Product Reviews from CSV Export\n\n");
    script.push_str(&format!("  Total reviews to import: {total}\n"));
    for (product_name, records) in groups {
        script.push_str(&format!(
            "  - {}: {} reviews\n",
            product_name,
            records.len()
        ));
    }
    script.push_str("*/\n\n");

    for (product_name, records) in groups {
        script.push_str(&render_product_block(cfg, product_name, records)?);
    }
    Ok(script)
}
