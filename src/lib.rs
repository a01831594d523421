//! Turns a CSV export of product reviews into a ready-to-run SQL import
//! script: per mapped product, a DELETE guard followed by one bulk
//! `INSERT ... SELECT ... UNION ALL` statement, preceded by a summary header.
//!
//! The whole pipeline is pure and deterministic; regenerating a script from
//! the same export and config yields byte-identical output.

pub mod config;
pub mod logging;
pub mod normalization;
pub mod render;
pub mod source;
pub mod transform;

pub mod util {
    pub mod env;
}

use std::io::Read;
use std::path::Path;

use anyhow::Result;
use tracing::info;

use config::ImportConfig;
use source::SourceRow;

fn script_from_rows(cfg: &ImportConfig, rows: &[SourceRow]) -> Result<String> {
    let records = transform::transform_rows(rows, cfg)?;
    let groups = transform::group_by_product(records);
    info!(
        rows = rows.len(),
        products = groups.len(),
        reviews = groups.values().map(Vec::len).sum::<usize>(),
        "review export transformed"
    );
    render::render_script(&groups, cfg)
}

/// Run the full pipeline against any reader: read -> filter -> normalize ->
/// group -> render.
///
/// The script is returned whole so the caller can write it atomically; a
/// fatal error anywhere (schema, rating, timestamp) produces no output at
/// all rather than a truncated script.
pub fn generate_script<R: Read>(cfg: &ImportConfig, input: R) -> Result<String> {
    script_from_rows(cfg, &source::read_rows(input)?)
}

/// Same pipeline, reading the export from a file on disk.
pub fn generate_script_from_path(cfg: &ImportConfig, path: &Path) -> Result<String> {
    script_from_rows(cfg, &source::read_rows_from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    const HEADER: &str = "product_handle,status,rating,review_title,review_content,reviewer_name,reviewer_location,verified,review_date,review_id,image_urls";

    fn test_config() -> ImportConfig {
        ImportConfig::with_mapping(indexmap! {
            "mumbies-wood-chew".to_string() => "Mumbies Original Wood Chew".to_string(),
        })
    }

    #[test]
    fn end_to_end_keeps_published_rows_in_order() {
        let csv = format!(
            "{HEADER}\n\
             mumbies-wood-chew,published,5.0,First,Loved it,Ana,TX,True,2024-01-01T10:00:00Z,rev_1,\n\
             mumbies-wood-chew,hidden,1.0,Spam,Junk,Bot,,False,2024-01-02T10:00:00Z,rev_2,\n\
             mumbies-wood-chew,published,4.0,Second,Solid,Ben,CA,False,2024-01-03T10:00:00Z,rev_3,\n"
        );
        let script = generate_script(&test_config(), csv.as_bytes()).unwrap();

        assert_eq!(script.matches("DELETE FROM").count(), 1);
        assert_eq!(script.matches("INSERT INTO").count(), 1);
        assert!(script.contains("Total reviews to import: 2"));
        assert!(!script.contains("Spam"));

        let first = script.find("'First'").unwrap();
        let second = script.find("'Second'").unwrap();
        assert!(first < second);
    }

    #[test]
    fn unmapped_handles_never_reach_the_output() {
        let csv = format!(
            "{HEADER}\n\
             other-product,published,5.0,Nice,Good,Cat,,True,2024-01-01T10:00:00Z,rev_9,\n"
        );
        let script = generate_script(&test_config(), csv.as_bytes()).unwrap();
        assert!(script.contains("Total reviews to import: 0"));
        assert!(!script.contains("DELETE"));
        assert!(!script.contains("rev_9"));
    }

    #[test]
    fn regenerated_scripts_are_byte_identical() {
        let csv = format!(
            "{HEADER}\n\
             mumbies-wood-chew,published,5.0,Great,,Ana,TX,True,2024-01-01T10:00:00Z,rev_1,\"http://a, http://b\"\n"
        );
        let cfg = test_config();
        let a = generate_script(&cfg, csv.as_bytes()).unwrap();
        let b = generate_script(&cfg, csv.as_bytes()).unwrap();
        assert_eq!(a, b);
        // Empty content fell back to the title, so the record is complete.
        assert!(a.contains("'Great',\n    'Great',"));
        assert!(a.contains("'[\"http://a\",\"http://b\"]'::jsonb"));
    }
}
