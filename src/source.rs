use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

/// One record of the review export, exactly as it appears in the CSV.
/// All fields are raw strings; interpretation happens in the transform step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub product_handle: String,
    pub status: String,
    pub rating: String,
    pub review_title: String,
    pub review_content: String,
    pub reviewer_name: String,
    pub reviewer_location: String,
    pub verified: String,
    pub review_date: String,
    pub review_id: String,
    pub image_urls: String,
}

const REQUIRED_COLUMNS: [&str; 11] = [
    "product_handle",
    "status",
    "rating",
    "review_title",
    "review_content",
    "reviewer_name",
    "reviewer_location",
    "verified",
    "review_date",
    "review_id",
    "image_urls",
];

/// Read the whole export into memory from any reader.
///
/// The header is validated up front: every required column must be present by
/// exact name, and a miss aborts before any row is touched. Column order in
/// the file does not matter.
pub fn read_rows<R: Read>(input: R) -> Result<Vec<SourceRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let headers = rdr.headers().context("failed to read CSV header")?.clone();
    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, col) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == col)
            .ok_or_else(|| anyhow!("{col} column missing from CSV header"))?;
    }

    let mut rows = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec.with_context(|| format!("failed to read CSV record {}", line + 1))?;
        let field = |i: usize| rec.get(idx[i]).unwrap_or_default().to_string();
        rows.push(SourceRow {
            product_handle: field(0),
            status: field(1),
            rating: field(2),
            review_title: field(3),
            review_content: field(4),
            reviewer_name: field(5),
            reviewer_location: field(6),
            verified: field(7),
            review_date: field(8),
            review_id: field(9),
            image_urls: field(10),
        });
    }
    debug!(rows = rows.len(), "review export loaded");
    Ok(rows)
}

/// Open a CSV file and read it fully.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<SourceRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open review export {}", path.display()))?;
    read_rows(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "product_handle,status,rating,review_title,review_content,reviewer_name,reviewer_location,verified,review_date,review_id,image_urls";

    #[test]
    fn reads_rows_with_reordered_columns() {
        let csv = "\
status,product_handle,rating,review_title,review_content,reviewer_name,reviewer_location,verified,review_date,review_id,image_urls
published,mumbies-wood-chew,5.0,Great,Loved it,Ana,TX,True,2024-01-01T10:00:00Z,rev_1,
";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_handle, "mumbies-wood-chew");
        assert_eq!(rows[0].status, "published");
        assert_eq!(rows[0].review_id, "rev_1");
    }

    #[test]
    fn missing_column_names_the_column() {
        let csv = "product_handle,status,rating\nmumbies-wood-chew,published,5.0\n";
        let err = read_rows(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("review_title column missing"));
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let csv = format!("{HEADER}\n");
        assert!(read_rows(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn quoted_fields_with_commas_survive() {
        let csv = format!(
            "{HEADER}\nmumbies-wood-chew,published,5.0,\"Best, truly\",\"My dog's favorite\",Ana,\"Austin, TX\",True,2024-01-01T10:00:00Z,rev_1,\"http://a, http://b\"\n"
        );
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].review_title, "Best, truly");
        assert_eq!(rows[0].reviewer_location, "Austin, TX");
        assert_eq!(rows[0].image_urls, "http://a, http://b");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_rows_from_path(Path::new("/nonexistent/reviews.csv")).unwrap_err();
        assert!(err.to_string().contains("failed to open review export"));
    }
}
