use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// How review timestamps are carried into the generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    /// Textual `Z` -> `+00` substitution, every occurrence, no reparse.
    /// Byte-compatible with prior exports.
    #[default]
    Legacy,
    /// RFC 3339 parse, re-rendered in UTC. Malformed input aborts the run.
    Strict,
}

/// Convert a source `review_date` string into the form embedded in the
/// `TIMESTAMP '...'` literal.
pub fn normalize_review_date(raw: &str, mode: TimestampMode) -> Result<String> {
    match mode {
        TimestampMode::Legacy => Ok(raw.replace('Z', "+00")),
        TimestampMode::Strict => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid review_date {raw:?}"))?;
            Ok(parsed
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S+00")
                .to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_replaces_trailing_z() {
        assert_eq!(
            normalize_review_date("2024-01-01T10:00:00Z", TimestampMode::Legacy).unwrap(),
            "2024-01-01T10:00:00+00"
        );
    }

    #[test]
    fn legacy_replaces_every_z_occurrence() {
        // The substitution is textual, so a Z anywhere in the string is hit.
        assert_eq!(
            normalize_review_date("2024-01-01TZ0:00:00Z", TimestampMode::Legacy).unwrap(),
            "2024-01-01T+000:00:00+00"
        );
    }

    #[test]
    fn legacy_leaves_offset_timestamps_alone() {
        assert_eq!(
            normalize_review_date("2024-01-01T10:00:00+02:00", TimestampMode::Legacy).unwrap(),
            "2024-01-01T10:00:00+02:00"
        );
    }

    #[test]
    fn strict_matches_legacy_for_well_formed_utc_input() {
        let raw = "2024-01-01T10:00:00Z";
        assert_eq!(
            normalize_review_date(raw, TimestampMode::Strict).unwrap(),
            normalize_review_date(raw, TimestampMode::Legacy).unwrap()
        );
    }

    #[test]
    fn strict_normalizes_offsets_to_utc() {
        assert_eq!(
            normalize_review_date("2024-01-01T10:00:00+02:00", TimestampMode::Strict).unwrap(),
            "2024-01-01T08:00:00+00"
        );
    }

    #[test]
    fn strict_rejects_garbage() {
        assert!(normalize_review_date("yesterday-ish", TimestampMode::Strict).is_err());
    }
}
