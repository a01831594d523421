use sha2::{Digest, Sha256};

/// Bucketing policy for the synthetic helpful count.
///
/// The exports this tool replaces disagreed on the number of rating tiers, so
/// the policy is a configuration point rather than a fixed law. `Two` is the
/// default because it matches the most complete of the prior export scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HelpfulTiers {
    /// rating >= 5.0 -> mod 25, else mod 15.
    #[default]
    Two,
    /// rating >= 5.0 -> mod 25, rating >= 4.0 -> mod 15, else mod 8.
    Three,
}

impl HelpfulTiers {
    fn bucket(self, rating: f64) -> u64 {
        match self {
            HelpfulTiers::Two => {
                if rating >= 5.0 {
                    25
                } else {
                    15
                }
            }
            HelpfulTiers::Three => {
                if rating >= 5.0 {
                    25
                } else if rating >= 4.0 {
                    15
                } else {
                    8
                }
            }
        }
    }
}

/// Version 1 of the stable review-id hash: SHA-256 over the identifier bytes,
/// first 8 digest bytes read big-endian as u64.
///
/// Unlike a general-purpose language hash this is identical across runs,
/// processes, and platforms, which keeps regenerated scripts byte-identical.
/// Changing this function changes every emitted helpful_count, so any revision
/// must ship as a new version, not an edit.
pub fn stable_hash_v1(review_id: &str) -> u64 {
    let digest = Sha256::digest(review_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Synthetic helpful count for one review: the stable id hash reduced modulo
/// a rating-tier bucket. Not a real helpfulness signal, just a reproducible
/// placeholder for display/sorting.
pub fn helpful_count(review_id: &str, rating: f64, tiers: HelpfulTiers) -> u64 {
    stable_hash_v1(review_id) % tiers.bucket(rating)
}
