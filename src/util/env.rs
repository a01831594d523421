//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in the binary (or rely on lazy Once).
use std::sync::Once;

static INIT: Once = Once::new();

/// Load .env if present, exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Boolean flag; accepts 1/true/on/yes (case-insensitive) as true.
pub fn env_flag(key: &str, default: bool) -> bool {
    init_env();
    match std::env::var(key) {
        Ok(raw) => {
            let v = raw.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "on" | "yes")
        }
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_opt_treats_blank_as_unset() {
        std::env::set_var("REVIEW2SQL_TEST_BLANK", "   ");
        assert_eq!(env_opt("REVIEW2SQL_TEST_BLANK"), None);
    }

    #[test]
    fn env_flag_accepts_common_truthy_spellings() {
        for v in ["1", "true", "on", "YES"] {
            std::env::set_var("REVIEW2SQL_TEST_FLAG", v);
            assert!(env_flag("REVIEW2SQL_TEST_FLAG", false), "value {v}");
        }
    }
}
