/// Escape a raw value for inclusion in a single-quoted SQL string literal by
/// doubling every single quote.
///
/// Must be applied to raw input exactly once; callers hold the invariant that
/// escaped values are never fed back through here (doubling twice corrupts the
/// literal).
pub fn sql_escape(raw: &str) -> String {
    raw.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_every_single_quote() {
        assert_eq!(sql_escape("it's a dog's toy"), "it''s a dog''s toy");
    }

    #[test]
    fn empty_and_quote_free_strings_pass_through() {
        assert_eq!(sql_escape(""), "");
        assert_eq!(sql_escape("no quotes here"), "no quotes here");
    }

    #[test]
    fn round_trips_by_doubling_reversal() {
        let inputs = ["", "'", "''", "O'Brien", "a'b'c", "ends with '"];
        for raw in inputs {
            let escaped = sql_escape(raw);
            assert_eq!(escaped.replace("''", "'"), raw);
        }
    }
}
