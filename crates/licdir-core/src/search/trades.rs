//! Trade keyword table
//!
//! Maps free-text trade keywords to CSLB-style classification codes. The
//! table is ordered: the first pattern that matches wins and no later entry
//! is tried.

use regex::Regex;
use std::sync::OnceLock;

/// A single trade keyword entry: keyword alternation, classification code,
/// and human-readable trade label.
#[derive(Debug)]
pub struct TradePattern {
    /// Unanchored keyword alternation matched against the lowercased phrase
    pub pattern: Regex,
    /// Classification code, e.g. `C-36`
    pub code: &'static str,
    /// Trade label, e.g. `Plumbing`
    pub label: &'static str,
}

static TRADE_TABLE: OnceLock<Vec<TradePattern>> = OnceLock::new();

/// The ordered trade keyword table. Table order is priority order.
pub fn trade_table() -> &'static [TradePattern] {
    TRADE_TABLE.get_or_init(|| {
        let entry = |pattern: &str, code: &'static str, label: &'static str| TradePattern {
            // Patterns are static literals; a failure here is a programming
            // error caught by the table test below.
            pattern: Regex::new(pattern).unwrap(),
            code,
            label,
        };
        vec![
            entry(r"plumb", "C-36", "Plumbing"),
            entry(r"electr", "C-10", "Electrical"),
            entry(r"roof", "C-39", "Roofing"),
            entry(r"paint", "C-33", "Painting and Decorating"),
            entry(r"hvac|heating|air.?condition|furnace", "C-20", "HVAC"),
            entry(r"landscap|garden", "C-27", "Landscaping"),
            entry(r"concrete|cement", "C-8", "Concrete"),
            entry(r"drywall|sheetrock", "C-9", "Drywall"),
            entry(r"floor|carpet|tile", "C-15", "Flooring and Floor Covering"),
            entry(r"solar", "C-46", "Solar"),
            entry(r"fenc", "C-13", "Fencing"),
            entry(r"general\s?(build|contract)|\bbuilder\b|remodel", "B", "General Building"),
        ]
    })
}

/// Find the first trade pattern matching the given lowercased phrase.
pub fn match_trade(phrase: &str) -> Option<&'static TradePattern> {
    trade_table().iter().find(|t| t.pattern.is_match(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_compiles_and_has_expected_entries() {
        let table = trade_table();
        assert!(table.len() >= 12);
        assert!(table.iter().any(|t| t.code == "C-36"));
        assert!(table.iter().any(|t| t.code == "B"));
    }

    #[test]
    fn test_keyword_variants_match() {
        assert_eq!(match_trade("plumber").unwrap().code, "C-36");
        assert_eq!(match_trade("plumbing").unwrap().code, "C-36");
        assert_eq!(match_trade("electrician").unwrap().code, "C-10");
        assert_eq!(match_trade("roofer").unwrap().code, "C-39");
        assert_eq!(match_trade("hvac").unwrap().code, "C-20");
        assert_eq!(match_trade("landscaper").unwrap().code, "C-27");
        assert_eq!(match_trade("builder").unwrap().code, "B");
    }

    #[test]
    fn test_first_match_wins() {
        // "solar" appears before the general-building fallback entries, so a
        // phrase matching both resolves to the earlier row.
        let hit = match_trade("solar remodel").unwrap();
        assert_eq!(hit.code, "C-46");
    }

    #[test]
    fn test_empty_phrase_matches_nothing() {
        assert!(match_trade("").is_none());
    }

    #[test]
    fn test_unknown_word_matches_nothing() {
        assert!(match_trade("zzgrommet").is_none());
    }
}
