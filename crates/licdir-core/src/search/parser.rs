//! Smart search phrase parsing
//!
//! Turns a free-text search phrase into a set of SQL predicate fragments and
//! bind values. The parser extracts at most one city and at most one trade
//! from the phrase, falling back to a business-name/license-number substring
//! search when neither applies.
//!
//! The function is total: any input, including empty strings, produces a
//! structurally valid predicate set. Rejecting empty searches is the
//! caller's job.
//!
//! Placeholders are emitted as `$n`, numbered contiguously from the
//! caller-supplied starting index in emission order. SQLite accepts this
//! syntax and the repository binds values positionally.

use crate::search::cities::known_cities_longest_first;
use crate::search::trades::match_trade;
use regex::Regex;
use std::sync::OnceLock;

/// Ordered SQL condition fragments plus their positionally coupled bind
/// values. Joining `conditions` with `AND` and binding `params` in order
/// yields a valid predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredicateSet {
    pub conditions: Vec<String>,
    pub params: Vec<String>,
}

impl PredicateSet {
    /// True when no condition was emitted
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Join the condition fragments with `AND`
    pub fn joined(&self) -> String {
        self.conditions.join(" AND ")
    }
}

/// Trailing `<phrase> in|near|at|from <city words>` pattern
fn preposition_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+(?:in|near|at|from)\s+(.+)$").unwrap())
}

/// All-digits or letter-prefixed license numbers, e.g. `996518` or `A123456`
fn license_number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\d+|[A-Za-z]\d+)$").unwrap())
}

/// Exact-match city predicate; matching is case- and padding-insensitive.
fn city_condition(index: usize) -> String {
    format!("UPPER(TRIM(city)) = UPPER(${index})")
}

/// Parse a free-text search phrase into SQL predicate fragments.
///
/// `start_param_index` is the first `$n` placeholder number to assign;
/// subsequent placeholders are numbered contiguously in emission order.
///
/// Resolution order:
/// 1. city extraction (prepositional pattern, then known-city prefix, then
///    known-city suffix)
/// 2. license-number short-circuit (drops any extracted city)
/// 3. multi-word phrases search business names directly (keeps the city)
/// 4. single-word trade keyword lookup
/// 5. business-name/license-number substring fallback
/// 6. trailing exact-match city filter
pub fn parse_smart_search(search_term: &str, start_param_index: usize) -> PredicateSet {
    let phrase = search_term.trim();
    let mut conditions = Vec::new();
    let mut params: Vec<String> = Vec::new();
    let mut next = start_param_index;

    // Step 1: extract at most one city, leaving the remainder
    let (remainder, city) = extract_city(phrase);
    let remainder = remainder.trim().to_string();

    // Step 2: phrases that look like a license number search only the
    // license column. Any city extracted above is intentionally dropped
    // here; see the module tests for the recorded asymmetry.
    if license_number_pattern().is_match(&remainder) {
        conditions.push(format!("license_no LIKE ${next}"));
        params.push(format!("%{remainder}%"));
        return PredicateSet { conditions, params };
    }

    // Step 3: multi-word remainders prioritize an exact business-name
    // search and never reach the trade table.
    if remainder.split_whitespace().count() > 1 {
        conditions.push(format!("business_name LIKE ${next}"));
        params.push(format!("%{remainder}%"));
        next += 1;
        if let Some(city) = city {
            conditions.push(city_condition(next));
            params.push(city);
        }
        return PredicateSet { conditions, params };
    }

    if let Some(trade) = match_trade(&remainder.to_lowercase()) {
        // Step 4: first matching trade wins; one compound condition over the
        // classification columns, consuming four consecutive parameters.
        conditions.push(format!(
            "(classification = ${} OR raw_classifications LIKE ${} OR classification_codes LIKE ${} OR trade LIKE ${})",
            next,
            next + 1,
            next + 2,
            next + 3
        ));
        params.push(trade.code.to_string());
        params.push(format!("%{}%", trade.code));
        params.push(format!("%{}%", trade.code));
        params.push(format!("%{}%", trade.label));
        next += 4;
    } else {
        // Step 5: fallback substring search over name and license number
        conditions.push(format!(
            "(business_name LIKE ${} OR license_no LIKE ${})",
            next,
            next + 1
        ));
        params.push(format!("%{remainder}%"));
        params.push(format!("%{remainder}%"));
        next += 2;
    }

    // Step 6: city filter goes last
    if let Some(city) = city {
        conditions.push(city_condition(next));
        params.push(city);
    }

    PredicateSet { conditions, params }
}

/// Split a phrase into `(remainder, extracted city)`.
///
/// Tried in order: trailing prepositional pattern, known-city prefix,
/// known-city suffix. At most one city is extracted; original casing of the
/// extracted substring is preserved.
fn extract_city(phrase: &str) -> (String, Option<String>) {
    if let Some(caps) = preposition_pattern().captures(phrase) {
        let whole = caps.get(0).expect("match always has group 0");
        let city = caps
            .get(1)
            .expect("pattern always captures city words")
            .as_str()
            .trim()
            .to_string();
        return (phrase[..whole.start()].to_string(), Some(city));
    }

    for city in known_cities_longest_first() {
        if starts_with_city(phrase, city) {
            let extracted = phrase[..city.len()].trim().to_string();
            let remainder = phrase[city.len() + 1..].to_string();
            return (remainder, Some(extracted));
        }
    }

    for city in known_cities_longest_first() {
        if ends_with_city(phrase, city) {
            let idx = phrase.len() - city.len();
            let extracted = phrase[idx..].trim().to_string();
            let remainder = phrase[..idx - 1].to_string();
            return (remainder, Some(extracted));
        }
    }

    (phrase.to_string(), None)
}

/// Case-insensitive `"<city> "` prefix check on the original phrase.
fn starts_with_city(phrase: &str, city: &str) -> bool {
    phrase.len() > city.len()
        && phrase.is_char_boundary(city.len())
        && phrase[..city.len()].eq_ignore_ascii_case(city)
        && phrase[city.len()..].starts_with(' ')
}

/// Case-insensitive `" <city>"` suffix check on the original phrase.
fn ends_with_city(phrase: &str, city: &str) -> bool {
    if phrase.len() <= city.len() {
        return false;
    }
    let idx = phrase.len() - city.len();
    phrase.is_char_boundary(idx)
        && phrase[idx..].eq_ignore_ascii_case(city)
        && phrase[..idx].ends_with(' ')
}
