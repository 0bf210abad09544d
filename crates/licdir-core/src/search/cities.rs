//! Known city list for city extraction
//!
//! City extraction only recognizes names from this fixed list (plus the
//! prepositional `in/near/at/from` pattern handled by the parser). Matching is
//! case-insensitive and exact; there is no fuzzy matching.

use std::sync::OnceLock;

/// California cities recognized during search parsing.
///
/// Order here is unimportant; lookups go through
/// [`known_cities_longest_first`] so that multi-word names like
/// "los angeles" win over shorter prefixes.
pub const KNOWN_CITIES: &[&str] = &[
    "los angeles",
    "san diego",
    "san jose",
    "san francisco",
    "fresno",
    "sacramento",
    "long beach",
    "oakland",
    "bakersfield",
    "anaheim",
    "santa ana",
    "riverside",
    "stockton",
    "irvine",
    "chula vista",
    "fremont",
    "santa clarita",
    "san bernardino",
    "modesto",
    "fontana",
    "moreno valley",
    "oxnard",
    "huntington beach",
    "glendale",
    "elk grove",
    "santa rosa",
    "ontario",
    "rancho cucamonga",
    "oceanside",
    "garden grove",
    "lancaster",
    "palmdale",
    "corona",
    "salinas",
    "hayward",
    "pomona",
    "escondido",
    "sunnyvale",
    "torrance",
    "pasadena",
    "orange",
    "fullerton",
    "roseville",
    "visalia",
    "concord",
    "thousand oaks",
    "simi valley",
    "santa clara",
    "victorville",
    "vallejo",
    "berkeley",
];

static SORTED: OnceLock<Vec<&'static str>> = OnceLock::new();

/// Known cities sorted longest-first, so "los angeles" is tried before any
/// single-word name that happens to share a prefix.
pub fn known_cities_longest_first() -> &'static [&'static str] {
    SORTED.get_or_init(|| {
        let mut cities: Vec<&'static str> = KNOWN_CITIES.to_vec();
        cities.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        cities
    })
}
