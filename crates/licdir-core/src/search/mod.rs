//! Search layer - smart phrase parsing and SQL query assembly
//!
//! # Architecture
//!
//! - `cities`: known California city names used for city extraction
//! - `trades`: ordered trade keyword table mapped to classification codes
//! - `parser`: free-text phrase -> `(conditions, params)` predicate set
//! - `query`: predicate set + base filters + pagination -> executable SQL

pub mod cities;
pub mod parser;
pub mod query;
pub mod trades;

// Re-export commonly used types
pub use parser::{parse_smart_search, PredicateSet};
pub use query::{AssembledQuery, QueryOptions};
pub use trades::{match_trade, TradePattern};
