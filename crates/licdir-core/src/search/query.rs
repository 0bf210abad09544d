//! Query assembly
//!
//! Splices a parsed predicate set into the full contractor search statement:
//! fixed base predicates first (geography and license-status allow-list),
//! then the parser's conditions, then ordering and pagination. Also produces
//! the matching `COUNT(*)` statement for pagination totals.

use crate::search::parser::PredicateSet;

/// Every search is restricted to this state.
pub const BASE_STATE: &str = "CA";

/// License statuses that appear in search results. Revoked and otherwise
/// disqualified licenses are excluded at the query level.
pub const STATUS_ALLOW_LIST: &[&str] = &["CLEAR", "ACTIVE"];

/// Column list shared by search statements and the repository row mapping.
pub const CONTRACTOR_COLUMNS: &str = "license_no, business_name, city, state, zip, phone, status, \
     classification, raw_classifications, classification_codes, trade, \
     issue_date, expire_date, created_at, updated_at";

/// Pagination options for an assembled query.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    pub limit: i64,
    pub offset: i64,
}

/// A ready-to-execute search statement with its positionally ordered bind
/// values. `limit` and `offset` are bound after `params`, matching the two
/// trailing placeholders in `sql`.
#[derive(Debug, Clone)]
pub struct AssembledQuery {
    pub sql: String,
    pub count_sql: String,
    pub params: Vec<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Build the search and count statements for a predicate set.
///
/// The predicate set's placeholders are expected to start at `$1`; the
/// pagination placeholders continue the numbering immediately after the last
/// parser parameter.
pub fn assemble(predicates: &PredicateSet, opts: QueryOptions) -> AssembledQuery {
    let mut where_clause = format!(
        "state = '{}' AND status IN ({})",
        BASE_STATE,
        STATUS_ALLOW_LIST
            .iter()
            .map(|s| format!("'{s}'"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if !predicates.is_empty() {
        where_clause.push_str(" AND ");
        where_clause.push_str(&predicates.joined());
    }

    let limit_index = predicates.params.len() + 1;
    let offset_index = limit_index + 1;

    let sql = format!(
        "SELECT {CONTRACTOR_COLUMNS} FROM contractors WHERE {where_clause} \
         ORDER BY business_name LIMIT ${limit_index} OFFSET ${offset_index}"
    );
    let count_sql = format!("SELECT COUNT(*) FROM contractors WHERE {where_clause}");

    AssembledQuery {
        sql,
        count_sql,
        params: predicates.params.clone(),
        limit: opts.limit,
        offset: opts.offset,
    }
}
