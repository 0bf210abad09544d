//! Licdir Core Library
//!
//! This crate provides the core functionality for licdir, including:
//! - Smart search parsing (free-text phrase -> SQL predicates)
//! - Query assembly (base filters, pagination, count queries)
//! - Contractor records and repository (SQLite)
//! - Search API with caching and metrics
//! - Configuration management

pub mod api;
pub mod cache;
pub mod config;
pub mod contractors;
pub mod error;
pub mod metrics;
pub mod search;
pub mod storage;

pub use error::{Error, Result};
