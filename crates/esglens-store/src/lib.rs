//! # esglens-store
//!
//! Storage layer for esglens: a DuckDB-backed company store behind a
//! backend-neutral [`EntityStore`] trait, a generic staging repository with
//! unit-of-work commit semantics, an in-memory store for tests and
//! zero-setup use, and the starter-catalog seeder.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`repository`] | `EntityStore` collaborator trait and the generic `Repository` unit of work |
//! | [`companies`] | DuckDB `CompanyStore` and the `CompanyRepository` domain queries |
//! | [`memory`] | In-memory `EntityStore` with the same commit contract |
//! | [`duckdb`] | Connection reuse for the DuckDB database file |
//! | [`migrations`] | Versioned schema DDL |
//! | [`seed`] | Idempotent starter-catalog seeding |
//!
//! ## Consistency
//!
//! Mutations are staged on a [`Repository`] and become visible only when
//! `save_changes` commits them as one atomic batch. The `companies.symbol`
//! column carries a UNIQUE index, so a duplicate symbol that slips past the
//! advisory `is_symbol_unique` pre-check still fails at commit time and
//! surfaces as [`StoreError::Conflict`].

pub mod companies;
pub mod duckdb;
pub mod memory;
pub mod migrations;
pub mod repository;
pub mod seed;

use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub use companies::{CompanyRepository, CompanyStore, ESG_PERFORMER_FLOOR};
pub use duckdb::{DuckDbConnectionManager, PooledConnection};
pub use memory::MemoryStore;
pub use repository::{EntityStore, Repository, StagedOp};
pub use seed::{seed_catalog, SeedReport, Seeder};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Commit-time uniqueness violation on a company symbol.
    #[error("symbol '{symbol}' is already registered")]
    Conflict { symbol: String },

    /// Update or delete staged for an entity that was never committed.
    #[error("entity has no identity; commit it before updating or deleting")]
    MissingId,

    /// A stored row no longer satisfies the domain contracts.
    #[error("invalid stored row: {0}")]
    InvalidRow(String),
}

/// Configuration for the company store database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for esglens data.
    pub home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections to retain.
    pub max_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let home = resolve_esglens_home();
        let db_path = home.join("esglens.duckdb");
        Self {
            home,
            db_path,
            max_pool_size: 4,
        }
    }
}

impl StoreConfig {
    /// Config pointing at an explicit database file.
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        let db_path = db_path.into();
        let home = db_path
            .parent()
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        Self {
            home,
            db_path,
            max_pool_size: 4,
        }
    }
}

fn resolve_esglens_home() -> PathBuf {
    if let Some(path) = env::var_os("ESGLENS_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".esglens");
    }

    PathBuf::from(".esglens")
}
