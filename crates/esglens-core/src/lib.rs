//! Core contracts for esglens.
//!
//! This crate contains:
//! - The canonical company model and its creation input
//! - The normalized `Symbol` ticker newtype
//! - Backend-independent filter specifications for repository queries
//! - Validation errors shared by every layer

pub mod domain;
pub mod error;
pub mod filter;

pub use domain::{Company, CompanyDraft, CompanyField, Symbol, UtcDateTime};
pub use error::{CoreError, ValidationError};
pub use filter::{Comparator, Condition, FieldValue, Filter, Queryable};
