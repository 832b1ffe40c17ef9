//! Core contracts for catalogram.
//!
//! This crate defines the read-only catalog snapshot types, catalog
//! validation, and the relationship resolver shared by the renderers and
//! the CLI.

pub mod constraints;
pub mod error;
pub mod relationships;
pub mod schema;
pub mod types;
pub mod validation;

pub use constraints::{ColumnReference, ForeignKey, Index, PrimaryKey};
pub use error::{Error, Result};
pub use relationships::{CatalogView, ColumnPair, Relationship, SchemaRef, TableRef};
pub use schema::{Catalog, Column, Schema, Table};
pub use types::{ForeignKeyRule, TableKind};
pub use validation::validate_catalog;

/// Current contract version for catalog snapshot files.
pub const SCHEMA_VERSION: &str = "0.1";
