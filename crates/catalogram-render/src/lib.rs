//! Catalog-to-notation rendering for catalogram.
//!
//! This crate walks a validated [`catalogram_core::CatalogView`] and streams
//! one of several text notations (Mermaid ER diagrams, DBML, Markdown and
//! PlantUML), each with its own identifier rules.

pub mod classify;
pub mod driver;
pub mod error;
pub mod format;
pub mod indexes;
pub mod options;
pub mod sanitize;

pub use classify::{ColumnFlags, ColumnRole, classify};
pub use driver::{
    RenderSummary, render, render_dbml, render_markdown, render_mermaid, render_plantuml,
    render_to_string,
};
pub use error::{RenderError, RenderResult};
pub use format::{DiagramFormat, Renderer};
pub use indexes::{display_indexes, is_redundant};
pub use options::RenderOptions;
pub use sanitize::{FALLBACK_NAME, IdentifierRules, QuotingRule, sanitize};
