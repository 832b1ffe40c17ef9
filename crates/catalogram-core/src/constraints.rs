use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::ForeignKeyRule;

/// Primary key definition preserving column order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PrimaryKey {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
}

/// Index definition preserving column order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

/// One (child column, parent column) pair of a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnReference {
    /// Column on the owning (child) table.
    pub column: String,
    /// Column on the referenced (parent) table.
    pub referenced_column: String,
}

/// Foreign key definition preserving column ordering.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    #[serde(default)]
    pub name: Option<String>,
    pub column_references: Vec<ColumnReference>,
    #[serde(default)]
    pub referenced_schema: String,
    pub referenced_table: String,
    #[serde(default)]
    pub update_rule: ForeignKeyRule,
    #[serde(default)]
    pub delete_rule: ForeignKeyRule,
}

impl ForeignKey {
    /// Child-side column names in declared key order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.column_references
            .iter()
            .map(|reference| reference.column.as_str())
    }

    /// Parent-side column names in declared key order.
    pub fn referenced_columns(&self) -> impl Iterator<Item = &str> {
        self.column_references
            .iter()
            .map(|reference| reference.referenced_column.as_str())
    }
}
