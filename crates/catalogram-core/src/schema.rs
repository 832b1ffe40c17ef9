use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{ForeignKey, Index, PrimaryKey};
use crate::types::TableKind;

/// Read-only snapshot of a database's structural metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    /// Contract version for this snapshot format.
    pub schema_version: String,
    /// Database engine identifier (e.g. `postgres`).
    pub engine: String,
    /// Database name when available.
    #[serde(default)]
    pub database: Option<String>,
    /// Product and version string reported by the database.
    #[serde(default)]
    pub database_version: Option<String>,
    /// Free-text description of how and when the snapshot was taken.
    #[serde(default)]
    pub crawl_info: Option<String>,
    /// Schemas in declared order.
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

impl Catalog {
    /// Number of tables across all schemas.
    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|schema| schema.tables.len()).sum()
    }
}

/// A namespace owning an ordered set of tables.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    /// Full schema name; empty for databases without schemas.
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Schema {
    /// Schema-qualified name of a table owned by this schema.
    pub fn qualify(&self, table_name: &str) -> String {
        if self.name.is_empty() {
            table_name.to_string()
        } else {
            format!("{}.{}", self.name, table_name)
        }
    }
}

/// A table-like object and its keys.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub kind: TableKind,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    /// Imported foreign keys: this table is the child (referencing) side.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn is_view(&self) -> bool {
        self.kind == TableKind::View
    }
}

/// Column metadata for a table-like object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    /// Declared data type name (e.g. `character varying(255)`).
    pub data_type: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

fn default_nullable() -> bool {
    true
}
