use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of table represented in the catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    #[default]
    Table,
    View,
    MaterializedView,
    ForeignTable,
    PartitionedTable,
}

impl TableKind {
    /// Kind as shown in diagrams: views stay views, everything else is a table.
    pub fn display_kind(self) -> &'static str {
        match self {
            TableKind::View => "view",
            _ => "table",
        }
    }
}

/// Referential action taken on update or delete of a parent row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
    #[default]
    Unknown,
}

impl ForeignKeyRule {
    pub fn as_str(self) -> &'static str {
        match self {
            ForeignKeyRule::NoAction => "no action",
            ForeignKeyRule::Restrict => "restrict",
            ForeignKeyRule::Cascade => "cascade",
            ForeignKeyRule::SetNull => "set null",
            ForeignKeyRule::SetDefault => "set default",
            ForeignKeyRule::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != ForeignKeyRule::Unknown
    }
}

impl fmt::Display for ForeignKeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
