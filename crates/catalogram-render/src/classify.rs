use catalogram_core::{Column, Table};

/// Structural role of a column, used when a notation shows one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Plain,
    PrimaryKey,
    ForeignKey,
    UniqueIndexMember,
}

impl ColumnRole {
    /// Single-marker suffix for the role, if any.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            ColumnRole::PrimaryKey => Some("PK"),
            ColumnRole::ForeignKey => Some("FK"),
            ColumnRole::UniqueIndexMember => Some("UK"),
            ColumnRole::Plain => None,
        }
    }
}

/// Every key membership of a column, for notations that show several badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnFlags {
    pub primary_key: bool,
    pub foreign_key: bool,
    pub unique_index: bool,
}

impl ColumnFlags {
    /// Derive flags from the column's own table only.
    pub fn of(table: &Table, column: &Column) -> Self {
        let name = column.name.as_str();
        let primary_key = table
            .primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns.iter().any(|member| member == name));
        let foreign_key = table
            .foreign_keys
            .iter()
            .any(|fk| fk.columns().any(|member| member == name));
        let unique_index = table
            .indexes
            .iter()
            .filter(|index| index.unique)
            .any(|index| index.columns.iter().any(|member| member == name));

        Self {
            primary_key,
            foreign_key,
            unique_index,
        }
    }

    /// Collapse to one role: primary key > foreign key > unique index > plain.
    pub fn role(self) -> ColumnRole {
        if self.primary_key {
            ColumnRole::PrimaryKey
        } else if self.foreign_key {
            ColumnRole::ForeignKey
        } else if self.unique_index {
            ColumnRole::UniqueIndexMember
        } else {
            ColumnRole::Plain
        }
    }
}

pub fn classify(table: &Table, column: &Column) -> ColumnRole {
    ColumnFlags::of(table, column).role()
}
