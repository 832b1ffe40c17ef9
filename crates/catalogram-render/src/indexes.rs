use catalogram_core::{Index, Table};

use crate::sanitize::IdentifierRules;

/// Whether `index` duplicates the table's primary key.
///
/// Column lists are compared position by position after sanitization.
pub fn is_redundant(table: &Table, index: &Index, rules: &IdentifierRules) -> bool {
    let Some(pk) = &table.primary_key else {
        return false;
    };
    pk.columns.len() == index.columns.len()
        && pk
            .columns
            .iter()
            .zip(&index.columns)
            .all(|(pk_column, index_column)| {
                rules.sanitize(pk_column) == rules.sanitize(index_column)
            })
}

/// Indexes to display, in declared order, without primary-key duplicates.
pub fn display_indexes<'a>(table: &'a Table, rules: &IdentifierRules) -> Vec<&'a Index> {
    table
        .indexes
        .iter()
        .filter(|index| !is_redundant(table, index, rules))
        .collect()
}
