use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::schema::{Catalog, Schema, Table};

type ColumnSet<'a> = BTreeSet<&'a str>;

/// Validate internal consistency of a catalog snapshot.
///
/// This checks:
/// - duplicate schemas/tables/columns
/// - primary key and index columns exist
/// - foreign key columns and referenced targets exist
pub fn validate_catalog(catalog: &Catalog) -> Result<()> {
    let mut names: BTreeMap<&str, BTreeMap<&str, ColumnSet<'_>>> = BTreeMap::new();

    for schema in &catalog.schemas {
        if names.contains_key(schema.name.as_str()) {
            return Err(Error::InvalidCatalog(format!(
                "duplicate schema name: {}",
                schema.name
            )));
        }

        let mut tables = BTreeMap::new();
        for table in &schema.tables {
            if tables.contains_key(table.name.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate table name: {}",
                    schema.qualify(&table.name)
                )));
            }

            let mut columns = BTreeSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(Error::InvalidCatalog(format!(
                        "duplicate column name: {}.{}",
                        schema.qualify(&table.name),
                        column.name
                    )));
                }
            }

            tables.insert(table.name.as_str(), columns);
        }

        names.insert(schema.name.as_str(), tables);
    }

    for schema in &catalog.schemas {
        let tables = &names[schema.name.as_str()];
        for table in &schema.tables {
            validate_table(schema, table, &tables[table.name.as_str()], &names)?;
        }
    }

    Ok(())
}

fn validate_table(
    schema: &Schema,
    table: &Table,
    columns: &ColumnSet<'_>,
    names: &BTreeMap<&str, BTreeMap<&str, ColumnSet<'_>>>,
) -> Result<()> {
    let table_name = schema.qualify(&table.name);

    if let Some(pk) = &table.primary_key {
        for column in &pk.columns {
            if !columns.contains(column.as_str()) {
                return Err(Error::reference(
                    format!("{table_name}.{column}"),
                    "primary key column not found",
                ));
            }
        }
    }

    for index in &table.indexes {
        for column in &index.columns {
            if !columns.contains(column.as_str()) {
                return Err(Error::reference(
                    format!("{table_name}.{column}"),
                    format!("column of index {} not found", index.name),
                ));
            }
        }
    }

    for fk in &table.foreign_keys {
        let fk_label = fk.name.as_deref().unwrap_or("<unnamed>");
        if fk.column_references.is_empty() {
            return Err(Error::reference(
                format!("{table_name}/{fk_label}"),
                "foreign key has no column references",
            ));
        }

        for column in fk.columns() {
            if !columns.contains(column) {
                return Err(Error::reference(
                    format!("{table_name}.{column}"),
                    format!("column of foreign key {fk_label} not found"),
                ));
            }
        }

        let referenced = names
            .get(fk.referenced_schema.as_str())
            .and_then(|tables| tables.get(fk.referenced_table.as_str()))
            .ok_or_else(|| {
                Error::reference(
                    format!("{table_name}/{fk_label}"),
                    format!(
                        "referenced table not found: {}",
                        qualified(&fk.referenced_schema, &fk.referenced_table)
                    ),
                )
            })?;

        for column in fk.referenced_columns() {
            if !referenced.contains(column) {
                return Err(Error::reference(
                    format!(
                        "{}.{column}",
                        qualified(&fk.referenced_schema, &fk.referenced_table)
                    ),
                    format!("column referenced by foreign key {fk_label} not found"),
                ));
            }
        }
    }

    Ok(())
}

fn qualified(schema: &str, table: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{schema}.{table}")
    }
}
