use std::collections::BTreeMap;
use std::ops::{Deref, Range};

use crate::constraints::ForeignKey;
use crate::error::{Error, Result};
use crate::schema::{Catalog, Column, Schema, Table};
use crate::validation::validate_catalog;

/// Borrowed handle to a table together with its owning schema.
///
/// Equality is identity within one [`CatalogView`].
#[derive(Debug, Clone, Copy)]
pub struct TableRef<'a> {
    id: usize,
    schema: &'a Schema,
    table: &'a Table,
}

impl<'a> TableRef<'a> {
    /// Position of the table in declared catalog order.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Schema-qualified table name.
    pub fn full_name(&self) -> String {
        self.schema.qualify(&self.table.name)
    }
}

impl<'a> Deref for TableRef<'a> {
    type Target = Table;

    fn deref(&self) -> &Table {
        self.table
    }
}

impl PartialEq for TableRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TableRef<'_> {}

/// A schema and the contiguous run of its tables in the view.
#[derive(Debug, Clone)]
pub struct SchemaRef<'a> {
    schema: &'a Schema,
    tables: Range<usize>,
}

impl<'a> SchemaRef<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn name(&self) -> &'a str {
        &self.schema.name
    }
}

/// One resolved (parent column, child column) pair of a foreign key.
#[derive(Debug, Clone, Copy)]
pub struct ColumnPair<'a> {
    pub parent: &'a Column,
    pub child: &'a Column,
}

/// A foreign key with both ends resolved.
#[derive(Debug, Clone)]
pub struct Relationship<'a> {
    pub foreign_key: &'a ForeignKey,
    pub parent: TableRef<'a>,
    pub child: TableRef<'a>,
    /// Column pairs in declared key order.
    pub column_pairs: Vec<ColumnPair<'a>>,
}

impl Relationship<'_> {
    pub fn is_self_referencing(&self) -> bool {
        self.parent == self.child
    }
}

/// Read-only navigable view over a validated catalog.
///
/// Built once per render pass; holds only borrowed references.
#[derive(Debug)]
pub struct CatalogView<'a> {
    catalog: &'a Catalog,
    schemas: Vec<SchemaRef<'a>>,
    tables: Vec<TableRef<'a>>,
    // (schema name, table name) -> id
    lookup: BTreeMap<(&'a str, &'a str), usize>,
    imported: Vec<Vec<Relationship<'a>>>,
    // parent id -> (child id, position in the child's imported keys)
    exported: Vec<Vec<(usize, usize)>>,
}

impl<'a> CatalogView<'a> {
    /// Validate the catalog and resolve every foreign key.
    pub fn new(catalog: &'a Catalog) -> Result<Self> {
        validate_catalog(catalog)?;

        let mut schemas = Vec::with_capacity(catalog.schemas.len());
        let mut tables = Vec::with_capacity(catalog.table_count());
        let mut lookup: BTreeMap<(&str, &str), usize> = BTreeMap::new();

        for schema in &catalog.schemas {
            let start = tables.len();
            for table in &schema.tables {
                let id = tables.len();
                lookup.insert((schema.name.as_str(), table.name.as_str()), id);
                tables.push(TableRef { id, schema, table });
            }
            schemas.push(SchemaRef {
                schema,
                tables: start..tables.len(),
            });
        }

        let mut imported: Vec<Vec<Relationship<'a>>> = vec![Vec::new(); tables.len()];
        let mut exported: Vec<Vec<(usize, usize)>> = vec![Vec::new(); tables.len()];

        for child in &tables {
            for foreign_key in &child.table.foreign_keys {
                let parent_id = lookup
                    .get(&(
                        foreign_key.referenced_schema.as_str(),
                        foreign_key.referenced_table.as_str(),
                    ))
                    .copied()
                    .ok_or_else(|| {
                        Error::reference(
                            child.full_name(),
                            format!("referenced table not found: {}", foreign_key.referenced_table),
                        )
                    })?;
                let parent = tables[parent_id];
                let column_pairs = resolve_pairs(foreign_key, parent, *child)?;

                exported[parent_id].push((child.id, imported[child.id].len()));
                imported[child.id].push(Relationship {
                    foreign_key,
                    parent,
                    child: *child,
                    column_pairs,
                });
            }
        }

        Ok(Self {
            catalog,
            schemas,
            tables,
            lookup,
            imported,
            exported,
        })
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn schemas(&self) -> &[SchemaRef<'a>] {
        &self.schemas
    }

    /// Tables of one schema in declared order.
    pub fn schema_tables(&self, schema: &SchemaRef<'a>) -> &[TableRef<'a>] {
        &self.tables[schema.tables.clone()]
    }

    /// All tables in declared catalog order.
    pub fn tables(&self) -> &[TableRef<'a>] {
        &self.tables
    }

    pub fn table(&self, schema: &str, name: &str) -> Option<TableRef<'a>> {
        self.lookup
            .get(&(schema, name))
            .map(|&id| self.tables[id])
    }

    /// Foreign keys where `table` is the child side, in declared order.
    pub fn imported_relationships(&self, table: TableRef<'a>) -> &[Relationship<'a>] {
        &self.imported[table.id]
    }

    /// Foreign keys where `table` is the parent side.
    ///
    /// Ordered by child table position, then by the key's position in the child.
    pub fn exported_relationships(
        &self,
        table: TableRef<'a>,
    ) -> impl Iterator<Item = &Relationship<'a>> + '_ {
        self.exported[table.id]
            .iter()
            .map(move |&(child, position)| &self.imported[child][position])
    }

    /// Distinct child tables referencing `table`, first-seen order.
    pub fn referencing_tables(&self, table: TableRef<'a>) -> Vec<TableRef<'a>> {
        distinct(self.exported_relationships(table).map(|rel| rel.child))
    }

    /// Distinct parent tables referenced by `table`, first-seen order.
    pub fn referenced_tables(&self, table: TableRef<'a>) -> Vec<TableRef<'a>> {
        distinct(self.imported[table.id].iter().map(|rel| rel.parent))
    }

    pub fn foreign_key_count(&self) -> usize {
        self.imported.iter().map(Vec::len).sum()
    }
}

fn resolve_pairs<'a>(
    foreign_key: &'a ForeignKey,
    parent: TableRef<'a>,
    child: TableRef<'a>,
) -> Result<Vec<ColumnPair<'a>>> {
    foreign_key
        .column_references
        .iter()
        .map(|reference| {
            let child_column = child.table.column(&reference.column).ok_or_else(|| {
                Error::reference(
                    format!("{}.{}", child.full_name(), reference.column),
                    "foreign key column not found",
                )
            })?;
            let parent_column = parent
                .table
                .column(&reference.referenced_column)
                .ok_or_else(|| {
                    Error::reference(
                        format!("{}.{}", parent.full_name(), reference.referenced_column),
                        "referenced column not found",
                    )
                })?;
            Ok(ColumnPair {
                parent: parent_column,
                child: child_column,
            })
        })
        .collect()
}

fn distinct<'a>(tables: impl Iterator<Item = TableRef<'a>>) -> Vec<TableRef<'a>> {
    let mut seen = Vec::new();
    for table in tables {
        if !seen.contains(&table) {
            seen.push(table);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ColumnReference;
    use crate::types::{ForeignKeyRule, TableKind};

    fn column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: "int".to_string(),
            nullable: false,
            default_value: None,
            remarks: None,
        }
    }

    fn fk(name: &str, referenced_table: &str, pairs: &[(&str, &str)]) -> ForeignKey {
        ForeignKey {
            name: Some(name.to_string()),
            column_references: pairs
                .iter()
                .map(|(column, referenced)| ColumnReference {
                    column: column.to_string(),
                    referenced_column: referenced.to_string(),
                })
                .collect(),
            referenced_schema: "public".to_string(),
            referenced_table: referenced_table.to_string(),
            update_rule: ForeignKeyRule::NoAction,
            delete_rule: ForeignKeyRule::NoAction,
        }
    }

    fn table(name: &str, columns: &[&str], foreign_keys: Vec<ForeignKey>) -> Table {
        Table {
            name: name.to_string(),
            kind: TableKind::Table,
            remarks: None,
            columns: columns.iter().map(|name| column(name)).collect(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys,
        }
    }

    fn catalog(tables: Vec<Table>) -> Catalog {
        Catalog {
            schema_version: "0.1".to_string(),
            engine: "postgres".to_string(),
            database: Some("db".to_string()),
            database_version: None,
            crawl_info: None,
            schemas: vec![Schema {
                name: "public".to_string(),
                tables,
            }],
        }
    }

    #[test]
    fn resolves_self_reference() {
        let catalog = catalog(vec![table(
            "employee",
            &["id", "manager_id"],
            vec![fk("fk_manager", "employee", &[("manager_id", "id")])],
        )]);
        let view = CatalogView::new(&catalog).unwrap();
        let employee = view.table("public", "employee").unwrap();

        let exported: Vec<_> = view.exported_relationships(employee).collect();
        assert_eq!(exported.len(), 1);
        assert!(exported[0].is_self_referencing());
        assert_eq!(view.referencing_tables(employee), vec![employee]);
        assert_eq!(view.referenced_tables(employee), vec![employee]);
    }

    #[test]
    fn exported_relationships_follow_child_order() {
        let catalog = catalog(vec![
            table("users", &["id"], Vec::new()),
            table(
                "orders",
                &["id", "user_id", "approver_id"],
                vec![
                    fk("fk_orders_user", "users", &[("user_id", "id")]),
                    fk("fk_orders_approver", "users", &[("approver_id", "id")]),
                ],
            ),
            table(
                "sessions",
                &["id", "user_id"],
                vec![fk("fk_sessions_user", "users", &[("user_id", "id")])],
            ),
        ]);
        let view = CatalogView::new(&catalog).unwrap();
        let users = view.table("public", "users").unwrap();

        let names: Vec<_> = view
            .exported_relationships(users)
            .map(|rel| rel.foreign_key.name.clone().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["fk_orders_user", "fk_orders_approver", "fk_sessions_user"]
        );

        let children: Vec<_> = view
            .referencing_tables(users)
            .into_iter()
            .map(|table| table.full_name())
            .collect();
        assert_eq!(children, vec!["public.orders", "public.sessions"]);
    }

    #[test]
    fn column_pairs_keep_declared_key_order() {
        let catalog = catalog(vec![
            table("regions", &["country", "code"], Vec::new()),
            table(
                "stores",
                &["id", "region_code", "region_country"],
                vec![fk(
                    "fk_store_region",
                    "regions",
                    &[("region_country", "country"), ("region_code", "code")],
                )],
            ),
        ]);
        let view = CatalogView::new(&catalog).unwrap();
        let stores = view.table("public", "stores").unwrap();

        let rel = &view.imported_relationships(stores)[0];
        let pairs: Vec<_> = rel
            .column_pairs
            .iter()
            .map(|pair| (pair.child.name.as_str(), pair.parent.name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("region_country", "country"), ("region_code", "code")]
        );
    }

    #[test]
    fn looks_up_tables_by_qualified_name() {
        let mut catalog = catalog(vec![table("users", &["id"], Vec::new())]);
        catalog.schemas.push(Schema {
            name: "audit".to_string(),
            tables: vec![table("users", &["id", "changed_at"], Vec::new())],
        });
        let view = CatalogView::new(&catalog).unwrap();

        let public = view.table("public", "users").unwrap();
        let audit = view.table("audit", "users").unwrap();
        assert_ne!(public, audit);
        assert_eq!(audit.id(), 1);
        assert_eq!(audit.full_name(), "audit.users");
        assert!(view.table("audit", "orders").is_none());
        assert!(view.table("", "users").is_none());
    }

    #[test]
    fn rejects_dangling_reference() {
        let catalog = catalog(vec![table(
            "orders",
            &["id", "user_id"],
            vec![fk("fk_orders_user", "users", &[("user_id", "id")])],
        )]);
        let err = CatalogView::new(&catalog).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalogReference { .. }));
    }
}
