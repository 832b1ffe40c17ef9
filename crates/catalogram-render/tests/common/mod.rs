#![allow(dead_code)]

use catalogram_core::{
    Catalog, Column, ColumnReference, ForeignKey, ForeignKeyRule, Index, PrimaryKey, Schema,
    Table, TableKind,
};

pub fn column(name: &str, data_type: &str, nullable: bool) -> Column {
    Column {
        name: name.to_string(),
        data_type: data_type.to_string(),
        nullable,
        default_value: None,
        remarks: None,
    }
}

pub fn table(name: &str, columns: Vec<Column>) -> Table {
    Table {
        name: name.to_string(),
        kind: TableKind::Table,
        remarks: None,
        columns,
        primary_key: None,
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
    }
}

pub fn primary_key(name: Option<&str>, columns: &[&str]) -> Option<PrimaryKey> {
    Some(PrimaryKey {
        name: name.map(str::to_string),
        columns: columns.iter().map(|column| column.to_string()).collect(),
    })
}

pub fn index(name: &str, columns: &[&str], unique: bool) -> Index {
    Index {
        name: name.to_string(),
        columns: columns.iter().map(|column| column.to_string()).collect(),
        unique,
    }
}

pub fn foreign_key(
    name: &str,
    referenced: (&str, &str),
    pairs: &[(&str, &str)],
    update_rule: ForeignKeyRule,
    delete_rule: ForeignKeyRule,
) -> ForeignKey {
    ForeignKey {
        name: Some(name.to_string()),
        column_references: pairs
            .iter()
            .map(|(column, referenced_column)| ColumnReference {
                column: column.to_string(),
                referenced_column: referenced_column.to_string(),
            })
            .collect(),
        referenced_schema: referenced.0.to_string(),
        referenced_table: referenced.1.to_string(),
        update_rule,
        delete_rule,
    }
}

pub fn catalog(schemas: Vec<Schema>) -> Catalog {
    Catalog {
        schema_version: "0.1".to_string(),
        engine: "hsqldb".to_string(),
        database: Some("shop".to_string()),
        database_version: Some("HSQL Database Engine 2.7.2".to_string()),
        crawl_info: Some("Crawled by catalogram\nfor test purposes".to_string()),
        schemas,
    }
}

pub fn schema(name: &str, tables: Vec<Table>) -> Schema {
    Schema {
        name: name.to_string(),
        tables,
    }
}

/// Four tables in one schema: two foreign keys between the same pair of
/// tables, a self-referencing key, a redundant primary-key index and a view.
pub fn shop_catalog() -> Catalog {
    let mut users = table(
        "USERS",
        vec![
            column("ID", "INTEGER", false),
            column("NAME", "VARCHAR(100)", true),
            Column {
                remarks: Some("Login e-mail\nmust be unique".to_string()),
                ..column("EMAIL", "VARCHAR(255)", false)
            },
        ],
    );
    users.remarks = Some("Registered users".to_string());
    users.primary_key = primary_key(Some("PK_USERS"), &["ID"]);
    users.indexes = vec![
        index("PK_USERS_IDX", &["ID"], true),
        index("UQ_USERS_EMAIL", &["EMAIL"], true),
    ];

    let mut orders = table(
        "ORDERS",
        vec![
            column("ID", "INTEGER", false),
            column("USER_ID", "INTEGER", false),
            column("APPROVER_ID", "INTEGER", true),
            Column {
                default_value: Some("CURRENT_TIMESTAMP".to_string()),
                ..column("CREATED_AT", "TIMESTAMP", false)
            },
            column("STATUS", "VARCHAR(20)", true),
        ],
    );
    orders.primary_key = primary_key(None, &["ID"]);
    orders.indexes = vec![index("IDX_ORDERS_USER", &["USER_ID"], false)];
    orders.foreign_keys = vec![
        foreign_key(
            "FK_ORDERS_USERS",
            ("APP", "USERS"),
            &[("USER_ID", "ID")],
            ForeignKeyRule::NoAction,
            ForeignKeyRule::Cascade,
        ),
        foreign_key(
            "FK_ORDERS_APPROVER",
            ("APP", "USERS"),
            &[("APPROVER_ID", "ID")],
            ForeignKeyRule::NoAction,
            ForeignKeyRule::NoAction,
        ),
    ];

    let mut employee = table(
        "EMPLOYEE",
        vec![
            column("ID", "INTEGER", false),
            column("MANAGER_ID", "INTEGER", true),
        ],
    );
    employee.primary_key = primary_key(Some("PK_EMPLOYEE"), &["ID"]);
    employee.foreign_keys = vec![foreign_key(
        "FK_EMPLOYEE_MANAGER",
        ("APP", "EMPLOYEE"),
        &[("MANAGER_ID", "ID")],
        ForeignKeyRule::Unknown,
        ForeignKeyRule::SetNull,
    )];

    let mut summary = table(
        "ORDER_SUMMARY",
        vec![
            column("USER_ID", "INTEGER", true),
            column("TOTAL", "DECIMAL(10,2)", true),
        ],
    );
    summary.kind = TableKind::View;

    catalog(vec![schema("APP", vec![users, orders, employee, summary])])
}

/// Stores keyed to regions by a two-column foreign key whose child columns
/// are declared in a different order than the key.
pub fn regions_catalog() -> Catalog {
    let mut regions = table(
        "REGIONS",
        vec![
            column("COUNTRY", "VARCHAR(2)", false),
            column("CODE", "VARCHAR(8)", false),
        ],
    );
    regions.primary_key = primary_key(Some("PK_REGIONS"), &["COUNTRY", "CODE"]);

    let mut stores = table(
        "STORES",
        vec![
            column("ID", "INTEGER", false),
            column("REGION_CODE", "VARCHAR(8)", true),
            column("REGION_COUNTRY", "VARCHAR(2)", true),
        ],
    );
    stores.primary_key = primary_key(None, &["ID"]);
    stores.foreign_keys = vec![foreign_key(
        "FK_STORES_REGION",
        ("GEO", "REGIONS"),
        &[("REGION_COUNTRY", "COUNTRY"), ("REGION_CODE", "CODE")],
        ForeignKeyRule::Cascade,
        ForeignKeyRule::Restrict,
    )];

    let mut catalog = catalog(vec![schema("GEO", vec![regions, stores])]);
    catalog.database = Some("geo".to_string());
    catalog.crawl_info = None;
    catalog
}
