use std::path::Path;

use catalogram_core::{Catalog, SCHEMA_VERSION};
use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::CliError;

/// JSON Schema describing catalog snapshot files.
pub fn catalog_json_schema() -> Result<Value, CliError> {
    Ok(serde_json::to_value(schema_for!(Catalog))?)
}

/// Read a catalog snapshot from disk.
pub fn load_catalog(path: &Path) -> Result<Catalog, CliError> {
    let content = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&content)?;
    tracing::info!(
        path = %path.display(),
        schemas = catalog.schemas.len(),
        tables = catalog.table_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse a snapshot, checking its structure against the JSON Schema first.
pub fn parse_catalog(content: &str) -> Result<Catalog, CliError> {
    let value: Value = serde_json::from_str(content)?;
    let schema = catalog_json_schema()?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| CliError::InvalidConfig(err.to_string()))?;

    if let Err(errors) = compiled.validate(&value) {
        let issues: Vec<String> = errors
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let pointer = if pointer.is_empty() { "/".to_string() } else { pointer };
                format!("{pointer}: {error}")
            })
            .collect();
        return Err(CliError::SnapshotSchema(issues));
    }

    let catalog: Catalog = serde_json::from_value(value)?;
    if catalog.schema_version != SCHEMA_VERSION {
        tracing::warn!(
            found = %catalog.schema_version,
            expected = SCHEMA_VERSION,
            "catalog snapshot version differs"
        );
    }
    Ok(catalog)
}
