use std::io::{self, Write};

use catalogram_core::{CatalogView, Column, ForeignKeyRule, Relationship, TableRef};
use tracing::debug;

use super::{DiagramFormat, Renderer, populated_schemas};
use crate::indexes::display_indexes;
use crate::options::RenderOptions;
use crate::sanitize::{IdentifierRules, is_word_char, non_blank, remove_chars, single_line};

/// Table, group and project names always carry dots or spaces, so DBML quotes them.
const NAME_RULES: IdentifierRules = IdentifierRules::quoting('"');
const TYPE_RULES: IdentifierRules = IdentifierRules::quoting('"');

/// DBML (database markup language) renderer.
#[derive(Debug, Clone)]
pub struct DbmlRenderer {
    options: RenderOptions,
    column_rules: IdentifierRules,
}

impl DbmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            column_rules: IdentifierRules::for_rule(options.quoting, is_word_char, '"'),
            options,
        }
    }

    fn write_project(&self, view: &CatalogView<'_>, out: &mut dyn Write) -> io::Result<()> {
        let catalog = view.catalog();
        let title = self
            .options
            .title()
            .or(non_blank(catalog.database.as_deref()))
            .unwrap_or("catalog");
        let database_type = non_blank(catalog.database_version.as_deref()).unwrap_or(&catalog.engine);

        writeln!(out, "Project {} {{", NAME_RULES.sanitize(&single_line(title)))?;
        writeln!(out, "  database_type: '{}'", quote_text(database_type))?;
        if let Some(note) = non_blank(catalog.crawl_info.as_deref()) {
            writeln!(out, "  Note: '''")?;
            for line in note.lines() {
                writeln!(out, "  {}", remove_chars(line.trim_end(), &['\'']))?;
            }
            writeln!(out, "  '''")?;
        }
        writeln!(out, "}}")
    }

    fn write_table(&self, table: &TableRef<'_>, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Table {} {{", NAME_RULES.sanitize(&table.full_name()))?;
        for column in &table.columns {
            writeln!(
                out,
                "  {} {} [{}]",
                self.column_rules.sanitize(&column.name),
                TYPE_RULES.sanitize(&column.data_type),
                self.column_settings(column).join(", ")
            )?;
        }

        let indexes = display_indexes(table, &self.column_rules);
        if table.primary_key.is_some() || !indexes.is_empty() {
            writeln!(out, "  indexes {{")?;
            if let Some(pk) = &table.primary_key {
                writeln!(out, "    ({}) [pk]", self.column_rules.sanitize_list(&pk.columns))?;
            }
            for index in indexes {
                let mut settings = Vec::with_capacity(2);
                if let Some(name) = self.options.index_name(index) {
                    settings.push(format!("name: '{}'", quote_text(name)));
                }
                if index.unique {
                    settings.push("unique".to_string());
                }
                write!(
                    out,
                    "    ({})",
                    self.column_rules.sanitize_list(&index.columns)
                )?;
                if !settings.is_empty() {
                    write!(out, " [{}]", settings.join(", "))?;
                }
                writeln!(out)?;
            }
            writeln!(out, "  }}")?;
        }

        if let Some(remarks) = self.options.remarks(table.remarks.as_deref()) {
            writeln!(out, "  Note: '{}'", quote_text(remarks))?;
        }
        writeln!(out, "}}")
    }

    fn column_settings(&self, column: &Column) -> Vec<String> {
        let mut settings = Vec::with_capacity(3);
        settings.push(if column.nullable { "null" } else { "not null" }.to_string());
        if let Some(default) = non_blank(column.default_value.as_deref()) {
            settings.push(format!(
                "default: `{}`",
                remove_chars(&single_line(default), &['`'])
            ));
        }
        if let Some(remarks) = self.options.remarks(column.remarks.as_deref()) {
            settings.push(format!("note: '{}'", quote_text(remarks)));
        }
        settings
    }

    fn write_ref(&self, relationship: &Relationship<'_>, out: &mut dyn Write) -> io::Result<()> {
        let fk = relationship.foreign_key;
        writeln!(out)?;
        match self.options.foreign_key_name(fk) {
            Some(name) => writeln!(out, "Ref {} {{", NAME_RULES.sanitize(name))?,
            None => writeln!(out, "Ref {{")?,
        }

        let parent_columns: Vec<&str> = relationship
            .column_pairs
            .iter()
            .map(|pair| pair.parent.name.as_str())
            .collect();
        let child_columns: Vec<&str> = relationship
            .column_pairs
            .iter()
            .map(|pair| pair.child.name.as_str())
            .collect();
        write!(
            out,
            "  {}.({}) < {}.({})",
            NAME_RULES.sanitize(&relationship.parent.full_name()),
            self.column_rules.sanitize_list(&parent_columns),
            NAME_RULES.sanitize(&relationship.child.full_name()),
            self.column_rules.sanitize_list(&child_columns)
        )?;

        let actions: Vec<String> = [("update", fk.update_rule), ("delete", fk.delete_rule)]
            .into_iter()
            .filter(|(_, rule)| rule.is_known())
            .map(|(event, rule): (&str, ForeignKeyRule)| format!("{event}: {rule}"))
            .collect();
        if !actions.is_empty() {
            write!(out, " [{}]", actions.join(", "))?;
        }
        writeln!(out)?;
        writeln!(out, "}}")
    }
}

impl Renderer for DbmlRenderer {
    fn format(&self) -> DiagramFormat {
        DiagramFormat::Dbml
    }

    fn render(&self, view: &CatalogView<'_>, out: &mut dyn Write) -> io::Result<()> {
        self.write_project(view, out)?;

        for table in view.tables() {
            debug!(table = %table.full_name(), "writing table");
            self.write_table(table, out)?;
        }

        for table in view.tables() {
            for relationship in view.imported_relationships(*table) {
                self.write_ref(relationship, out)?;
            }
        }

        for (schema, tables) in populated_schemas(view) {
            writeln!(out)?;
            writeln!(out, "TableGroup {} {{", NAME_RULES.sanitize(schema.name()))?;
            for table in tables {
                writeln!(out, "  {}", NAME_RULES.sanitize(&table.full_name()))?;
            }
            writeln!(out, "}}")?;
        }

        Ok(())
    }
}


/// Single-quoted DBML string content: one line, quotes removed.
fn quote_text(text: &str) -> String {
    remove_chars(&single_line(text), &['\''])
}
