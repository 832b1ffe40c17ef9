use std::io::{self, Write};

use catalogram_core::{CatalogView, Column, TableRef};
use tracing::debug;

use super::{DiagramFormat, Renderer, populated_schemas};
use crate::classify::ColumnFlags;
use crate::indexes::display_indexes;
use crate::options::RenderOptions;
use crate::sanitize::{IdentifierRules, non_blank};

pub const DEFAULT_TITLE: &str = "Database Schema";

const NAME_RULES: IdentifierRules = IdentifierRules::stripping(is_markdown_safe);

/// Markdown documentation renderer.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_table<'a>(
        &self,
        view: &CatalogView<'a>,
        table: &TableRef<'a>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "### {}", NAME_RULES.sanitize(&table.name))?;
        writeln!(out)?;
        writeln!(out, "*{}*", table.kind.display_kind())?;
        if let Some(remarks) = self.options.remarks(table.remarks.as_deref()) {
            writeln!(out)?;
            for line in remarks.trim().lines() {
                writeln!(out, "{}", line.trim_end())?;
            }
        }

        if !table.columns.is_empty() {
            writeln!(out)?;
            writeln!(out, "#### Columns")?;
            writeln!(out)?;
            for (position, column) in table.columns.iter().enumerate() {
                let marker = if self.options.show_ordinal_numbers {
                    format!("{}.", position + 1)
                } else {
                    "-".to_string()
                };
                self.write_column(table, &marker, column, out)?;
            }
        }

        if let Some(pk) = &table.primary_key {
            writeln!(out)?;
            writeln!(out, "#### Primary Key")?;
            writeln!(out)?;
            write_item(
                self.options.primary_key_name(pk),
                &NAME_RULES.sanitize_list(&pk.columns),
                out,
            )?;
        }

        let indexes = display_indexes(table, &NAME_RULES);
        if !indexes.is_empty() {
            writeln!(out)?;
            writeln!(out, "#### Indexes")?;
            writeln!(out)?;
            for index in indexes {
                let columns = NAME_RULES.sanitize_list(&index.columns);
                let text = if index.unique {
                    format!("(unique) {columns}")
                } else {
                    columns
                };
                write_item(self.options.index_name(index), &text, out)?;
            }
        }

        let imported = view.imported_relationships(*table);
        if !imported.is_empty() {
            writeln!(out)?;
            writeln!(out, "#### Foreign Keys")?;
            writeln!(out)?;
            for relationship in imported {
                let pairs: Vec<String> = relationship
                    .column_pairs
                    .iter()
                    .map(|pair| {
                        format!(
                            "{} -> {}.{}",
                            NAME_RULES.sanitize(&pair.child.name),
                            NAME_RULES.sanitize(&relationship.parent.name),
                            NAME_RULES.sanitize(&pair.parent.name)
                        )
                    })
                    .collect();
                write_item(
                    self.options.foreign_key_name(relationship.foreign_key),
                    &pairs.join(", "),
                    out,
                )?;
            }
        }

        Ok(())
    }

    /// One list item per column; `marker` is `-` or the ordinal `n.`.
    fn write_column(
        &self,
        table: &TableRef<'_>,
        marker: &str,
        column: &Column,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let flags = ColumnFlags::of(table, column);
        let name = NAME_RULES.sanitize(&column.name);
        let name = match (flags.primary_key, flags.foreign_key) {
            (true, true) => format!("***{name}***"),
            (true, false) => format!("**{name}**"),
            (false, true) => format!("*{name}*"),
            (false, false) => name,
        };
        let data_type: String = column.data_type.chars().filter(|&ch| ch != '`').collect();
        write!(out, "{marker} {name} `{data_type}`")?;

        match self.options.remarks(column.remarks.as_deref()) {
            Some(remarks) => {
                let indent = " ".repeat(marker.len() + 1);
                let mut lines = remarks.trim().lines();
                writeln!(out, ": {}", lines.next().unwrap_or_default().trim_end())?;
                for line in lines {
                    writeln!(out, "{indent}{}", line.trim_end())?;
                }
                Ok(())
            }
            None => writeln!(out),
        }
    }
}

impl Renderer for MarkdownRenderer {
    fn format(&self) -> DiagramFormat {
        DiagramFormat::Markdown
    }

    fn render(&self, view: &CatalogView<'_>, out: &mut dyn Write) -> io::Result<()> {
        let title = self.options.title().unwrap_or(DEFAULT_TITLE);
        writeln!(out, "# {}", NAME_RULES.sanitize(title))?;

        for (schema, tables) in populated_schemas(view) {
            writeln!(out)?;
            writeln!(out, "## {}", NAME_RULES.sanitize(schema.name()))?;
            for table in tables {
                debug!(table = %table.full_name(), "writing section");
                self.write_table(view, table, out)?;
            }
        }

        Ok(())
    }
}

/// Anything printable except inline markup characters.
fn is_markdown_safe(ch: char) -> bool {
    !ch.is_control() && !matches!(ch, '*' | '`' | '\\' | '[' | ']' | '<' | '>' | '|' | '#')
}

fn write_item(name: Option<&str>, text: &str, out: &mut dyn Write) -> io::Result<()> {
    match non_blank(name) {
        Some(name) => writeln!(out, "- **{}**: {text}", NAME_RULES.sanitize(name)),
        None => writeln!(out, "- {text}"),
    }
}
