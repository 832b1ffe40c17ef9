use std::io::{self, Write};

use catalogram_core::{CatalogView, TableRef};
use tracing::debug;

use super::{DiagramFormat, Renderer};
use crate::classify::classify;
use crate::options::RenderOptions;
use crate::sanitize::{
    IdentifierRules, base_type_name, is_word_char, remove_chars, single_line,
};

/// Attribute types and names must not start with a digit.
const ATTRIBUTE_RULES: IdentifierRules = IdentifierRules::stripping(is_word_char).letter_start();

/// Mermaid `erDiagram` renderer.
#[derive(Debug, Clone)]
pub struct MermaidRenderer {
    options: RenderOptions,
    entity_rules: IdentifierRules,
}

impl MermaidRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            entity_rules: IdentifierRules::for_rule(options.quoting, is_word_char, '"'),
            options,
        }
    }

    fn entity(&self, table: &TableRef<'_>) -> String {
        self.entity_rules.sanitize(&table.full_name())
    }

    fn write_entity(&self, table: &TableRef<'_>, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "  {} {{", self.entity(table))?;
        for column in &table.columns {
            write!(
                out,
                "    {} {}",
                ATTRIBUTE_RULES.sanitize(&base_type_name(&column.data_type)),
                ATTRIBUTE_RULES.sanitize(&column.name)
            )?;
            if let Some(marker) = classify(table, column).marker() {
                write!(out, " {marker}")?;
            }
            if let Some(remarks) = self.options.remarks(column.remarks.as_deref()) {
                write!(out, " \"{}\"", remove_chars(&single_line(remarks), &['"']))?;
            }
            writeln!(out)?;
        }
        writeln!(out, "  }}")
    }
}

impl Renderer for MermaidRenderer {
    fn format(&self) -> DiagramFormat {
        DiagramFormat::Mermaid
    }

    fn render(&self, view: &CatalogView<'_>, out: &mut dyn Write) -> io::Result<()> {
        if let Some(title) = self.options.title() {
            writeln!(out, "---")?;
            writeln!(out, "title: {}", yaml_string(title))?;
            writeln!(out, "---")?;
        }
        writeln!(out, "erDiagram")?;

        for table in view.tables() {
            debug!(table = %table.full_name(), "writing entity");
            self.write_entity(table, out)?;
        }

        let mut wrote_edge = false;
        for parent in view.tables() {
            // one edge per (parent, child) pair, however many keys connect them
            for child in view.referencing_tables(*parent) {
                if !wrote_edge {
                    writeln!(out)?;
                    wrote_edge = true;
                }
                writeln!(
                    out,
                    "  {} ||--o{{ {} : \"foreign key\"",
                    self.entity(parent),
                    self.entity(&child)
                )?;
            }
        }

        Ok(())
    }
}

/// Double-quoted YAML scalar holding `text` on one line.
fn yaml_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in single_line(text).chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            ch if ch.is_control() => quoted.push(' '),
            ch => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_title_is_quoted() {
        assert_eq!(yaml_string("Shop: v2 # prod"), r#""Shop: v2 # prod""#);
        assert_eq!(yaml_string("say \"hi\" \\o/"), r#""say \"hi\" \\o/""#);
        assert_eq!(yaml_string("two\nlines"), r#""two lines""#);
    }
}
