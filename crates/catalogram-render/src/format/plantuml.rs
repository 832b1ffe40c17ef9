use std::io::{self, Write};

use catalogram_core::{CatalogView, Relationship, TableRef};
use tracing::debug;

use super::{DiagramFormat, Renderer, populated_schemas};
use crate::classify::ColumnFlags;
use crate::options::RenderOptions;
use crate::sanitize::{IdentifierRules, is_word_char, single_line};

/// Style macros for schema, table, view and key-column glyphs.
pub const PREAMBLE: &str = r#"@startuml
hide empty methods

!define schema(name, slug) package "name" as slug <<Rectangle>>
!define table(name, slug) entity "<b>name</b>" as slug << (T, Orange) table >>
!define view(name, slug) entity "<b>name</b>" as slug << (V, Aquamarine) view >>
!define pk(name) <color:#GoldenRod><&key></color> <b>name</b>
!define fk(name) <color:#Silver><&key></color> name
!define column(name) {field} <color:#White><&media-record></color> name
"#;

/// Entity aliases and column members, the targets of notes and relationships.
const ALIAS_RULES: IdentifierRules = IdentifierRules::stripping(is_word_char);
/// Display names passed as macro arguments.
const LABEL_RULES: IdentifierRules = IdentifierRules::stripping(is_macro_safe);

/// PlantUML class diagram renderer.
#[derive(Debug, Clone)]
pub struct PlantUmlRenderer {
    options: RenderOptions,
}

impl PlantUmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_notes(&self, table: &TableRef<'_>, out: &mut dyn Write) -> io::Result<()> {
        let alias = entity_alias(table);
        if let Some(remarks) = self.options.remarks(table.remarks.as_deref()) {
            writeln!(out)?;
            writeln!(out, "note top of {alias}")?;
            write_note_body(remarks, out)?;
        }
        for column in &table.columns {
            if let Some(remarks) = self.options.remarks(column.remarks.as_deref()) {
                writeln!(out)?;
                writeln!(out, "note right of {alias}::{}", member(&column.name))?;
                write_note_body(remarks, out)?;
            }
        }
        Ok(())
    }

    fn write_relationship(
        &self,
        relationship: &Relationship<'_>,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let fk = relationship.foreign_key;
        let parent = entity_alias(&relationship.parent);
        let child = entity_alias(&relationship.child);
        let label = match self.options.foreign_key_name(fk) {
            Some(name) => format!("{} ", LABEL_RULES.sanitize(name)),
            None => String::new(),
        };
        for pair in &relationship.column_pairs {
            writeln!(
                out,
                "{parent}::{} ||--o{{ {child}::{} : {label}(update: {}, delete: {})",
                member(&pair.parent.name),
                member(&pair.child.name),
                fk.update_rule,
                fk.delete_rule
            )?;
        }
        Ok(())
    }
}

impl Renderer for PlantUmlRenderer {
    fn format(&self) -> DiagramFormat {
        DiagramFormat::PlantUml
    }

    fn render(&self, view: &CatalogView<'_>, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(PREAMBLE.as_bytes())?;
        if let Some(title) = self.options.title() {
            writeln!(out)?;
            writeln!(out, "title {}", single_line(title))?;
        }

        for (schema, tables) in populated_schemas(view) {
            writeln!(out)?;
            writeln!(
                out,
                "schema(\"{}\", \"{}\") {{",
                LABEL_RULES.sanitize(schema.name()),
                ALIAS_RULES.sanitize(schema.name())
            )?;
            for table in tables {
                debug!(table = %table.full_name(), "writing entity");
                write_entity(table, out)?;
            }
            writeln!(out)?;
            writeln!(out, "}}")?;

            for table in tables {
                self.write_notes(table, out)?;
            }
        }

        let mut wrote_relationship = false;
        for table in view.tables() {
            for relationship in view.imported_relationships(*table) {
                if !wrote_relationship {
                    writeln!(out)?;
                    wrote_relationship = true;
                }
                self.write_relationship(relationship, out)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "@enduml")
    }
}

/// Printable characters that cannot break a macro argument list.
fn is_macro_safe(ch: char) -> bool {
    !ch.is_control() && !matches!(ch, '(' | ')' | ',' | '"')
}

fn entity_alias(table: &TableRef<'_>) -> String {
    ALIAS_RULES.sanitize(&table.full_name())
}

/// Column name as a class member; fields and `::` references must agree.
fn member(column_name: &str) -> String {
    ALIAS_RULES.sanitize(column_name)
}

fn write_entity(table: &TableRef<'_>, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {}(\"{}\", \"{}\") {{",
        table.kind.display_kind(),
        LABEL_RULES.sanitize(&table.name),
        entity_alias(table)
    )?;
    for column in &table.columns {
        let flags = ColumnFlags::of(table, column);
        let glyph = if flags.primary_key {
            "pk"
        } else if flags.foreign_key {
            "fk"
        } else {
            "column"
        };
        let not_null = if column.nullable { "" } else { " NOT NULL" };
        writeln!(
            out,
            "    {glyph}({}): {}{not_null}",
            member(&column.name),
            single_line(&column.data_type)
        )?;
    }
    writeln!(out, "  }}")
}

fn write_note_body(remarks: &str, out: &mut dyn Write) -> io::Result<()> {
    for line in remarks.trim().lines() {
        // a bare "end note" line would close the block early
        let line = line.trim_end();
        if line.trim().eq_ignore_ascii_case("end note") {
            writeln!(out, "  ~{}", line.trim())?;
        } else {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out, "end note")
}
