//! One renderer per target notation.

pub mod dbml;
pub mod markdown;
pub mod mermaid;
pub mod plantuml;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use catalogram_core::{CatalogView, SchemaRef, TableRef};

use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::sanitize::QuotingRule;

pub use dbml::DbmlRenderer;
pub use markdown::MarkdownRenderer;
pub use mermaid::MermaidRenderer;
pub use plantuml::PlantUmlRenderer;

/// A notation that can render a whole catalog as one text document.
pub trait Renderer {
    fn format(&self) -> DiagramFormat;

    /// Stream the document for `view` into `out`.
    fn render(&self, view: &CatalogView<'_>, out: &mut dyn Write) -> io::Result<()>;
}

/// Supported output notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramFormat {
    /// Mermaid entity-relationship diagram.
    Mermaid,
    /// DBML database markup.
    Dbml,
    /// Markdown documentation.
    Markdown,
    /// PlantUML class diagram.
    PlantUml,
}

impl DiagramFormat {
    pub const ALL: [DiagramFormat; 4] = [
        DiagramFormat::Mermaid,
        DiagramFormat::Dbml,
        DiagramFormat::Markdown,
        DiagramFormat::PlantUml,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagramFormat::Mermaid => "mermaid",
            DiagramFormat::Dbml => "dbml",
            DiagramFormat::Markdown => "markdown",
            DiagramFormat::PlantUml => "plantuml",
        }
    }

    /// Quoting rules the notation's grammar can express.
    pub fn supported_quoting(self) -> &'static [QuotingRule] {
        match self {
            DiagramFormat::Mermaid | DiagramFormat::Dbml => &QuotingRule::ALL,
            DiagramFormat::Markdown | DiagramFormat::PlantUml => &[QuotingRule::None],
        }
    }

    pub fn supports(self, quoting: QuotingRule) -> bool {
        self.supported_quoting().contains(&quoting)
    }

    pub fn renderer(self, options: &RenderOptions) -> Box<dyn Renderer> {
        let options = options.clone();
        match self {
            DiagramFormat::Mermaid => Box::new(MermaidRenderer::new(options)),
            DiagramFormat::Dbml => Box::new(DbmlRenderer::new(options)),
            DiagramFormat::Markdown => Box::new(MarkdownRenderer::new(options)),
            DiagramFormat::PlantUml => Box::new(PlantUmlRenderer::new(options)),
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DiagramFormat {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mermaid" | "erd" => Ok(DiagramFormat::Mermaid),
            "dbml" => Ok(DiagramFormat::Dbml),
            "markdown" | "md" => Ok(DiagramFormat::Markdown),
            "plantuml" | "puml" => Ok(DiagramFormat::PlantUml),
            other => Err(RenderError::UnsupportedFormatOption(format!(
                "unknown format '{other}'"
            ))),
        }
    }
}

/// Schemas that own at least one table, with their tables, in declared order.
pub(crate) fn populated_schemas<'v, 'a>(
    view: &'v CatalogView<'a>,
) -> impl Iterator<Item = (&'v SchemaRef<'a>, &'v [TableRef<'a>])> + 'v {
    view.schemas()
        .iter()
        .map(move |schema| (schema, view.schema_tables(schema)))
        .filter(|(_, tables)| !tables.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!("Mermaid".parse::<DiagramFormat>().unwrap(), DiagramFormat::Mermaid);
        assert_eq!("puml".parse::<DiagramFormat>().unwrap(), DiagramFormat::PlantUml);
        assert!(matches!(
            "graphviz".parse::<DiagramFormat>(),
            Err(RenderError::UnsupportedFormatOption(message)) if message.contains("graphviz")
        ));
    }

    #[test]
    fn quoting_support_matrix() {
        assert!(DiagramFormat::Dbml.supports(QuotingRule::QuoteAll));
        assert!(DiagramFormat::Mermaid.supports(QuotingRule::QuoteAll));
        assert!(!DiagramFormat::Markdown.supports(QuotingRule::QuoteAll));
        assert!(DiagramFormat::PlantUml.supports(QuotingRule::None));
    }
}
