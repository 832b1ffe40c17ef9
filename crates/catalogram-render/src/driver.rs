use std::io::{self, Write};
use std::time::Instant;

use catalogram_core::{Catalog, CatalogView};
use tracing::{info, warn};

use crate::error::{RenderError, RenderResult};
use crate::format::DiagramFormat;
use crate::options::RenderOptions;
use crate::sanitize::QuotingRule;

/// Outcome of a completed render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub format: DiagramFormat,
    pub tables: usize,
    pub bytes_written: u64,
}

/// Stream one document for `view` in `format` into `out`.
///
/// Options are checked before anything is written. A failed write aborts the
/// pass; bytes already written stay written.
pub fn render<W: Write>(
    format: DiagramFormat,
    view: &CatalogView<'_>,
    options: &RenderOptions,
    out: W,
) -> RenderResult<RenderSummary> {
    if !format.supports(options.quoting) {
        return Err(RenderError::UnsupportedFormatOption(format!(
            "{format} does not support quoting rule '{}'",
            options.quoting
        )));
    }

    let start = Instant::now();
    let tables = view.tables().len();
    let renderer = format.renderer(options);
    info!(
        format = %renderer.format(),
        quoting = %options.quoting,
        tables,
        foreign_keys = view.foreign_key_count(),
        "render started"
    );

    let mut out = CountingWriter::new(out);
    let outcome = renderer.render(view, &mut out).and_then(|()| out.flush());
    if let Err(err) = outcome {
        warn!(format = %format, bytes = out.bytes_written(), error = %err, "render aborted");
        return Err(RenderError::Output(err));
    }

    info!(
        format = %format,
        bytes = out.bytes_written(),
        duration_ms = start.elapsed().as_millis() as u64,
        "render finished"
    );

    Ok(RenderSummary {
        format,
        tables,
        bytes_written: out.bytes_written(),
    })
}

/// Validate `catalog` and render it to an in-memory string.
pub fn render_to_string(
    format: DiagramFormat,
    catalog: &Catalog,
    options: &RenderOptions,
) -> RenderResult<String> {
    let view = CatalogView::new(catalog).inspect_err(|err| {
        warn!(error = %err, "catalog rejected");
    })?;
    let mut buffer = Vec::new();
    render(format, &view, options, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| RenderError::Output(io::Error::new(io::ErrorKind::InvalidData, err)))
}

pub fn render_mermaid(
    catalog: &Catalog,
    title: Option<&str>,
    quoting: QuotingRule,
) -> RenderResult<String> {
    render_to_string(
        DiagramFormat::Mermaid,
        catalog,
        &RenderOptions::new(title, quoting),
    )
}

pub fn render_dbml(
    catalog: &Catalog,
    title: Option<&str>,
    quoting: QuotingRule,
) -> RenderResult<String> {
    render_to_string(DiagramFormat::Dbml, catalog, &RenderOptions::new(title, quoting))
}

pub fn render_markdown(
    catalog: &Catalog,
    title: Option<&str>,
    quoting: QuotingRule,
) -> RenderResult<String> {
    render_to_string(
        DiagramFormat::Markdown,
        catalog,
        &RenderOptions::new(title, quoting),
    )
}

pub fn render_plantuml(
    catalog: &Catalog,
    title: Option<&str>,
    quoting: QuotingRule,
) -> RenderResult<String> {
    render_to_string(
        DiagramFormat::PlantUml,
        catalog,
        &RenderOptions::new(title, quoting),
    )
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
