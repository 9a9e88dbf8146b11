//! HTML-to-PDF engines

use crate::html::{parse_blocks, BlockKind};
use crate::{ReportError, Result, REPORT_TITLE};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// A4 portrait
pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 20.0;

const HEADING_PT: u8 = 20;
const BODY_PT: u8 = 12;
const HEADING_LEADING_MM: f64 = 12.0;
const BODY_LEADING_MM: f64 = 7.0;

/// Renders an HTML fragment into a PDF file at `path`
pub trait PdfEngine: Send + Sync {
    fn render_to_path(&self, html: &str, path: &Path) -> Result<()>;
}

/// Single-page layout of `<h1>`/`<p>` blocks with builtin Helvetica
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintPdfEngine;

fn engine_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Engine(err.to_string())
}

impl PdfEngine for PrintPdfEngine {
    fn render_to_path(&self, html: &str, path: &Path) -> Result<()> {
        let blocks = parse_blocks(html);
        let title = blocks
            .iter()
            .find(|b| b.kind == BlockKind::Heading)
            .map(|b| b.text.as_str())
            .unwrap_or(REPORT_TITLE);

        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(engine_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(engine_error)?;
        let canvas = doc.get_page(page).get_layer(layer);

        let mut cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        for block in &blocks {
            let (font, size, leading) = match block.kind {
                BlockKind::Heading => (&bold, HEADING_PT, HEADING_LEADING_MM),
                BlockKind::Paragraph => (&regular, BODY_PT, BODY_LEADING_MM),
            };
            cursor_mm -= leading;
            if cursor_mm < MARGIN_MM {
                warn!("Report overflows one page, dropping remaining blocks");
                break;
            }
            canvas.use_text(block.text.clone(), size.into(), Mm(MARGIN_MM), Mm(cursor_mm), font);
        }

        let mut writer = BufWriter::new(File::create(path)?);
        doc.save(&mut writer).map_err(engine_error)?;
        writer.flush()?;

        debug!("Rendered {} blocks to {}", blocks.len(), path.display());
        Ok(())
    }
}
