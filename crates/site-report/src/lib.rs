//! Site Risk Report
//!
//! Turns a score sheet into a one-page PDF:
//!
//! ```text
//! ScoreSheet ──render_html──▶ <h1>…</h1><p>name: score</p>… ──PdfEngine──▶ temp .pdf ──read──▶ bytes
//! ```
//!
//! The intermediate PDF lives in a `NamedTempFile` that is removed when it
//! goes out of scope, whichever way rendering exits.

use std::fs;
use std::io;
use thiserror::Error;
use tracing::debug;

pub mod engine;
pub mod html;

pub use engine::{PdfEngine, PrintPdfEngine};

pub const REPORT_TITLE: &str = "Site Risk Report";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("PDF engine failed: {0}")]
    Engine(String),
    #[error("PDF engine produced an empty document")]
    EmptyOutput,
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Ordered metric name to score mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSheet {
    entries: Vec<(String, i64)>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; a repeated name replaces the earlier score in place
    pub fn with(mut self, name: impl Into<String>, score: i64) -> Self {
        self.insert(name, score);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, score: i64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = score,
            None => self.entries.push((name, score)),
        }
    }

    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for ScoreSheet {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut sheet = Self::new();
        for (name, score) in iter {
            sheet.insert(name, score);
        }
        sheet
    }
}

/// Heading plus one paragraph per entry
pub fn render_html(title: &str, sheet: &ScoreSheet) -> String {
    let mut out = format!("<h1>{}</h1>", html::escape(title));
    for (name, score) in sheet.entries() {
        out.push_str(&format!("<p>{}: {}</p>", html::escape(name), score));
    }
    out
}

/// Text lines the report will show, in order
pub fn report_lines(sheet: &ScoreSheet) -> Vec<String> {
    html::parse_blocks(&render_html(REPORT_TITLE, sheet))
        .into_iter()
        .map(|block| block.text)
        .collect()
}

/// Render the sheet to PDF bytes through a scoped temporary file
pub fn make_pdf(sheet: &ScoreSheet, engine: &dyn PdfEngine) -> Result<Vec<u8>> {
    let html = render_html(REPORT_TITLE, sheet);
    let file = tempfile::Builder::new()
        .prefix("site-report-")
        .suffix(".pdf")
        .tempfile()?;

    engine.render_to_path(&html, file.path())?;
    let bytes = fs::read(file.path())?;
    if bytes.is_empty() {
        return Err(ReportError::EmptyOutput);
    }

    debug!("Rendered report with {} entries ({} bytes)", sheet.len(), bytes.len());
    Ok(bytes)
}
