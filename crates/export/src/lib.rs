//! Printable export of recorded configurations.
//!
//! A history record renders to a one-or-more page PDF: a title block with
//! brand, question and date, followed by the answer's non-blank lines in a
//! monospace face.

pub mod pdf;

use pdf::{Font, Layout};
use switchbot_core::history::HistoryRecord;
use switchbot_history::HistoryLedger;
use thiserror::Error;
use tracing::debug;

const TITLE: &str = "Switch Command Assistant - Configuration";
const FOOTER: &str = "Generated by Switch Bot";
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("History record not found: {0}")]
    RecordNotFound(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// Suggested download name for a record's PDF.
pub fn file_name(id: &str) -> String {
    format!("switch_config_{id}.pdf")
}

/// Place every line of `record` on pages.
pub fn layout(record: &HistoryRecord) -> Layout {
    let mut layout = Layout::new();

    layout.label(Font::HelveticaBold, 16.0, 20.0, TITLE);
    layout.skip(10.0);

    layout.label(
        Font::HelveticaBold,
        12.0,
        16.0,
        &format!("Brand: {}", record.brand),
    );
    layout.label(Font::HelveticaBold, 10.0, 13.0, "Question:");
    layout.monospace(10.0, 13.0, &record.query);
    layout.label(
        Font::Helvetica,
        10.0,
        13.0,
        &format!("Date: {}", record.timestamp.format(DATE_FORMAT)),
    );
    layout.skip(10.0);

    layout.label(Font::HelveticaBold, 12.0, 16.0, "CLI commands:");
    for line in record.answer.lines().filter(|l| !l.trim().is_empty()) {
        layout.monospace(9.0, 11.0, line);
    }

    layout.skip(10.0);
    layout.label(Font::HelveticaOblique, 8.0, 10.0, FOOTER);
    layout
}

/// Render `record` as a PDF document.
pub fn render_pdf(record: &HistoryRecord) -> Result<Vec<u8>, ExportError> {
    layout(record)
        .render(TITLE)
        .map_err(|e| ExportError::Render(e.to_string()))
}

/// Look up `id` in the ledger and render it.
pub async fn export_pdf(ledger: &HistoryLedger, id: &str) -> Result<Vec<u8>, ExportError> {
    let record = ledger
        .get(id)
        .await
        .ok_or_else(|| ExportError::RecordNotFound(id.to_string()))?;
    let bytes = render_pdf(&record)?;
    debug!(id, bytes = bytes.len(), "Rendered PDF export");
    Ok(bytes)
}
