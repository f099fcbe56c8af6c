//! Student report rendering.
//!
//! `ReportRenderer` is the seam the HTTP layer depends on; `PdfReportRenderer`
//! is the production implementation.

pub mod pdf;

use thiserror::Error;

use crate::models::Student;

pub use pdf::{report_lines, PdfReportRenderer};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Turns a student record into a binary report document.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, student: &Student) -> Result<Vec<u8>, RenderError>;

    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str;

    /// File extension used in the download filename
    fn extension(&self) -> &'static str;
}
