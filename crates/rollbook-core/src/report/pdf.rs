use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tracing::debug;

use crate::models::Student;
use crate::utils::or_placeholder;

use super::{RenderError, ReportRenderer};

// A4 portrait
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

const MARGIN_MM: f32 = 20.0;
const TITLE_FONT_SIZE: f32 = 14.0;
const BODY_FONT_SIZE: f32 = 12.0;

/// Gap between the title and the first line
const TITLE_GAP_MM: f32 = 12.0;
const LINE_HEIGHT_MM: f32 = 8.0;

const REPORT_TITLE: &str = "Student Report";

/// The body lines of a student report, in print order.
pub fn report_lines(s: &Student) -> Vec<String> {
    vec![
        format!("Name: {}", or_placeholder(&s.name)),
        format!("Email: {}", or_placeholder(&s.email)),
        format!("Class: {}", or_placeholder(&s.class_section())),
        format!("Roll No: {}", s.roll),
        format!("DOB: {}", or_placeholder(&s.dob)),
        format!("Phone: {}", or_placeholder(&s.phone)),
        format!("Father: {}", or_placeholder(&Student::parent_line(&s.father_name, &s.father_phone))),
        format!("Mother: {}", or_placeholder(&Student::parent_line(&s.mother_name, &s.mother_phone))),
        format!("Address: {}", or_placeholder(&s.current_address)),
        format!("Admission Date: {}", or_placeholder(&s.admission_date)),
    ]
}

/// Single-page A4 PDF using the built-in Helvetica faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReportRenderer;

impl PdfReportRenderer {
    pub fn new() -> Self {
        Self
    }

    fn font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, RenderError> {
        doc.add_builtin_font(font)
            .map_err(|e| RenderError::Pdf(format!("{:?}", e)))
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, student: &Student) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            format!("Student Report {}", student.id),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1".to_string(),
        );
        let bold = Self::font(&doc, BuiltinFont::HelveticaBold)?;
        let regular = Self::font(&doc, BuiltinFont::Helvetica)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        layer.use_text(REPORT_TITLE, TITLE_FONT_SIZE, Mm(MARGIN_MM), Mm(y), &bold);
        y -= TITLE_GAP_MM;

        for line in report_lines(student) {
            layer.use_text(line, BODY_FONT_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
            y -= LINE_HEIGHT_MM;
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(format!("{:?}", e)))?;
        debug!(student_id = student.id, bytes = bytes.len(), "Rendered student report");
        Ok(bytes)
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Student {
        Student {
            id: 42,
            name: "Ann".into(),
            email: "ann@school.test".into(),
            class: "7".into(),
            section: "B".into(),
            roll: 12,
            dob: "2010-04-09".into(),
            phone: " 9876543210 ".into(),
            father_name: "Bob".into(),
            father_phone: "5550000001".into(),
            current_address: "1 Main St".into(),
            admission_date: "2020-01-05".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_lines() {
        let lines = report_lines(&ann());
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Name: Ann");
        assert_eq!(lines[2], "Class: 7-B");
        assert_eq!(lines[3], "Roll No: 12");
        assert_eq!(lines[4], "DOB: 2010-04-09");
        assert_eq!(lines[5], "Phone: 9876543210");
        assert_eq!(lines[6], "Father: Bob (5550000001)");
        assert_eq!(lines[7], "Mother: -");
        assert_eq!(lines[9], "Admission Date: 2020-01-05");
    }

    #[test]
    fn test_render_produces_pdf() {
        let renderer = PdfReportRenderer::new();
        let bytes = renderer.render(&ann()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(renderer.content_type(), "application/pdf");
    }

    #[test]
    fn test_render_empty_record() {
        let bytes = PdfReportRenderer::new()
            .render(&Student { id: 1, ..Default::default() })
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
