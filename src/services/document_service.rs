use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Only PDF and DOCX files are supported")]
    UnsupportedFormat,

    #[error("File size too large. Maximum 10MB allowed")]
    TooLarge,

    #[error("Uploaded file is empty")]
    EmptyUpload,

    #[error("Could not extract text from the uploaded file")]
    Empty,

    #[error("Failed to read document: {0}")]
    Corrupt(String),
}

impl DocumentFormat {
    /// Content type wins when it names a supported format; otherwise the file
    /// extension decides.
    pub fn detect(content_type: Option<&str>, filename: &str) -> Result<Self, ExtractionError> {
        match content_type.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some(PDF_CONTENT_TYPE) => return Ok(DocumentFormat::Pdf),
            Some(DOCX_CONTENT_TYPE) => return Ok(DocumentFormat::Docx),
            _ => {}
        }

        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("docx") => Ok(DocumentFormat::Docx),
            _ => Err(ExtractionError::UnsupportedFormat),
        }
    }
}

fn check_size(data: &[u8]) -> Result<(), ExtractionError> {
    if data.is_empty() {
        return Err(ExtractionError::EmptyUpload);
    }
    if data.len() > MAX_DOCUMENT_BYTES {
        return Err(ExtractionError::TooLarge);
    }
    Ok(())
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    if !data.starts_with(b"%PDF") {
        return Err(ExtractionError::Corrupt("Invalid PDF file content".into()));
    }
    pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractionError::Corrupt(e.to_string()))
}

/// Reads the paragraph text of a DOCX body part, one line per `w:p`.
pub fn docx_xml_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => {
                let chunk = t
                    .unescape()
                    .map_err(|e| ExtractionError::Corrupt(e.to_string()))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Corrupt(e.to_string())),
            _ => {}
        }
    }

    Ok(text)
}

fn extract_docx(data: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractionError::Corrupt(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractionError::Corrupt(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Corrupt(e.to_string()))?;
    docx_xml_to_text(&xml)
}

/// Synchronous extraction. Prefer [`extract_text`] from async code.
pub fn extract_text_blocking(data: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    check_size(data)?;
    let text = match format {
        DocumentFormat::Pdf => extract_pdf(data)?,
        DocumentFormat::Docx => extract_docx(data)?,
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(text)
}

#[tracing::instrument(skip(data), fields(bytes = data.len()))]
pub async fn extract_text(data: Vec<u8>, format: DocumentFormat) -> Result<String, ExtractionError> {
    check_size(&data)?;
    tokio::task::spawn_blocking(move || extract_text_blocking(&data, format))
        .await
        .map_err(|e| ExtractionError::Corrupt(format!("extraction task failed: {}", e)))?
}
