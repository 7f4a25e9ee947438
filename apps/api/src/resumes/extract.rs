//! Upload validation and plain-text extraction.

use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

/// Upload formats the service can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Txt,
    Docx,
}

impl FileKind {
    pub fn content_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Txt => "text/plain",
            FileKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Lower-cased extension after the last `.`, mapped to a readable kind.
pub fn allowed_extension(filename: &str) -> Result<FileKind, AppError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => Ok(FileKind::Pdf),
        "txt" => Ok(FileKind::Txt),
        "docx" => Ok(FileKind::Docx),
        _ => Err(AppError::UnsupportedMediaType(
            "Only PDF, DOCX and TXT files are allowed".to_string(),
        )),
    }
}

/// Reduces a client-supplied filename to a safe ASCII name.
///
/// Path separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are trimmed.
pub fn secure_filename(name: &str) -> Result<String, AppError> {
    let spaced = name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "Filename '{name}' has no usable characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts plain text from an upload.
///
/// Unreadable PDF or DOCX files yield an empty string with a warning instead
/// of an error, so the upload is still stored.
pub async fn extract_text(kind: FileKind, bytes: Bytes) -> String {
    let raw = match kind {
        FileKind::Txt => String::from_utf8_lossy(&bytes)
            .chars()
            .filter(|&c| c != char::REPLACEMENT_CHARACTER)
            .collect(),
        // pdf-extract is CPU-bound and may panic on malformed input.
        FileKind::Pdf => {
            match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("PDF text extraction failed: {e}");
                    String::new()
                }
                Err(e) => {
                    warn!("PDF text extraction aborted: {e}");
                    String::new()
                }
            }
        }
        FileKind::Docx => {
            match tokio::task::spawn_blocking(move || docx_paragraphs(&bytes)).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("DOCX text extraction failed: {e}");
                    String::new()
                }
                Err(e) => {
                    warn!("DOCX text extraction aborted: {e}");
                    String::new()
                }
            }
        }
    };
    normalize_whitespace(&raw)
}

/// Body paragraphs joined by `\n`. Tables, headers and footers are skipped.
fn docx_paragraphs(bytes: &[u8]) -> Result<String, docx_rs::ReaderError> {
    let docx = docx_rs::read_docx(bytes)?;
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}
