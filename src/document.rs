use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use mime_guess::from_path;
use pdf_extract::extract_text;

/// Text extracted from one uploaded file. Ephemeral; lives only for the
/// duration of an ingestion call.
#[derive(Debug, Clone)]
pub struct Document {
    /// The extracted text content
    pub content: String,
    /// The file name, used as the document identifier
    pub document_id: String,
    /// The detected MIME type
    pub mime_type: String,
}

impl Document {
    /// Extract a document from a file on disk (text or PDF).
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let document_id = path
            .file_name()
            .context("Invalid file name")?
            .to_str()
            .context("Invalid file name encoding")?
            .to_string();

        let mime = from_path(path).first_or_octet_stream();
        let mime_type = mime.to_string();
        debug!("Detected MIME type {} for {}", mime_type, path.display());

        let content = extract_content(path, &mime_type)?;

        Ok(Document {
            content,
            document_id,
            mime_type,
        })
    }
}

/// Extract the text of every file in an ingestion batch, in argument order.
///
/// The returned texts are handed to the pipeline as one batch; chunking
/// concatenates them without boundary markers, so a chunk may span two
/// source documents.
pub fn extract_batch<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    let mut texts = Vec::with_capacity(paths.len());
    for path in paths {
        let document = Document::from_file(path)?;
        info!(
            "Extracted {} characters from {}",
            document.content.chars().count(),
            document.document_id
        );
        texts.push(document.content);
    }
    Ok(texts)
}

/// Extract text from a file based on its MIME type.
fn extract_content(path: &Path, mime_type: &str) -> Result<String> {
    match mime_type {
        mime if mime.starts_with("application/pdf") => {
            info!("Processing PDF document: {}", path.display());
            let content = extract_text(path)
                .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;

            // PDF extraction tends to leave excessive whitespace behind
            let cleaned = normalize_whitespace(&content);
            if cleaned.is_empty() {
                warn!(
                    "Extracted PDF content is empty or whitespace only: {}",
                    path.display()
                );
            }
            Ok(cleaned)
        }

        mime if mime.starts_with("text/") => {
            info!("Processing text document: {}", path.display());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read text file: {}", path.display()))
        }

        _ => Err(anyhow::anyhow!(
            "Unsupported document format: {}. Only text and PDF files are supported.",
            mime_type
        )),
    }
}

/// Normalize whitespace in extracted text: collapse runs of spaces, cap
/// newline runs at a paragraph break, drop carriage returns.
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\r', "");

    let mut normalized = String::with_capacity(text.len());
    let mut prev_char = ' ';
    let mut newline_count = 0;

    for c in text.chars() {
        if c == '\n' {
            newline_count += 1;
            continue;
        }
        if newline_count > 0 {
            if newline_count >= 2 {
                normalized.push_str("\n\n");
            } else {
                normalized.push('\n');
            }
            newline_count = 0;
            prev_char = '\n';
        }
        if !(c == ' ' && prev_char == ' ') {
            normalized.push(c);
        }
        prev_char = c;
    }

    if newline_count > 0 {
        if newline_count >= 2 {
            normalized.push_str("\n\n");
        } else {
            normalized.push('\n');
        }
    }

    normalized.trim().to_string()
}
