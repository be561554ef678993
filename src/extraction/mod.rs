//! Plain-text extraction from `.docx` documents.
//!
//! A `.docx` file is a ZIP container whose main part, `word/document.xml`, holds the body as a
//! sequence of `w:p` paragraph elements. Extraction reads that part, collects the text of every
//! body paragraph in document order, and concatenates the paragraphs without inserting any
//! separator between them.

mod document_xml;

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

/// Archive member holding the main document body.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Default ceiling on the decompressed size of the document part.
pub const DEFAULT_MAX_PART_BYTES: u64 = 16 * 1024 * 1024;

/// Errors raised while reading a `.docx` document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The file could not be opened or read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// The input is not a readable ZIP container.
    #[error("not a valid .docx container: {0}")]
    Archive(#[from] ZipError),
    /// The container lacks the main document part.
    #[error("document part '{0}' not found")]
    MissingPart(&'static str),
    /// The document part decompresses past the configured ceiling.
    #[error("document part exceeds {limit} bytes once decompressed")]
    TooLarge {
        /// Ceiling on the decompressed part, in bytes.
        limit: u64,
    },
    /// The document part is not well-formed XML.
    #[error("invalid document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The XML parsed but does not describe a document body.
    #[error("invalid document structure: {0}")]
    Structure(String),
}

/// Extract the concatenated text of the document stored at `path`.
///
/// `max_part_bytes` bounds the decompressed size of `word/document.xml`.
pub fn extract_text(path: &Path, max_part_bytes: u64) -> Result<String, ExtractionError> {
    Ok(extract_paragraphs(path, max_part_bytes)?.concat())
}

/// Return the text of each body paragraph of the document at `path`, in document order.
pub fn extract_paragraphs(path: &Path, max_part_bytes: u64) -> Result<Vec<String>, ExtractionError> {
    let file = File::open(path)?;
    paragraphs_from_reader(BufReader::new(file), max_part_bytes)
}

/// Extract the concatenated text of an in-memory document.
pub fn extract_text_from_bytes(
    bytes: &[u8],
    max_part_bytes: u64,
) -> Result<String, ExtractionError> {
    Ok(paragraphs_from_reader(Cursor::new(bytes), max_part_bytes)?.concat())
}

fn paragraphs_from_reader<R: Read + Seek>(
    reader: R,
    max_part_bytes: u64,
) -> Result<Vec<String>, ExtractionError> {
    let mut archive = ZipArchive::new(reader)?;
    let part = archive.by_name(DOCUMENT_PART).map_err(|error| match error {
        ZipError::FileNotFound => ExtractionError::MissingPart(DOCUMENT_PART),
        other => ExtractionError::Archive(other),
    })?;
    let claimed = part.size();
    let xml = read_part(part, claimed, max_part_bytes)?;

    let paragraphs = document_xml::body_paragraphs(&xml)?;
    tracing::debug!(paragraphs = paragraphs.len(), "Extracted document paragraphs");
    Ok(paragraphs)
}

/// Read a decompressing part stream, failing once it yields more than `limit` bytes.
///
/// The size recorded in the archive is only used to reject early; it never sizes a buffer.
fn read_part<R: Read>(part: R, claimed: u64, limit: u64) -> Result<String, ExtractionError> {
    if claimed > limit {
        tracing::debug!(claimed, limit, "Document part size exceeds limit");
        return Err(ExtractionError::TooLarge { limit });
    }
    let mut xml = Vec::new();
    part.take(limit.saturating_add(1)).read_to_end(&mut xml)?;
    if xml.len() as u64 > limit {
        tracing::debug!(limit, "Document part decompressed past limit");
        return Err(ExtractionError::TooLarge { limit });
    }
    String::from_utf8(xml)
        .map_err(|error| ExtractionError::Io(io::Error::new(io::ErrorKind::InvalidData, error)))
}
