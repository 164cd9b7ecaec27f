use log::debug;

use crate::error::{RagError, Result};

/// Default chunk length in characters, sized to keep a chunk within the
/// embedding model's input limit.
pub const DEFAULT_CHUNK_SIZE: usize = 768;

/// Default number of characters shared between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Split text into fixed-size chunks with a fixed overlap between neighbors.
///
/// The walk advances by `size - overlap` characters per step, so consecutive
/// chunks share exactly `overlap` characters and the final chunk may be
/// shorter than `size`. Offsets are character offsets mapped to byte
/// boundaries, so multi-byte text is never split inside a code point.
/// Concatenating the chunks with overlaps removed reconstructs the input.
pub fn chunk(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    if size == 0 {
        return Err(RagError::Chunking(
            "chunk size must be greater than zero".to_string(),
        ));
    }
    if overlap >= size {
        return Err(RagError::Chunking(format!(
            "chunk overlap ({}) must be smaller than chunk size ({})",
            overlap, size
        )));
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    // Byte offset of every character boundary, including the end of text
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;
    let step = size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(total_chars);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if end == total_chars {
            break;
        }
        start += step;
    }

    debug!(
        "Split {} characters into {} chunks (size {}, overlap {})",
        total_chars,
        chunks.len(),
        size,
        overlap
    );
    Ok(chunks)
}
