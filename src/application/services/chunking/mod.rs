//! Sliding-window chunking for the RAG index.

use crate::application::services::indexing::IndexingError;

pub const DEFAULT_CHUNK_SIZE: usize = 1200;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits `text` into windows of at most `size` characters, each window
/// after the first starting `overlap` characters before the end of the
/// previous one. Boundaries are deterministic so re-indexing reproduces
/// identical chunk documents.
///
/// `overlap >= size` (or a zero size) would never advance and is rejected
/// as a configuration error. Empty text yields no windows.
pub fn chunk_windows(
    text: &str,
    size: usize,
    overlap: usize,
) -> Result<ChunkWindows, IndexingError> {
    if size == 0 || overlap >= size {
        return Err(IndexingError::Config { size, overlap });
    }
    Ok(ChunkWindows {
        chars: text.chars().collect(),
        size,
        step: size - overlap,
        pos: 0,
    })
}

/// Lazy iterator over chunk windows. Windows are measured in characters,
/// not bytes, so multi-byte content chunks the same as the editor counts it.
pub struct ChunkWindows {
    chars: Vec<char>,
    size: usize,
    step: usize,
    pos: usize,
}

impl Iterator for ChunkWindows {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.pos >= self.chars.len() {
            return None;
        }
        let end = (self.pos + self.size).min(self.chars.len());
        let window: String = self.chars[self.pos..end].iter().collect();
        if end == self.chars.len() {
            // Final window reaches the end of the text; a further step
            // would only re-emit overlap.
            self.pos = self.chars.len();
        } else {
            self.pos += self.step;
        }
        Some(window)
    }
}
