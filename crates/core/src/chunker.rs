//! Sentence splitting and grouping of a passage into chunks.

use std::num::NonZeroUsize;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Chunk, ChunkSequence};

/// Terminal punctuation followed by the whitespace run that separates it
/// from the next sentence.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence break pattern is valid"));

/// Splits `text` into sentences.
///
/// A sentence ends right after `.`, `!` or `?` when whitespace follows; the
/// punctuation stays with the sentence and the whitespace run is dropped.
/// Trailing text without terminal punctuation is its own final sentence.
/// The passage is trimmed first, internal whitespace is left untouched.
#[must_use]
pub fn sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut start = 0;
    for found in SENTENCE_BREAK.find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        out.push(&text[start..=found.start()]);
        start = found.end();
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Groups consecutive sentences into chunks of `unit_size` sentences,
/// joined by a single space. The last chunk may hold fewer.
#[must_use]
pub fn split(text: &str, unit_size: NonZeroUsize) -> ChunkSequence {
    let chunks = sentences(text)
        .chunks(unit_size.get())
        .map(|batch| Chunk::new(batch.join(" ")))
        .collect();
    ChunkSequence::new(chunks)
}
