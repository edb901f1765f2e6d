#[must_use]
pub fn format_countdown(remaining_secs: u64) -> String {
    format!("Disappearing in {remaining_secs} sec...")
}

#[must_use]
pub fn format_progress(chunk_number: usize, total: usize) -> String {
    format!("Chunk {chunk_number} of {total}")
}
