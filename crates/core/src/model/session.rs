use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::model::{Chunk, ChunkSequence, PassageError, ProgressIndex, ProgressPosition};
use crate::timer::SessionTimer;

/// Where the current round is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Chunk text is on screen and the countdown runs.
    Showing,
    /// Chunk text is concealed; waiting for a typed attempt.
    Hidden,
    /// Every chunk has been typed back correctly.
    Complete,
}

/// Result of the most recent check, kept until the next action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// What a typed attempt means for the session, before anything is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Matched and another chunk follows.
    Advance { next: usize },
    /// Matched the last chunk.
    Finish,
    Mismatch,
}

/// Per-run state of the reveal/hide/type loop.
///
/// Nothing here is persisted. Callers persist `progress_index()` changes
/// themselves and only then apply them with `advance` or `restart`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorizeSession {
    chunks: Arc<ChunkSequence>,
    index: usize,
    phase: Phase,
    timer: SessionTimer,
    threshold: Duration,
    feedback: Option<Feedback>,
    peek_open: bool,
}

impl MemorizeSession {
    /// Starts at the stored progress, showing that chunk.
    ///
    /// # Errors
    ///
    /// Returns `PassageError::Empty` when there are no chunks.
    pub fn start(
        chunks: Arc<ChunkSequence>,
        progress: ProgressIndex,
        threshold: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, PassageError> {
        let position = progress.position(chunks.len());
        let index = position
            .display_index(chunks.len())
            .ok_or(PassageError::Empty)?;
        let phase = match position {
            ProgressPosition::At(_) => Phase::Showing,
            ProgressPosition::Complete => Phase::Complete,
        };
        Ok(Self {
            chunks,
            index,
            phase,
            timer: SessionTimer::start(now),
            threshold,
            feedback: None,
            peek_open: false,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn progress_index(&self) -> ProgressIndex {
        ProgressIndex::from(self.index)
    }

    #[must_use]
    pub fn current_chunk(&self) -> &Chunk {
        // `start` rejects an empty sequence and every transition keeps
        // `index` in range.
        &self.chunks.as_slice()[self.index]
    }

    #[must_use]
    pub fn timer(&self) -> SessionTimer {
        self.timer
    }

    #[must_use]
    pub fn is_peek_open(&self) -> bool {
        self.peek_open
    }

    /// Share of chunks completed, in `[0, 1]`.
    #[must_use]
    pub fn completion_ratio(&self) -> f64 {
        if self.phase == Phase::Complete {
            return 1.0;
        }
        self.index as f64 / self.chunks.len() as f64
    }

    /// Seconds left on the countdown while the chunk is showing.
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        (self.phase == Phase::Showing).then(|| self.timer.remaining_secs(now, self.threshold))
    }

    /// Re-evaluates the timer. Returns `true` when the chunk was just hidden.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.phase == Phase::Showing && self.timer.expired(now, self.threshold) {
            self.phase = Phase::Hidden;
            return true;
        }
        false
    }

    /// Compares an attempt with the current chunk without changing state.
    #[must_use]
    pub fn evaluate(&self, attempt: &str) -> Verdict {
        if !self.current_chunk().matches(attempt) {
            return Verdict::Mismatch;
        }
        let next = self.index + 1;
        if next < self.chunks.len() {
            Verdict::Advance { next }
        } else {
            Verdict::Finish
        }
    }

    /// Moves to `next` and shows it with a fresh timer.
    pub fn advance(&mut self, next: usize, now: DateTime<Utc>) {
        debug_assert!(next < self.chunks.len());
        self.index = next.min(self.chunks.len() - 1);
        self.phase = Phase::Showing;
        self.timer = SessionTimer::start(now);
        self.feedback = Some(Feedback::Correct);
        self.peek_open = false;
    }

    /// Marks the passage done. The index stays on the last chunk.
    pub fn finish(&mut self) {
        self.phase = Phase::Complete;
        self.feedback = Some(Feedback::Correct);
    }

    pub fn record_mismatch(&mut self) {
        self.feedback = Some(Feedback::Incorrect);
    }

    /// Back to the first chunk with a fresh timer.
    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.index = 0;
        self.phase = Phase::Showing;
        self.timer = SessionTimer::start(now);
        self.feedback = None;
        self.peek_open = false;
    }

    /// Opens or closes the answer disclosure. Never affects scoring.
    pub fn toggle_peek(&mut self) {
        self.peek_open = !self.peek_open;
    }
}
