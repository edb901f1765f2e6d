use std::sync::Arc;

use recite_core::model::{
    ChunkSequence, ExerciseSettings, MemorizeSession, Passage, PassageError, ProgressIndex,
    Verdict,
};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::PracticeError;

/// Result of checking a typed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Matched; progress was saved and `chunk_index` is now showing.
    Advanced { chunk_index: usize },
    /// Matched the last chunk.
    Completed,
    /// No match; nothing changed.
    Mismatch,
}

/// Drives a `MemorizeSession` against the clock and the progress store.
///
/// Progress is written before the session moves, so a failed write leaves
/// the session exactly where it was.
#[derive(Clone)]
pub struct PracticeLoopService {
    clock: Clock,
    chunks: Arc<ChunkSequence>,
    settings: ExerciseSettings,
    progress: Arc<dyn ProgressRepository>,
}

impl PracticeLoopService {
    /// Splits the passage once for the lifetime of the service.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::EmptyPassage` if the passage yields no chunks.
    pub fn new(
        clock: Clock,
        passage: &Passage,
        settings: ExerciseSettings,
        progress: Arc<dyn ProgressRepository>,
    ) -> Result<Self, PracticeError> {
        let chunks = passage.chunks(settings.unit_size());
        if chunks.is_empty() {
            return Err(PracticeError::EmptyPassage);
        }
        tracing::debug!(
            chunks = chunks.len(),
            unit_size = settings.unit_size().get(),
            reveal_secs = settings.reveal_secs(),
            "passage split"
        );
        Ok(Self {
            clock,
            chunks: Arc::new(chunks),
            settings,
            progress,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Load stored progress and show the chunk it points at.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Storage` if the store cannot be read.
    pub async fn start(&self) -> Result<MemorizeSession, PracticeError> {
        let stored = self.progress.load_progress().await?;
        if stored.value() >= self.chunks.len() as u64 {
            tracing::warn!(
                stored = stored.value(),
                chunks = self.chunks.len(),
                "stored progress is past the last chunk, treating passage as complete"
            );
        }
        let session = MemorizeSession::start(
            Arc::clone(&self.chunks),
            stored,
            self.settings.reveal_threshold(),
            self.clock.now(),
        )
        .map_err(|_: PassageError| PracticeError::EmptyPassage)?;
        tracing::info!(
            chunk = session.index() + 1,
            total = session.total(),
            phase = ?session.phase(),
            "practice session started"
        );
        Ok(session)
    }

    /// Re-evaluate the countdown. Returns `true` when the chunk was hidden.
    pub fn tick(&self, session: &mut MemorizeSession) -> bool {
        session.tick(self.clock.now())
    }

    #[must_use]
    pub fn remaining_secs(&self, session: &MemorizeSession) -> Option<u64> {
        session.remaining_secs(self.clock.now())
    }

    /// Compare `attempt` with the hidden chunk and advance on a match.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NotHidden` while the chunk is still showing,
    /// `PracticeError::Completed` after the last chunk, and
    /// `PracticeError::Storage` if the new progress could not be saved.
    pub async fn check(
        &self,
        session: &mut MemorizeSession,
        attempt: &str,
    ) -> Result<CheckOutcome, PracticeError> {
        let now = self.clock.now();
        session.tick(now);
        if let Some(err) = PracticeError::for_phase(session.phase()) {
            return Err(err);
        }

        match session.evaluate(attempt) {
            Verdict::Advance { next } => {
                self.progress.save_progress(ProgressIndex::from(next)).await?;
                session.advance(next, now);
                tracing::info!(chunk = next + 1, total = session.total(), "chunk memorized");
                Ok(CheckOutcome::Advanced { chunk_index: next })
            }
            Verdict::Finish => {
                session.finish();
                tracing::info!(total = session.total(), "passage memorized");
                Ok(CheckOutcome::Completed)
            }
            Verdict::Mismatch => {
                session.record_mismatch();
                tracing::debug!(chunk = session.index() + 1, "attempt did not match");
                Ok(CheckOutcome::Mismatch)
            }
        }
    }

    /// Store zero progress and show the first chunk again.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Storage` if the reset could not be saved.
    pub async fn reset(&self, session: &mut MemorizeSession) -> Result<(), PracticeError> {
        self.progress.save_progress(ProgressIndex::START).await?;
        session.restart(self.clock.now());
        tracing::info!("progress reset");
        Ok(())
    }
}
