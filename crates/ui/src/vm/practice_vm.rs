use recite_core::model::{Feedback, MemorizeSession, Phase};
use services::{CheckOutcome, PracticeError, PracticeLoopService};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PracticeIntent {
    Check(String),
    Reset,
    TogglePeek,
}

/// Everything the practice panel needs to render one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PracticeSnapshot {
    pub chunk_number: usize,
    pub total: usize,
    pub progress_percent: u32,
    pub phase: Phase,
    pub chunk_text: String,
    pub remaining_secs: Option<u64>,
    pub feedback: Option<Feedback>,
    pub peek_open: bool,
}

impl PracticeSnapshot {
    #[must_use]
    pub fn chunk_visible(&self) -> bool {
        self.phase == Phase::Showing
    }

    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Hidden
    }
}

pub struct PracticeVm {
    session: MemorizeSession,
}

impl PracticeVm {
    #[must_use]
    pub fn new(session: MemorizeSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.session.phase() == Phase::Showing
    }

    #[must_use]
    pub fn snapshot(&self, practice: &PracticeLoopService) -> PracticeSnapshot {
        let ratio = self.session.completion_ratio().clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let progress_percent = (ratio * 100.0).round() as u32;
        PracticeSnapshot {
            chunk_number: self.session.index() + 1,
            total: self.session.total(),
            progress_percent,
            phase: self.session.phase(),
            chunk_text: self.session.current_chunk().text().to_owned(),
            remaining_secs: practice.remaining_secs(&self.session),
            feedback: self.session.feedback(),
            peek_open: self.session.is_peek_open(),
        }
    }

    pub fn tick(&mut self, practice: &PracticeLoopService) -> bool {
        practice.tick(&mut self.session)
    }

    pub fn toggle_peek(&mut self) {
        self.session.toggle_peek();
    }

    /// # Errors
    ///
    /// Returns `ViewError::SaveFailed` when progress could not be stored and
    /// `ViewError::Unknown` for other service failures.
    pub async fn check(
        &mut self,
        practice: &PracticeLoopService,
        attempt: &str,
    ) -> Result<CheckOutcome, ViewError> {
        practice
            .check(&mut self.session, attempt)
            .await
            .map_err(view_error)
    }

    /// # Errors
    ///
    /// Returns `ViewError::SaveFailed` when the reset could not be stored.
    pub async fn reset(&mut self, practice: &PracticeLoopService) -> Result<(), ViewError> {
        practice.reset(&mut self.session).await.map_err(view_error)
    }
}

fn view_error(err: PracticeError) -> ViewError {
    tracing::error!(%err, "practice action failed");
    match err {
        PracticeError::Storage(_) => ViewError::SaveFailed,
        _ => ViewError::Unknown,
    }
}

/// # Errors
///
/// Returns `ViewError::EmptyPassage` when there is nothing to practice and
/// `ViewError::Unknown` for other failures.
pub async fn start_practice(practice: &PracticeLoopService) -> Result<PracticeVm, ViewError> {
    match practice.start().await {
        Ok(session) => Ok(PracticeVm::new(session)),
        Err(PracticeError::EmptyPassage) => Err(ViewError::EmptyPassage),
        Err(err) => {
            tracing::error!(%err, "could not start practice");
            Err(ViewError::Unknown)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use recite_core::Clock;
    use recite_core::model::{ExerciseSettings, Passage, ProgressIndex};
    use recite_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    use super::*;

    fn practice_at(repo: &InMemoryRepository, secs: i64) -> PracticeLoopService {
        PracticeLoopService::new(
            Clock::fixed(fixed_now() + Duration::seconds(secs)),
            &Passage::parse("A cat sat. It slept well.").unwrap(),
            ExerciseSettings::new(1, 4).unwrap(),
            Arc::new(repo.clone()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn snapshot_tracks_countdown_and_hide() {
        let repo = InMemoryRepository::new();
        let mut vm = start_practice(&practice_at(&repo, 0)).await.unwrap();

        let early = vm.snapshot(&practice_at(&repo, 1));
        assert!(early.chunk_visible());
        assert_eq!(early.remaining_secs, Some(3));
        assert_eq!(early.chunk_number, 1);
        assert_eq!(early.progress_percent, 0);

        assert!(vm.tick(&practice_at(&repo, 4)));
        let late = vm.snapshot(&practice_at(&repo, 4));
        assert!(late.accepts_input());
        assert_eq!(late.remaining_secs, None);
    }

    #[tokio::test]
    async fn save_failure_maps_to_save_failed() {
        let repo = InMemoryRepository::new();
        let mut vm = start_practice(&practice_at(&repo, 0)).await.unwrap();
        repo.set_fail_writes(true);
        let result = vm.check(&practice_at(&repo, 5), "A cat sat.").await;
        assert_eq!(result, Err(ViewError::SaveFailed));
    }

    #[tokio::test]
    async fn complete_snapshot_reports_full_progress() {
        let repo = InMemoryRepository::with_progress(ProgressIndex::new(1));
        let mut vm = start_practice(&practice_at(&repo, 0)).await.unwrap();
        let outcome = vm.check(&practice_at(&repo, 4), "It slept well.").await;
        assert_eq!(outcome, Ok(CheckOutcome::Completed));
        let snapshot = vm.snapshot(&practice_at(&repo, 4));
        assert_eq!(snapshot.phase, Phase::Complete);
        assert_eq!(snapshot.progress_percent, 100);
        assert_eq!(snapshot.chunk_number, 2);
    }
}
