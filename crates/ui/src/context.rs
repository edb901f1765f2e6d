use std::sync::Arc;
use std::time::Duration;

use services::PracticeLoopService;

/// How often the countdown is re-evaluated while a chunk is showing.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

pub trait UiApp: Send + Sync {
    fn practice_loop(&self) -> Arc<PracticeLoopService>;

    fn tick_interval(&self) -> Duration {
        DEFAULT_TICK_INTERVAL
    }
}

#[derive(Clone)]
pub struct AppContext {
    practice_loop: Arc<PracticeLoopService>,
    tick_interval: Duration,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            practice_loop: app.practice_loop(),
            tick_interval: app.tick_interval(),
        }
    }

    #[must_use]
    pub fn practice_loop(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice_loop)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
