mod service;

// Public API of the practice subsystem.
pub use crate::error::PracticeError;
pub use service::{CheckOutcome, PracticeLoopService};
