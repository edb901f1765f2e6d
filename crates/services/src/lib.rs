#![forbid(unsafe_code)]

pub mod error;
pub mod practice;

pub use recite_core::Clock;

pub use error::PracticeError;
pub use practice::{CheckOutcome, PracticeLoopService};
