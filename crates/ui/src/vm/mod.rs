mod practice_vm;
mod time_fmt;

pub use practice_vm::{PracticeIntent, PracticeSnapshot, PracticeVm, start_practice};
pub use time_fmt::{format_countdown, format_progress};
