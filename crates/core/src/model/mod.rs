mod passage;
mod progress;
mod session;
mod settings;

pub use passage::{Chunk, ChunkSequence, DEFAULT_PASSAGE, Passage, PassageError};
pub use progress::{ProgressIndex, ProgressPosition};
pub use session::{Feedback, MemorizeSession, Phase, Verdict};
pub use settings::{ExerciseSettings, Profile, SettingsError};
