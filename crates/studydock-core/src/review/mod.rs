mod engine;

pub use engine::{GradeOutcome, ReviewEngine, ReviewState};
