#![forbid(unsafe_code)]

pub mod generator;
pub mod model;
pub mod random;
pub mod sequence;
pub mod shuffle;

pub use generator::{GenerateError, generate, validate};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use sequence::{QuestionSequence, SequenceError};
pub use shuffle::{pick_random, shuffle, shuffle_from};
