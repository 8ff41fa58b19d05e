#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use mathcards_core::RandomSource;
pub use sessions as session;

pub use error::SessionError;
pub use sessions::{SessionAnswerResult, SessionLoop, SessionPhase, SessionProgress, SessionService};
