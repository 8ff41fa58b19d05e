use serde::Serialize;

/// Counters of a running session.
///
/// `remaining_in_list` counts questions still waiting in the pending list,
/// while `unanswered` also includes questions handed out but not yet graded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SessionCounters {
    pub starting: usize,
    pub remaining_in_list: usize,
    pub in_play: usize,
    pub unanswered: usize,
    pub correct: usize,
    pub wrong: usize,
}

impl SessionCounters {
    /// Fresh counters for a game over `len` questions.
    pub fn for_list(len: usize) -> Self {
        Self {
            starting: len,
            remaining_in_list: len,
            unanswered: len,
            ..Self::default()
        }
    }
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub starting: usize,
    pub remaining_in_list: usize,
    pub in_play: usize,
    pub unanswered: usize,
    pub correct: usize,
    pub wrong: usize,
    pub missed: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    pub(crate) fn from_counters(counters: SessionCounters, missed: usize, is_complete: bool) -> Self {
        Self {
            starting: counters.starting,
            remaining_in_list: counters.remaining_in_list,
            in_play: counters.in_play,
            unanswered: counters.unanswered,
            correct: counters.correct,
            wrong: counters.wrong,
            missed,
            is_complete,
        }
    }

    /// Number of graded answers so far.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.correct + self.wrong
    }
}
