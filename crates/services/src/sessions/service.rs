use std::fmt;
use std::io::Write;

use tracing::{debug, warn};

use mathcards_core::model::{MathOptions, Question};
use mathcards_core::random::{RandomSource, SeededRandom};
use mathcards_core::sequence::QuestionSequence;
use mathcards_core::{generate, pick_random, shuffle_from};

use super::progress::{SessionCounters, SessionProgress};
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of a `SessionService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No options installed yet.
    Uninitialized,
    /// Options installed, no game running.
    Initialized,
    /// A question list has been built and is being served.
    InGame,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Arithmetic flashcard session.
///
/// Owns the pending question list, the set of missed questions and the
/// progress counters. Questions are handed out one at a time; the caller
/// reports each answer back and the session decides whether to show it again.
pub struct SessionService {
    options: Option<MathOptions>,
    phase: SessionPhase,
    pending: QuestionSequence,
    missed: QuestionSequence,
    counters: SessionCounters,
    rng: Box<dyn RandomSource>,
}

impl SessionService {
    /// Creates an uninitialized session drawing from an OS-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_random(SeededRandom::from_os_rng())
    }

    /// Creates an uninitialized session using `rng` for every random draw.
    #[must_use]
    pub fn with_random(rng: impl RandomSource + 'static) -> Self {
        Self {
            options: None,
            phase: SessionPhase::Uninitialized,
            pending: QuestionSequence::new(),
            missed: QuestionSequence::new(),
            counters: SessionCounters::default(),
            rng: Box::new(rng),
        }
    }

    /// Installs default options. Calling it again changes nothing.
    pub fn initialize(&mut self) {
        if self.options.is_some() {
            debug!("session already initialized");
            return;
        }
        self.options = Some(MathOptions::default());
        self.phase = SessionPhase::Initialized;
        debug!("session initialized with default options");
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn options(&self) -> Option<&MathOptions> {
        self.options.as_ref()
    }

    /// Mutable access to the options for the next game.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInitialized` before `initialize`.
    pub fn options_mut(&mut self) -> Result<&mut MathOptions, SessionError> {
        match self.options.as_mut() {
            Some(options) => Ok(options),
            None => {
                warn!("options changed before initialize");
                Err(SessionError::NotInitialized)
            }
        }
    }

    /// Builds a fresh question list from the current options.
    ///
    /// Initializes the session first if needed. Any previous pending and
    /// missed questions are discarded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the options produce no questions.
    /// Propagates generation failures via `SessionError::Generate`.
    pub fn start_game(&mut self) -> Result<(), SessionError> {
        self.initialize();
        let Some(options) = self.options.as_ref() else {
            return Err(SessionError::NotInitialized);
        };

        self.pending.clear();
        self.missed.clear();
        self.counters = SessionCounters::default();

        let list = generate(options, self.rng.as_mut())?;
        self.install(list)
    }

    /// Starts a review game over the questions missed in the previous game.
    ///
    /// The missed questions are shuffled into the new list and the missed set
    /// is emptied. Without missed questions this behaves like `start_game`.
    /// If the shuffle fails the missed set and the running game are kept.
    ///
    /// # Errors
    ///
    /// Same as `start_game`.
    pub fn start_game_using_wrongs(&mut self) -> Result<(), SessionError> {
        if self.missed.is_empty() {
            debug!("no missed questions to review, generating from options");
            return self.start_game();
        }
        self.initialize();

        debug!(questions = self.missed.len(), "starting game from missed questions");
        let list = shuffle_from(&mut self.missed, self.rng.as_mut())?;
        self.install(list)
    }

    fn install(&mut self, list: QuestionSequence) -> Result<(), SessionError> {
        self.pending = list;
        self.counters = SessionCounters::for_list(self.pending.len());
        self.log_counters("game started");

        if self.pending.is_empty() {
            self.phase = SessionPhase::Initialized;
            warn!("game not started: no valid questions");
            return Err(SessionError::Empty);
        }
        self.phase = SessionPhase::InGame;
        Ok(())
    }

    /// Takes the next question off the pending list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInitialized` before `initialize` and
    /// `SessionError::Empty` when no question is pending.
    pub fn next_question(&mut self) -> Result<Question, SessionError> {
        self.ensure_initialized()?;
        let Some(question) = self.pending.pop_front() else {
            debug!("no pending questions");
            return Err(SessionError::Empty);
        };
        self.counters.remaining_in_list = self.counters.remaining_in_list.saturating_sub(1);
        self.counters.in_play += 1;
        debug!(%question, "next question");
        self.log_counters("question handed out");
        Ok(question)
    }

    /// Records a correct answer to `question`.
    ///
    /// When the list is not played through, a copy goes back into the pending
    /// list at a random position and stays unanswered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInitialized` before `initialize` and
    /// `SessionError::InvalidQuestion` for a snapshot whose answer does not
    /// follow from its operands.
    pub fn answered_correctly(&mut self, question: Question) -> Result<(), SessionError> {
        let play_through = self.checked_options(&question)?.play_through_list();

        if play_through {
            self.counters.unanswered = self.counters.unanswered.saturating_sub(1);
        } else {
            debug!(%question, "reinserting correctly answered question");
            self.reinsert(question, 1)?;
        }
        self.counters.correct += 1;
        self.counters.in_play = self.counters.in_play.saturating_sub(1);
        self.log_counters("answered correctly");
        Ok(())
    }

    /// Records a wrong answer to `question`.
    ///
    /// The question joins the missed set unless an equal question is already
    /// there. When wrong answers are repeated, `copies_repeated_wrongs` copies
    /// go back into the pending list at independent random positions.
    ///
    /// # Errors
    ///
    /// Same as `answered_correctly`.
    pub fn answered_incorrectly(&mut self, question: Question) -> Result<(), SessionError> {
        let options = self.checked_options(&question)?;
        let repeat = options.repeat_wrongs();
        let copies = usize::from(options.copies_repeated_wrongs());

        // Reserve everything up front so a failure changes nothing.
        let newly_missed = !self.missed.contains_question(&question);
        if newly_missed {
            self.missed.try_reserve(1)?;
        }
        if repeat {
            self.pending.try_reserve(copies)?;
        }

        if newly_missed {
            self.missed.push_back(question)?;
            debug!(%question, missed = self.missed.len(), "added to missed questions");
        }
        if repeat {
            self.reinsert(question, copies)?;
            self.counters.unanswered += copies - 1;
        } else {
            self.counters.unanswered = self.counters.unanswered.saturating_sub(1);
        }
        self.counters.wrong += 1;
        self.counters.in_play = self.counters.in_play.saturating_sub(1);
        self.log_counters("answered incorrectly");
        Ok(())
    }

    // Each copy lands after a node picked over the list length at that moment.
    fn reinsert(&mut self, question: Question, copies: usize) -> Result<(), SessionError> {
        self.pending.try_reserve(copies)?;
        for _ in 0..copies {
            let anchor = pick_random(
                self.counters.remaining_in_list,
                &self.pending,
                self.rng.as_mut(),
            );
            self.pending.insert_after(anchor, question)?;
            self.counters.remaining_in_list += 1;
        }
        Ok(())
    }

    /// True once every question of a non-empty game has been answered
    /// correctly with wrong answers being repeated.
    #[must_use]
    pub fn mission_accomplished(&self) -> bool {
        let repeat = self.options.as_ref().is_some_and(MathOptions::repeat_wrongs);
        self.counters.starting > 0 && repeat && self.counters.unanswered == 0
    }

    /// Questions left in the game, including the ones in play.
    #[must_use]
    pub fn total_questions_left(&self) -> usize {
        self.counters.unanswered
    }

    /// Questions left in the pending list, excluding the ones in play.
    #[must_use]
    pub fn list_questions_left(&self) -> usize {
        self.counters.remaining_in_list
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::from_counters(
            self.counters,
            self.missed.len(),
            self.mission_accomplished(),
        )
    }

    pub fn missed_questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.missed.iter()
    }

    #[must_use]
    pub fn missed_count(&self) -> usize {
        self.missed.len()
    }

    /// Discards both lists and zeroes the counters. The options stay in place
    /// for the next game.
    pub fn end_game(&mut self) {
        self.pending.clear();
        self.missed.clear();
        self.counters = SessionCounters::default();
        if self.options.is_some() {
            self.phase = SessionPhase::Initialized;
        }
        debug!("game ended");
    }

    /// Writes the current options as `name = value` lines.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInitialized` before `initialize` and
    /// `SessionError::Io` if writing fails.
    pub fn write_options<W: Write + ?Sized>(
        &self,
        out: &mut W,
        verbose: bool,
    ) -> Result<(), SessionError> {
        let options = self.options.as_ref().ok_or(SessionError::NotInitialized)?;
        options.write_to(out, verbose)?;
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<&MathOptions, SessionError> {
        self.options.as_ref().ok_or_else(|| {
            warn!("session used before initialize");
            SessionError::NotInitialized
        })
    }

    fn checked_options(&self, question: &Question) -> Result<&MathOptions, SessionError> {
        let options = self.ensure_initialized()?;
        if !question.is_well_formed() {
            warn!(?question, "rejected malformed question");
            return Err(SessionError::InvalidQuestion(*question));
        }
        Ok(options)
    }

    fn log_counters(&self, event: &'static str) {
        let c = &self.counters;
        debug!(
            event,
            starting = c.starting,
            remaining_in_list = c.remaining_in_list,
            in_play = c.in_play,
            unanswered = c.unanswered,
            correct = c.correct,
            wrong = c.wrong,
            missed = self.missed.len(),
            "session counters"
        );
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("phase", &self.phase)
            .field("pending", &self.pending.len())
            .field("missed", &self.missed.len())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
