use mathcards_core::model::Question;

use super::service::SessionService;
use crate::error::SessionError;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub question: Question,
    pub response: i32,
    pub correct: bool,
    pub is_complete: bool,
}

/// Drives a `SessionService` one question at a time.
///
/// Holds the single question currently in play and grades learner responses
/// against it before reporting the outcome to the session.
#[derive(Debug)]
pub struct SessionLoop {
    session: SessionService,
    current: Option<Question>,
}

impl SessionLoop {
    #[must_use]
    pub fn new(session: SessionService) -> Self {
        Self {
            session,
            current: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionService {
        &mut self.session
    }

    #[must_use]
    pub fn into_inner(self) -> SessionService {
        self.session
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Start a new game from the session options.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the game could not be set up.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.session.start_game()
    }

    /// Start a review game over the questions missed so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the game could not be set up.
    pub fn start_review(&mut self) -> Result<(), SessionError> {
        self.current = None;
        self.session.start_game_using_wrongs()
    }

    /// Returns the question in play, drawing a new one if none is.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the pending list is exhausted.
    pub fn next_question(&mut self) -> Result<Question, SessionError> {
        if let Some(question) = self.current {
            return Ok(question);
        }
        let question = self.session.next_question()?;
        self.current = Some(question);
        Ok(question)
    }

    /// Grades `response` against the question in play and reports it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingInPlay` if no question was drawn.
    /// Propagates session errors; the question then stays in play.
    pub fn submit(&mut self, response: i32) -> Result<SessionAnswerResult, SessionError> {
        let Some(question) = self.current.take() else {
            return Err(SessionError::NothingInPlay);
        };
        let correct = question.is_correct_response(response);
        let outcome = if correct {
            self.session.answered_correctly(question)
        } else {
            self.session.answered_incorrectly(question)
        };
        if let Err(err) = outcome {
            self.current = Some(question);
            return Err(err);
        }

        Ok(SessionAnswerResult {
            question,
            response,
            correct,
            is_complete: self.is_complete(),
        })
    }

    /// True when a game with at least one question has been started and no
    /// question is left to answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let progress = self.session.progress();
        self.current.is_none() && progress.starting > 0 && progress.unanswered == 0
    }
}
