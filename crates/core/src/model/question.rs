use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── OPERATION ─────────────────────────────────────────────────────────────────
//

/// The four arithmetic operations a question can practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Sub,
    Mult,
    Div,
}

impl Operation {
    /// All operations in generation order.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Sub,
        Operation::Mult,
        Operation::Div,
    ];

    /// Symbol used when rendering a question prompt.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mult => "x",
            Operation::Div => "/",
        }
    }

    /// Applies the operation, returning `None` on overflow, division by zero
    /// or a division that leaves a remainder.
    #[must_use]
    pub fn apply(self, a: i32, b: i32) -> Option<i32> {
        match self {
            Operation::Add => a.checked_add(b),
            Operation::Sub => a.checked_sub(b),
            Operation::Mult => a.checked_mul(b),
            Operation::Div => {
                if b == 0 || a.checked_rem(b)? != 0 {
                    None
                } else {
                    a.checked_div(b)
                }
            }
        }
    }
}

//
// ─── FORMAT ────────────────────────────────────────────────────────────────────
//

/// Which term of the equation is hidden from the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// `a + b = ?`
    AnswerLast,
    /// `? + b = c`
    AnswerFirst,
    /// `a + ? = c`
    AnswerMiddle,
}

impl Format {
    /// Formats in the order the generator emits them for a single triple.
    pub const EMISSION_ORDER: [Format; 3] =
        [Format::AnswerLast, Format::AnswerMiddle, Format::AnswerFirst];
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One arithmetic flashcard.
///
/// For division `operand_a` is the dividend and `operand_b` the divisor, so the
/// card reads `operand_a / operand_b = answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    operand_a: i32,
    operand_b: i32,
    operation: Operation,
    answer: i32,
    format: Format,
}

impl Question {
    #[must_use]
    pub fn new(
        operand_a: i32,
        operand_b: i32,
        operation: Operation,
        answer: i32,
        format: Format,
    ) -> Self {
        Self {
            operand_a,
            operand_b,
            operation,
            answer,
            format,
        }
    }

    #[must_use]
    pub fn operand_a(&self) -> i32 {
        self.operand_a
    }

    #[must_use]
    pub fn operand_b(&self) -> i32 {
        self.operand_b
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn answer(&self) -> i32 {
        self.answer
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// Structural comparison used for de-duplication.
    ///
    /// The answer is derived from the other fields and is not compared.
    #[must_use]
    pub fn is_same_question(&self, other: &Question) -> bool {
        self.operand_a == other.operand_a
            && self.operand_b == other.operand_b
            && self.operation == other.operation
            && self.format == other.format
    }

    /// Returns true if the stored answer actually follows from the operands.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.operation.apply(self.operand_a, self.operand_b) == Some(self.answer)
    }

    /// The value of the hidden term.
    #[must_use]
    pub fn unknown(&self) -> i32 {
        match self.format {
            Format::AnswerLast => self.answer,
            Format::AnswerFirst => self.operand_a,
            Format::AnswerMiddle => self.operand_b,
        }
    }

    #[must_use]
    pub fn is_correct_response(&self, response: i32) -> bool {
        self.unknown() == response
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operation.symbol();
        match self.format {
            Format::AnswerLast => write!(f, "{} {op} {} = ?", self.operand_a, self.operand_b),
            Format::AnswerFirst => write!(f, "? {op} {} = {}", self.operand_b, self.answer),
            Format::AnswerMiddle => write!(f, "{} {op} ? = {}", self.operand_a, self.answer),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
