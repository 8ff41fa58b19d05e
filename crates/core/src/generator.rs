//! Expands `MathOptions` into a fresh `QuestionSequence`.

use std::collections::TryReserveError;
use std::ops::ControlFlow;

use thiserror::Error;
use tracing::debug;

use crate::model::{Format, MathOptions, Operation, Question};
use crate::random::RandomSource;
use crate::sequence::{QuestionSequence, SequenceError};
use crate::shuffle::shuffle;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateError {
    #[error("out of memory while generating questions: {0}")]
    OutOfMemory(#[source] TryReserveError),
    #[error(transparent)]
    Sequence(SequenceError),
}

impl From<SequenceError> for GenerateError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::Capacity(inner) => Self::OutOfMemory(inner),
            other => Self::Sequence(other),
        }
    }
}

/// Returns true if the triple may become a question under `options`.
///
/// Rejected when any magnitude exceeds `|max_answer|`, or when negatives are
/// disallowed and any value is negative.
#[must_use]
pub fn validate(options: &MathOptions, a: i32, b: i32, result: i32) -> bool {
    let limit = options.max_answer().unsigned_abs();
    let values = [a, b, result];
    if values.iter().any(|v| v.unsigned_abs() > limit) {
        return false;
    }
    options.allow_negatives() || values.iter().all(|v| *v >= 0)
}

/// Builds the question list for `options`.
///
/// Operations are visited in the order add, subtract, multiply, divide, each
/// as nested loops over its operand ranges. Every valid triple is emitted
/// `question_copies` times, once per enabled format. Generation stops at
/// `max_questions`. The list is shuffled afterwards when `randomize` is set.
///
/// # Errors
///
/// Returns `GenerateError::OutOfMemory` if the list cannot grow and
/// `GenerateError::Sequence` for any other list failure while shuffling.
pub fn generate(
    options: &MathOptions,
    rng: &mut dyn RandomSource,
) -> Result<QuestionSequence, GenerateError> {
    let mut emitter = Emitter {
        options,
        seq: QuestionSequence::new(),
    };

    'ops: for op in Operation::ALL {
        if !options.operation_allowed(op) {
            continue;
        }
        let (outer, inner) = options.operand_ranges(op);
        for x in outer {
            for y in inner.clone() {
                let Some((a, b, answer)) = triple(op, x, y) else {
                    continue;
                };
                if !validate(options, a, b, answer) {
                    continue;
                }
                if emitter.emit(op, a, b, answer)?.is_break() {
                    break 'ops;
                }
            }
        }
    }

    let seq = emitter.seq;
    debug!(
        questions = seq.len(),
        cap = options.max_questions(),
        randomize = options.randomize(),
        "generated question list"
    );

    if options.randomize() {
        return Ok(shuffle(seq, rng)?);
    }
    Ok(seq)
}

/// Operands and answer for one loop step. Division loops over quotient and
/// divisor and rebuilds the dividend; a zero divisor yields nothing.
fn triple(op: Operation, x: i32, y: i32) -> Option<(i32, i32, i32)> {
    match op {
        Operation::Add => Some((x, y, x.checked_add(y)?)),
        Operation::Sub => Some((x, y, x.checked_sub(y)?)),
        Operation::Mult => Some((x, y, x.checked_mul(y)?)),
        Operation::Div => {
            if y == 0 {
                return None;
            }
            Some((x.checked_mul(y)?, y, x))
        }
    }
}

struct Emitter<'a> {
    options: &'a MathOptions,
    seq: QuestionSequence,
}

impl Emitter<'_> {
    fn emit(
        &mut self,
        op: Operation,
        a: i32,
        b: i32,
        answer: i32,
    ) -> Result<ControlFlow<()>, GenerateError> {
        let limit = self.options.max_questions();
        for _ in 0..self.options.question_copies() {
            for format in self.options.enabled_formats() {
                if op == Operation::Mult && zero_hides_unknown(format, a, b) {
                    continue;
                }
                if self.seq.len() >= limit {
                    return Ok(ControlFlow::Break(()));
                }
                self.seq
                    .push_back(Question::new(a, b, op, answer, format))?;
            }
        }
        if self.seq.len() >= limit {
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }
}

// `0 x ? = 0` and `? x 0 = 0` have no unique answer.
fn zero_hides_unknown(format: Format, a: i32, b: i32) -> bool {
    match format {
        Format::AnswerMiddle => a == 0,
        Format::AnswerFirst => b == 0,
        Format::AnswerLast => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundKey, NodeId};
    use crate::random::{ScriptedRandom, SeededRandom, fixed_random};

    /// Only `op` enabled, answer-last only, no shuffling, bounds `lo..=hi`.
    fn only(op: Operation, lo: i32, hi: i32) -> MathOptions {
        let mut opts = MathOptions::default();
        for other in Operation::ALL {
            opts.set_operation_allowed(other, other == op);
        }
        opts.set_randomize(false);
        opts.set_operation_min(op, lo);
        opts.set_operation_max(op, hi);
        opts
    }

    fn render(seq: &QuestionSequence) -> Vec<String> {
        seq.iter()
            .map(|q| format!("{q} [{}]", q.answer()))
            .collect()
    }

    #[test]
    fn small_addition_list() {
        let mut opts = only(Operation::Add, 1, 2);
        opts.set_max_answer(10);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(
            render(&seq),
            vec!["1 + 1 = ? [2]", "1 + 2 = ? [3]", "2 + 1 = ? [3]", "2 + 2 = ? [4]"]
        );
    }

    #[test]
    fn count_is_valid_pairs_times_copies() {
        let mut opts = only(Operation::Add, 0, 12);
        opts.set_question_copies(3);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(seq.len(), 13 * 13 * 3);

        // Subtraction without negatives keeps pairs with minuend >= subtrahend.
        let opts = only(Operation::Sub, 0, 4);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(seq.len(), 15);
        assert!(seq.iter().all(|q| q.answer() >= 0));
    }

    #[test]
    fn max_answer_filters_large_products() {
        let mut opts = only(Operation::Mult, 0, 12);
        opts.set_max_answer(20);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        assert!(!seq.is_empty());
        assert!(seq.iter().all(|q| q.answer() <= 20 && q.operand_a() <= 20));
        assert!(seq.iter().all(Question::is_well_formed));
    }

    #[test]
    fn multiplication_skips_zero_unknowns() {
        let mut opts = only(Operation::Mult, 0, 2);
        opts.set_format_answer_first(true);
        opts.set_format_answer_middle(true);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();

        // 9 pairs x 3 formats, minus 3 middle (a == 0) and 3 first (b == 0).
        assert_eq!(seq.len(), 27 - 6);
        assert!(
            !seq.iter()
                .any(|q| q.format() == Format::AnswerMiddle && q.operand_a() == 0)
        );
        assert!(
            !seq.iter()
                .any(|q| q.format() == Format::AnswerFirst && q.operand_b() == 0)
        );
    }

    #[test]
    fn formats_are_emitted_last_middle_first() {
        let mut opts = only(Operation::Add, 1, 1);
        opts.set_format_answer_first(true);
        opts.set_format_answer_middle(true);
        opts.set_question_copies(2);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        let formats: Vec<_> = seq.iter().map(Question::format).collect();
        assert_eq!(
            formats,
            vec![
                Format::AnswerLast,
                Format::AnswerMiddle,
                Format::AnswerFirst,
                Format::AnswerLast,
                Format::AnswerMiddle,
                Format::AnswerFirst,
            ]
        );
    }

    #[test]
    fn division_skips_zero_divisor_and_rebuilds_dividend() {
        let opts = only(Operation::Div, 0, 3);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        // Quotients 0..=3 times divisors 1..=3.
        assert_eq!(seq.len(), 12);
        assert!(seq.iter().all(|q| q.operand_b() != 0));
        assert!(seq.iter().all(Question::is_well_formed));
        let first = seq.iter().next().unwrap();
        assert_eq!((first.operand_a(), first.operand_b(), first.answer()), (0, 1, 0));
        let last = seq.iter().last().unwrap();
        assert_eq!((last.operand_a(), last.operand_b(), last.answer()), (9, 3, 3));
    }

    #[test]
    fn operations_run_in_fixed_order() {
        let mut opts = MathOptions::default();
        opts.set_randomize(false);
        for key in BoundKey::ALL {
            opts.set_bound(key, 1);
        }
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        let ops: Vec<_> = seq.iter().map(Question::operation).collect();
        assert_eq!(ops, Operation::ALL.to_vec());
    }

    #[test]
    fn cap_stops_generation() {
        let mut opts = only(Operation::Add, 0, 12);
        opts.set_max_questions(10);
        let seq = generate(&opts, &mut ScriptedRandom::default()).unwrap();
        assert_eq!(seq.len(), 10);
        assert_eq!(seq.iter().last().unwrap().operand_b(), 9);

        opts.set_max_questions(0);
        assert!(generate(&opts, &mut fixed_random()).unwrap().is_empty());
    }

    #[test]
    fn empty_configuration_yields_empty_list() {
        let mut opts = MathOptions::default();
        for op in Operation::ALL {
            opts.set_operation_allowed(op, false);
        }
        assert!(generate(&opts, &mut fixed_random()).unwrap().is_empty());

        let mut opts = only(Operation::Add, 5, 1);
        opts.set_randomize(true);
        assert!(generate(&opts, &mut fixed_random()).unwrap().is_empty());
    }

    #[test]
    fn unshuffled_generation_is_deterministic() {
        let opts = only(Operation::Mult, 0, 6);
        let a = generate(&opts, &mut SeededRandom::seeded(1)).unwrap();
        let b = generate(&opts, &mut SeededRandom::seeded(2)).unwrap();
        assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn randomized_generation_permutes_the_list() {
        let mut opts = only(Operation::Add, 0, 5);
        let plain = generate(&opts, &mut fixed_random()).unwrap();
        opts.set_randomize(true);
        let shuffled = generate(&opts, &mut fixed_random()).unwrap();

        let mut a = render(&plain);
        let mut b = render(&shuffled);
        assert_eq!(a.len(), b.len());
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn only_capacity_failures_count_as_out_of_memory() {
        let overflow = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = GenerateError::from(SequenceError::Capacity(overflow));
        assert!(matches!(err, GenerateError::OutOfMemory(_)));

        let err = GenerateError::from(SequenceError::UnknownNode(NodeId::new(3, 1)));
        assert!(matches!(err, GenerateError::Sequence(SequenceError::UnknownNode(_))));
        assert_eq!(err.to_string(), "node NodeId(3v1) is not part of this sequence");
    }

    #[test]
    fn validate_rejects_magnitude_and_negatives() {
        let mut opts = MathOptions::default();
        opts.set_max_answer(10);
        assert!(validate(&opts, 10, 0, 10));
        assert!(!validate(&opts, 11, 0, 11));
        assert!(!validate(&opts, 2, 3, -1));

        opts.set_allow_negatives(true);
        opts.set_max_answer(-10);
        assert!(validate(&opts, 2, 3, -1));
        assert!(validate(&opts, -10, 0, -10));
        assert!(!validate(&opts, -11, 1, -10));
    }
}
