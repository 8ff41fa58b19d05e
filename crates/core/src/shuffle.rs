//! Random placement over a `QuestionSequence`.

use tracing::debug;

use crate::model::NodeId;
use crate::random::RandomSource;
use crate::sequence::{QuestionSequence, SequenceError};

/// Picks the node at a uniformly drawn zero-based offset in `0..length`.
///
/// `length` is the caller's view of the list length. A `length` of 0 yields
/// the head (which is `None` for an empty list). An offset past the real end
/// of the list falls back to the tail.
pub fn pick_random(
    length: usize,
    seq: &QuestionSequence,
    rng: &mut dyn RandomSource,
) -> Option<NodeId> {
    if length == 0 {
        return seq.front();
    }
    let offset = rng.pick_index(length);
    seq.nth_node(offset).or_else(|| seq.back())
}

/// Consumes `input` and returns its questions in a random order.
///
/// Each round selects a remaining node uniformly, then places it directly
/// after a uniformly chosen node of the output (at the head while the output
/// is empty). The resulting permutation is not uniform: after the first move
/// nothing is placed at the head again.
///
/// # Errors
///
/// Returns `SequenceError::Capacity` if the output cannot grow.
pub fn shuffle(
    mut input: QuestionSequence,
    rng: &mut dyn RandomSource,
) -> Result<QuestionSequence, SequenceError> {
    shuffle_from(&mut input, rng)
}

/// Like [`shuffle`], but drains `input` in place.
///
/// The output is allocated before any node moves, so on error `input` still
/// holds every question.
///
/// # Errors
///
/// Returns `SequenceError::Capacity` if the output cannot grow.
pub fn shuffle_from(
    input: &mut QuestionSequence,
    rng: &mut dyn RandomSource,
) -> Result<QuestionSequence, SequenceError> {
    let total = input.len();
    let mut output = QuestionSequence::with_capacity(total)?;

    while let Some(selected) = pick_random(input.len(), input, rng) {
        let anchor = if output.is_empty() {
            None
        } else {
            pick_random(output.len(), &output, rng)
        };
        input.move_to(selected, &mut output, anchor)?;
    }

    debug!(questions = total, "shuffled question sequence");
    Ok(output)
}
