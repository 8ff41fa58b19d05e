use serde::Serialize;
use std::io::{self, Write};
use std::ops::RangeInclusive;

use crate::model::question::{Format, Operation};

/// Largest magnitude any bound (including `max_answer`) may take.
pub const GLOBAL_MAX: i32 = 999;

pub const MIN_COPIES: u8 = 1;
pub const MAX_COPIES: u8 = 10;

pub const DEFAULT_MAX_ANSWER: i32 = 144;
pub const DEFAULT_MAX_QUESTIONS: usize = 5000;
pub const DEFAULT_OPERAND_MIN: i32 = 0;
pub const DEFAULT_OPERAND_MAX: i32 = 12;

//
// ─── BOUND KEYS ────────────────────────────────────────────────────────────────
//

/// Names one operand bound of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoundKey {
    MinAugend,
    MaxAugend,
    MinAddend,
    MaxAddend,
    MinMinuend,
    MaxMinuend,
    MinSubtrahend,
    MaxSubtrahend,
    MinMultiplier,
    MaxMultiplier,
    MinMultiplicand,
    MaxMultiplicand,
    MinDivisor,
    MaxDivisor,
    MinQuotient,
    MaxQuotient,
}

impl BoundKey {
    pub const ALL: [BoundKey; 16] = [
        BoundKey::MinAugend,
        BoundKey::MaxAugend,
        BoundKey::MinAddend,
        BoundKey::MaxAddend,
        BoundKey::MinMinuend,
        BoundKey::MaxMinuend,
        BoundKey::MinSubtrahend,
        BoundKey::MaxSubtrahend,
        BoundKey::MinMultiplier,
        BoundKey::MaxMultiplier,
        BoundKey::MinMultiplicand,
        BoundKey::MaxMultiplicand,
        BoundKey::MinDivisor,
        BoundKey::MaxDivisor,
        BoundKey::MinQuotient,
        BoundKey::MaxQuotient,
    ];

    /// Option name as written by the diagnostic dump.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BoundKey::MinAugend => "min_augend",
            BoundKey::MaxAugend => "max_augend",
            BoundKey::MinAddend => "min_addend",
            BoundKey::MaxAddend => "max_addend",
            BoundKey::MinMinuend => "min_minuend",
            BoundKey::MaxMinuend => "max_minuend",
            BoundKey::MinSubtrahend => "min_subtrahend",
            BoundKey::MaxSubtrahend => "max_subtrahend",
            BoundKey::MinMultiplier => "min_multiplier",
            BoundKey::MaxMultiplier => "max_multiplier",
            BoundKey::MinMultiplicand => "min_multiplicand",
            BoundKey::MaxMultiplicand => "max_multiplicand",
            BoundKey::MinDivisor => "min_divisor",
            BoundKey::MaxDivisor => "max_divisor",
            BoundKey::MinQuotient => "min_quotient",
            BoundKey::MaxQuotient => "max_quotient",
        }
    }

    #[must_use]
    pub fn operation(self) -> Operation {
        match self {
            BoundKey::MinAugend
            | BoundKey::MaxAugend
            | BoundKey::MinAddend
            | BoundKey::MaxAddend => Operation::Add,
            BoundKey::MinMinuend
            | BoundKey::MaxMinuend
            | BoundKey::MinSubtrahend
            | BoundKey::MaxSubtrahend => Operation::Sub,
            BoundKey::MinMultiplier
            | BoundKey::MaxMultiplier
            | BoundKey::MinMultiplicand
            | BoundKey::MaxMultiplicand => Operation::Mult,
            BoundKey::MinDivisor
            | BoundKey::MaxDivisor
            | BoundKey::MinQuotient
            | BoundKey::MaxQuotient => Operation::Div,
        }
    }

    /// The (min, max) keys of both operands of an operation, in loop order:
    /// the outer operand first. Division loops over the quotient, then the divisor.
    #[must_use]
    pub fn for_operation(op: Operation) -> [(BoundKey, BoundKey); 2] {
        match op {
            Operation::Add => [
                (BoundKey::MinAugend, BoundKey::MaxAugend),
                (BoundKey::MinAddend, BoundKey::MaxAddend),
            ],
            Operation::Sub => [
                (BoundKey::MinMinuend, BoundKey::MaxMinuend),
                (BoundKey::MinSubtrahend, BoundKey::MaxSubtrahend),
            ],
            Operation::Mult => [
                (BoundKey::MinMultiplier, BoundKey::MaxMultiplier),
                (BoundKey::MinMultiplicand, BoundKey::MaxMultiplicand),
            ],
            Operation::Div => [
                (BoundKey::MinQuotient, BoundKey::MaxQuotient),
                (BoundKey::MinDivisor, BoundKey::MaxDivisor),
            ],
        }
    }
}

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// Tunables controlling question generation and answer handling.
///
/// Every setter clamps its input into the documented range instead of failing.
/// While negatives are disallowed no bound can hold a negative value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct MathOptions {
    play_through_list: bool,
    repeat_wrongs: bool,
    copies_repeated_wrongs: u8,
    allow_negatives: bool,
    max_answer: i32,
    max_questions: usize,
    format_answer_last: bool,
    format_answer_first: bool,
    format_answer_middle: bool,
    question_copies: u8,
    randomize: bool,

    addition_allowed: bool,
    subtraction_allowed: bool,
    multiplication_allowed: bool,
    division_allowed: bool,

    min_augend: i32,
    max_augend: i32,
    min_addend: i32,
    max_addend: i32,
    min_minuend: i32,
    max_minuend: i32,
    min_subtrahend: i32,
    max_subtrahend: i32,
    min_multiplier: i32,
    max_multiplier: i32,
    min_multiplicand: i32,
    max_multiplicand: i32,
    min_divisor: i32,
    max_divisor: i32,
    min_quotient: i32,
    max_quotient: i32,
}

impl Default for MathOptions {
    fn default() -> Self {
        Self {
            play_through_list: true,
            repeat_wrongs: true,
            copies_repeated_wrongs: 1,
            allow_negatives: false,
            max_answer: DEFAULT_MAX_ANSWER,
            max_questions: DEFAULT_MAX_QUESTIONS,
            format_answer_last: true,
            format_answer_first: false,
            format_answer_middle: false,
            question_copies: 1,
            randomize: true,

            addition_allowed: true,
            subtraction_allowed: true,
            multiplication_allowed: true,
            division_allowed: true,

            min_augend: DEFAULT_OPERAND_MIN,
            max_augend: DEFAULT_OPERAND_MAX,
            min_addend: DEFAULT_OPERAND_MIN,
            max_addend: DEFAULT_OPERAND_MAX,
            min_minuend: DEFAULT_OPERAND_MIN,
            max_minuend: DEFAULT_OPERAND_MAX,
            min_subtrahend: DEFAULT_OPERAND_MIN,
            max_subtrahend: DEFAULT_OPERAND_MAX,
            min_multiplier: DEFAULT_OPERAND_MIN,
            max_multiplier: DEFAULT_OPERAND_MAX,
            min_multiplicand: DEFAULT_OPERAND_MIN,
            max_multiplicand: DEFAULT_OPERAND_MAX,
            min_divisor: DEFAULT_OPERAND_MIN,
            max_divisor: DEFAULT_OPERAND_MAX,
            min_quotient: DEFAULT_OPERAND_MIN,
            max_quotient: DEFAULT_OPERAND_MAX,
        }
    }
}

impl MathOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── General options ──────────────────────────────────────────────────────

    #[must_use]
    pub fn play_through_list(&self) -> bool {
        self.play_through_list
    }

    pub fn set_play_through_list(&mut self, on: bool) {
        self.play_through_list = on;
    }

    #[must_use]
    pub fn repeat_wrongs(&self) -> bool {
        self.repeat_wrongs
    }

    pub fn set_repeat_wrongs(&mut self, on: bool) {
        self.repeat_wrongs = on;
    }

    #[must_use]
    pub fn copies_repeated_wrongs(&self) -> u8 {
        self.copies_repeated_wrongs
    }

    pub fn set_copies_repeated_wrongs(&mut self, copies: i32) {
        self.copies_repeated_wrongs = clamp_copies(copies);
    }

    #[must_use]
    pub fn allow_negatives(&self) -> bool {
        self.allow_negatives
    }

    /// Disallowing negatives also resets every negative bound to zero.
    pub fn set_allow_negatives(&mut self, on: bool) {
        self.allow_negatives = on;
        if !on {
            self.clear_negatives();
        }
    }

    #[must_use]
    pub fn max_answer(&self) -> i32 {
        self.max_answer
    }

    pub fn set_max_answer(&mut self, max: i32) {
        self.max_answer = self.sane_value(max);
    }

    #[must_use]
    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    pub fn set_max_questions(&mut self, max: i32) {
        self.max_questions = usize::try_from(max).unwrap_or(0);
    }

    #[must_use]
    pub fn question_copies(&self) -> u8 {
        self.question_copies
    }

    pub fn set_question_copies(&mut self, copies: i32) {
        self.question_copies = clamp_copies(copies);
    }

    /// Whether the generated list is shuffled at the start of a game.
    #[must_use]
    pub fn randomize(&self) -> bool {
        self.randomize
    }

    pub fn set_randomize(&mut self, on: bool) {
        self.randomize = on;
    }

    // ─── Formats ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn format_answer_last(&self) -> bool {
        self.format_answer_last
    }

    pub fn set_format_answer_last(&mut self, on: bool) {
        self.format_answer_last = on;
    }

    #[must_use]
    pub fn format_answer_first(&self) -> bool {
        self.format_answer_first
    }

    pub fn set_format_answer_first(&mut self, on: bool) {
        self.format_answer_first = on;
    }

    #[must_use]
    pub fn format_answer_middle(&self) -> bool {
        self.format_answer_middle
    }

    pub fn set_format_answer_middle(&mut self, on: bool) {
        self.format_answer_middle = on;
    }

    #[must_use]
    pub fn format_enabled(&self, format: Format) -> bool {
        match format {
            Format::AnswerLast => self.format_answer_last,
            Format::AnswerFirst => self.format_answer_first,
            Format::AnswerMiddle => self.format_answer_middle,
        }
    }

    pub fn set_format_enabled(&mut self, format: Format, on: bool) {
        match format {
            Format::AnswerLast => self.format_answer_last = on,
            Format::AnswerFirst => self.format_answer_first = on,
            Format::AnswerMiddle => self.format_answer_middle = on,
        }
    }

    /// Enabled formats in emission order (last, middle, first).
    pub fn enabled_formats(&self) -> impl Iterator<Item = Format> + '_ {
        Format::EMISSION_ORDER
            .into_iter()
            .filter(|f| self.format_enabled(*f))
    }

    // ─── Operations ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn operation_allowed(&self, op: Operation) -> bool {
        match op {
            Operation::Add => self.addition_allowed,
            Operation::Sub => self.subtraction_allowed,
            Operation::Mult => self.multiplication_allowed,
            Operation::Div => self.division_allowed,
        }
    }

    pub fn set_operation_allowed(&mut self, op: Operation, on: bool) {
        match op {
            Operation::Add => self.addition_allowed = on,
            Operation::Sub => self.subtraction_allowed = on,
            Operation::Mult => self.multiplication_allowed = on,
            Operation::Div => self.division_allowed = on,
        }
    }

    // ─── Operand bounds ───────────────────────────────────────────────────────

    #[must_use]
    pub fn bound(&self, key: BoundKey) -> i32 {
        match key {
            BoundKey::MinAugend => self.min_augend,
            BoundKey::MaxAugend => self.max_augend,
            BoundKey::MinAddend => self.min_addend,
            BoundKey::MaxAddend => self.max_addend,
            BoundKey::MinMinuend => self.min_minuend,
            BoundKey::MaxMinuend => self.max_minuend,
            BoundKey::MinSubtrahend => self.min_subtrahend,
            BoundKey::MaxSubtrahend => self.max_subtrahend,
            BoundKey::MinMultiplier => self.min_multiplier,
            BoundKey::MaxMultiplier => self.max_multiplier,
            BoundKey::MinMultiplicand => self.min_multiplicand,
            BoundKey::MaxMultiplicand => self.max_multiplicand,
            BoundKey::MinDivisor => self.min_divisor,
            BoundKey::MaxDivisor => self.max_divisor,
            BoundKey::MinQuotient => self.min_quotient,
            BoundKey::MaxQuotient => self.max_quotient,
        }
    }

    pub fn set_bound(&mut self, key: BoundKey, value: i32) {
        let value = self.sane_value(value);
        *self.bound_mut(key) = value;
    }

    /// Sets the minimum of both operands of `op`.
    pub fn set_operation_min(&mut self, op: Operation, value: i32) {
        for (min, _) in BoundKey::for_operation(op) {
            self.set_bound(min, value);
        }
    }

    /// Sets the maximum of both operands of `op`.
    pub fn set_operation_max(&mut self, op: Operation, value: i32) {
        for (_, max) in BoundKey::for_operation(op) {
            self.set_bound(max, value);
        }
    }

    /// Inclusive ranges of the outer and inner generation loops for `op`.
    ///
    /// An inverted range (min > max) is empty.
    #[must_use]
    pub fn operand_ranges(&self, op: Operation) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let [(outer_min, outer_max), (inner_min, inner_max)] = BoundKey::for_operation(op);
        (
            self.bound(outer_min)..=self.bound(outer_max),
            self.bound(inner_min)..=self.bound(inner_max),
        )
    }

    fn bound_mut(&mut self, key: BoundKey) -> &mut i32 {
        match key {
            BoundKey::MinAugend => &mut self.min_augend,
            BoundKey::MaxAugend => &mut self.max_augend,
            BoundKey::MinAddend => &mut self.min_addend,
            BoundKey::MaxAddend => &mut self.max_addend,
            BoundKey::MinMinuend => &mut self.min_minuend,
            BoundKey::MaxMinuend => &mut self.max_minuend,
            BoundKey::MinSubtrahend => &mut self.min_subtrahend,
            BoundKey::MaxSubtrahend => &mut self.max_subtrahend,
            BoundKey::MinMultiplier => &mut self.min_multiplier,
            BoundKey::MaxMultiplier => &mut self.max_multiplier,
            BoundKey::MinMultiplicand => &mut self.min_multiplicand,
            BoundKey::MaxMultiplicand => &mut self.max_multiplicand,
            BoundKey::MinDivisor => &mut self.min_divisor,
            BoundKey::MaxDivisor => &mut self.max_divisor,
            BoundKey::MinQuotient => &mut self.min_quotient,
            BoundKey::MaxQuotient => &mut self.max_quotient,
        }
    }

    fn clear_negatives(&mut self) {
        for key in BoundKey::ALL {
            let bound = self.bound_mut(key);
            if *bound < 0 {
                *bound = 0;
            }
        }
        if self.max_answer < 0 {
            self.max_answer = 0;
        }
    }

    fn sane_value(&self, value: i32) -> i32 {
        let value = value.clamp(-GLOBAL_MAX, GLOBAL_MAX);
        if value < 0 && !self.allow_negatives {
            0
        } else {
            value
        }
    }

    // ─── Diagnostic dump ──────────────────────────────────────────────────────

    /// Writes every option as a `name = value` line.
    ///
    /// With `verbose` set, commentary blocks explaining each group are added.
    /// The output is a reporting aid and is not meant to be parsed back.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the writer.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W, verbose: bool) -> io::Result<()> {
        if verbose {
            write_comment(
                out,
                &[
                    "General options",
                    "",
                    "play_through_list: ask every question in the list once; the",
                    "game ends when the list runs dry. When off, correctly answered",
                    "questions go back into the list at a random position.",
                    "question_copies: how many times each question is generated (1-10).",
                    "repeat_wrongs: put missed questions back into the list.",
                    "copies_repeated_wrongs: copies of a missed question put back (1-10).",
                    "A mission counts as accomplished only while repeat_wrongs is on.",
                ],
            )?;
        }
        write_flag(out, "play_through_list", self.play_through_list)?;
        writeln!(out, "question_copies = {}", self.question_copies)?;
        write_flag(out, "repeat_wrongs", self.repeat_wrongs)?;
        writeln!(out, "copies_repeated_wrongs = {}", self.copies_repeated_wrongs)?;

        if verbose {
            write_comment(
                out,
                &[
                    "Question formats (any combination may be enabled):",
                    "  format_answer_last:    2 + 2 = ?",
                    "  format_answer_first:   ? + 2 = 4",
                    "  format_answer_middle:  2 + ? = 4",
                ],
            )?;
        }
        write_flag(out, "format_answer_last", self.format_answer_last)?;
        write_flag(out, "format_answer_first", self.format_answer_first)?;
        write_flag(out, "format_answer_middle", self.format_answer_middle)?;

        if verbose {
            write_comment(
                out,
                &[
                    "allow_negatives: permit negative operands and answers.",
                    "Turning it off resets every negative operand bound to 0.",
                ],
            )?;
        }
        write_flag(out, "allow_negatives", self.allow_negatives)?;

        if verbose {
            write_comment(
                out,
                &[
                    "max_answer: largest magnitude allowed for any term of a",
                    "question, not only the answer. At most 999.",
                ],
            )?;
        }
        writeln!(out, "max_answer = {}", self.max_answer)?;

        if verbose {
            write_comment(out, &["max_questions: upper limit on the question list length."])?;
        }
        writeln!(out, "max_questions = {}", self.max_questions)?;

        if verbose {
            write_comment(out, &["randomize: shuffle the list when a game starts."])?;
        }
        write_flag(out, "randomize", self.randomize)?;

        if verbose {
            write_comment(out, &["Operations included in generated lists."])?;
        }
        write_flag(out, "addition_allowed", self.addition_allowed)?;
        write_flag(out, "subtraction_allowed", self.subtraction_allowed)?;
        write_flag(out, "multiplication_allowed", self.multiplication_allowed)?;
        write_flag(out, "division_allowed", self.division_allowed)?;

        if verbose {
            write_comment(
                out,
                &[
                    "Operand ranges (inclusive). Every value in a range is used;",
                    "a range whose max is below its min produces no questions.",
                    "Negative bounds require allow_negatives.",
                ],
            )?;
        }
        for (op, header) in [
            (Operation::Add, "Addition operands: augend + addend = sum"),
            (Operation::Sub, "Subtraction operands: minuend - subtrahend = difference"),
            (Operation::Mult, "Multiplication operands: multiplier * multiplicand = product"),
            (Operation::Div, "Division operands: dividend / divisor = quotient"),
        ] {
            writeln!(out)?;
            writeln!(out, "# {header}")?;
            for key in BoundKey::ALL.into_iter().filter(|k| k.operation() == op) {
                writeln!(out, "{} = {}", key.name(), self.bound(key))?;
            }
        }
        Ok(())
    }
}

fn clamp_copies(copies: i32) -> u8 {
    let clamped = copies.clamp(i32::from(MIN_COPIES), i32::from(MAX_COPIES));
    u8::try_from(clamped).unwrap_or(MIN_COPIES)
}

fn write_flag<W: Write + ?Sized>(out: &mut W, name: &str, value: bool) -> io::Result<()> {
    writeln!(out, "{name} = {}", u8::from(value))
}

fn write_comment<W: Write + ?Sized>(out: &mut W, lines: &[&str]) -> io::Result<()> {
    writeln!(out)?;
    for line in lines {
        if line.is_empty() {
            writeln!(out, "#")?;
        } else {
            writeln!(out, "# {line}")?;
        }
    }
    writeln!(out)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(opts: &MathOptions, verbose: bool) -> String {
        let mut buf = Vec::new();
        opts.write_to(&mut buf, verbose).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let opts = MathOptions::default();
        assert!(opts.play_through_list());
        assert!(opts.repeat_wrongs());
        assert_eq!(opts.copies_repeated_wrongs(), 1);
        assert!(!opts.allow_negatives());
        assert_eq!(opts.max_answer(), 144);
        assert_eq!(opts.max_questions(), 5000);
        assert!(opts.format_answer_last());
        assert!(!opts.format_answer_first());
        assert!(!opts.format_answer_middle());
        assert_eq!(opts.question_copies(), 1);
        assert!(opts.randomize());
        for op in Operation::ALL {
            assert!(opts.operation_allowed(op));
        }
        assert_eq!(opts.bound(BoundKey::MinDivisor), 0);
        assert_eq!(opts.bound(BoundKey::MaxQuotient), 12);
    }

    #[test]
    fn copies_are_clamped() {
        let mut opts = MathOptions::default();
        opts.set_question_copies(0);
        assert_eq!(opts.question_copies(), 1);
        opts.set_question_copies(25);
        assert_eq!(opts.question_copies(), 10);
        opts.set_copies_repeated_wrongs(-4);
        assert_eq!(opts.copies_repeated_wrongs(), 1);
        opts.set_copies_repeated_wrongs(7);
        assert_eq!(opts.copies_repeated_wrongs(), 7);
    }

    #[test]
    fn bounds_clamped_to_global_max() {
        let mut opts = MathOptions::default();
        opts.set_allow_negatives(true);
        opts.set_bound(BoundKey::MaxAugend, 5000);
        assert_eq!(opts.bound(BoundKey::MaxAugend), GLOBAL_MAX);
        opts.set_bound(BoundKey::MinAugend, -5000);
        assert_eq!(opts.bound(BoundKey::MinAugend), -GLOBAL_MAX);
        opts.set_max_answer(12_345);
        assert_eq!(opts.max_answer(), GLOBAL_MAX);
    }

    #[test]
    fn negatives_rejected_while_disallowed() {
        let mut opts = MathOptions::default();
        opts.set_bound(BoundKey::MinMinuend, -5);
        assert_eq!(opts.bound(BoundKey::MinMinuend), 0);
        opts.set_max_answer(-10);
        assert_eq!(opts.max_answer(), 0);
    }

    #[test]
    fn disallowing_negatives_zeroes_stored_bounds() {
        let mut opts = MathOptions::default();
        opts.set_allow_negatives(true);
        opts.set_operation_min(Operation::Sub, -8);
        opts.set_bound(BoundKey::MaxQuotient, -2);
        assert_eq!(opts.bound(BoundKey::MinMinuend), -8);
        assert_eq!(opts.bound(BoundKey::MinSubtrahend), -8);

        opts.set_allow_negatives(false);
        for key in BoundKey::ALL {
            assert!(opts.bound(key) >= 0, "{} still negative", key.name());
        }
        assert_eq!(opts.bound(BoundKey::MaxQuotient), 0);
    }

    #[test]
    fn negative_max_questions_clamps_to_zero() {
        let mut opts = MathOptions::default();
        opts.set_max_questions(-1);
        assert_eq!(opts.max_questions(), 0);
        opts.set_max_questions(20);
        assert_eq!(opts.max_questions(), 20);
    }

    #[test]
    fn combined_setters_touch_both_operands() {
        let mut opts = MathOptions::default();
        opts.set_operation_max(Operation::Mult, 9);
        opts.set_operation_min(Operation::Mult, 2);
        let (outer, inner) = opts.operand_ranges(Operation::Mult);
        assert_eq!(outer, 2..=9);
        assert_eq!(inner, 2..=9);
    }

    #[test]
    fn division_loops_over_quotient_then_divisor() {
        let mut opts = MathOptions::default();
        opts.set_bound(BoundKey::MinQuotient, 3);
        opts.set_bound(BoundKey::MaxQuotient, 4);
        opts.set_bound(BoundKey::MinDivisor, 1);
        opts.set_bound(BoundKey::MaxDivisor, 9);
        let (outer, inner) = opts.operand_ranges(Operation::Div);
        assert_eq!(outer, 3..=4);
        assert_eq!(inner, 1..=9);
    }

    #[test]
    fn enabled_formats_use_emission_order() {
        let mut opts = MathOptions::default();
        opts.set_format_answer_first(true);
        opts.set_format_answer_middle(true);
        let formats: Vec<_> = opts.enabled_formats().collect();
        assert_eq!(
            formats,
            vec![Format::AnswerLast, Format::AnswerMiddle, Format::AnswerFirst]
        );

        opts.set_format_enabled(Format::AnswerLast, false);
        assert!(!opts.format_enabled(Format::AnswerLast));
        assert_eq!(opts.enabled_formats().count(), 2);
    }

    #[test]
    fn dump_lists_every_option() {
        let text = dump(&MathOptions::default(), false);
        assert!(text.contains("play_through_list = 1\n"));
        assert!(text.contains("allow_negatives = 0\n"));
        assert!(text.contains("max_answer = 144\n"));
        assert!(text.contains("max_questions = 5000\n"));
        assert!(text.contains("division_allowed = 1\n"));
        for key in BoundKey::ALL {
            assert!(text.contains(&format!("{} = ", key.name())), "missing {}", key.name());
        }
        assert!(!text.contains("General options"));
    }

    #[test]
    fn verbose_dump_adds_commentary() {
        let opts = MathOptions::default();
        let terse = dump(&opts, false);
        let verbose = dump(&opts, true);
        assert!(verbose.contains("# General options"));
        assert!(verbose.contains("format_answer_middle:  2 + ? = 4"));
        assert!(verbose.len() > terse.len());
    }

    #[test]
    fn options_serialize_for_reporting() {
        let json = serde_json::to_value(MathOptions::default()).unwrap();
        assert_eq!(json["max_answer"], 144);
        assert_eq!(json["format_answer_last"], true);
    }
}
