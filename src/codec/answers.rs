// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Answer packer.
//!
//! Packs an ordered run of multiple-choice answers into one fixed-width
//! binary word, then renders that word through the base-32 codec. Each
//! answer contributes the zero-based index of its selection, as many bits
//! wide as its choice set demands. Widths are derived from the actual
//! choice-set sizes, so the packer itself is shape-agnostic; the standard
//! ten-topic questionnaire (nine four-option topics and one two-option
//! topic) packs to exactly 19 bits and four symbols, and the identifier
//! assembler holds that shape as a compatibility precondition.
//!
//! Unpacking needs the original choice sets, supplied out of band by the
//! caller — the packed code alone carries indices, not meanings.

use crate::codec::base32::{self, from_bit_string, to_bit_string, Alphabet, BITS_PER_SYMBOL};

/// Number of topics in the standard questionnaire.
pub const QUESTIONNAIRE_LEN: usize = 10;

/// A single recorded answer: the selected character and the ordered choice
/// set it was drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    selected: char,
    choices: String,
}

impl Answer {
    /// Construct new answer record.
    pub fn new(selected: char, choices: impl Into<String>) -> Self {
        Self {
            selected,
            choices: choices.into(),
        }
    }

    /// Selected choice character.
    pub fn selected(&self) -> char {
        self.selected
    }

    /// Ordered string of valid choice characters.
    pub fn choices(&self) -> &str {
        self.choices.as_str()
    }
}

/// A fixed questionnaire topic: prompt, choice characters, and display
/// labels in matching order.
#[derive(Clone, Copy, Debug)]
pub struct Topic {
    pub prompt: &'static str,
    pub choices: &'static str,
    pub labels: &'static [&'static str],
}

impl Topic {
    /// Record an answer to this topic by zero-based choice index.
    ///
    /// # Errors
    ///
    /// - Return [`Error::IndexOutOfRange`] if the index has no choice.
    pub fn answer_by_index(&self, index: usize) -> Result<Answer> {
        let selected = self
            .choices
            .chars()
            .nth(index)
            .ok_or(Error::IndexOutOfRange {
                index: index as u64,
                size: self.choices.chars().count(),
            })?;
        Ok(Answer::new(selected, self.choices))
    }
}

/// The ten fixed topics of the standard daily questionnaire.
///
/// Nine four-option topics followed by one two-option topic, which is what
/// pins the packed response at 19 bits.
pub const STANDARD_QUESTIONNAIRE: [Topic; QUESTIONNAIRE_LEN] = [
    Topic {
        prompt: "How did you sleep?",
        choices: "abcd",
        labels: &["terribly", "poorly", "well", "very well"],
    },
    Topic {
        prompt: "How is your energy?",
        choices: "abcd",
        labels: &["flat", "low", "steady", "high"],
    },
    Topic {
        prompt: "How is your mood?",
        choices: "abcd",
        labels: &["grim", "muted", "fine", "bright"],
    },
    Topic {
        prompt: "How stressed are you?",
        choices: "abcd",
        labels: &["overwhelmed", "strained", "manageable", "calm"],
    },
    Topic {
        prompt: "How sharp is your focus?",
        choices: "abcd",
        labels: &["scattered", "foggy", "workable", "sharp"],
    },
    Topic {
        prompt: "How is your appetite?",
        choices: "abcd",
        labels: &["none", "weak", "normal", "strong"],
    },
    Topic {
        prompt: "Any pain today?",
        choices: "abcd",
        labels: &["severe", "moderate", "mild", "none"],
    },
    Topic {
        prompt: "How social do you feel?",
        choices: "abcd",
        labels: &["drained", "reluctant", "open", "eager"],
    },
    Topic {
        prompt: "How productive was the day?",
        choices: "abcd",
        labels: &["lost", "slow", "solid", "flowing"],
    },
    Topic {
        prompt: "Migraine today?",
        choices: "yn",
        labels: &["yes", "no"],
    },
];

/// Bits needed to address every option of a choice set of target size.
///
/// # Errors
///
/// - Return [`Error::ChoiceSetTooSmall`] if the set offers fewer than two
///   options.
pub fn bit_width(size: usize) -> Result<usize> {
    if size < 2 {
        return Err(Error::ChoiceSetTooSmall(size));
    }

    let mut width = 1;
    while (1usize << width) < size {
        width += 1;
    }

    Ok(width)
}

/// Encode a selection as the bit string of its zero-based choice index.
///
/// Selection matching is case-insensitive.
///
/// # Errors
///
/// - Return [`Error::ChoiceSetTooSmall`] if the set offers fewer than two
///   options.
/// - Return [`Error::UnknownChoice`] if the selection is not in the set.
pub fn encode_answer(selected: char, choices: impl AsRef<str>) -> Result<String> {
    let choices = choices.as_ref();
    let width = bit_width(choices.chars().count())?;
    let index = choices
        .chars()
        .position(|choice| choice.eq_ignore_ascii_case(&selected))
        .ok_or_else(|| Error::UnknownChoice {
            selected,
            choices: choices.into(),
        })?;

    Ok(to_bit_string(index as u64, width)?)
}

/// Decode an index bit string back into its choice character.
///
/// # Errors
///
/// - Return [`Error::WidthMismatch`] if the bit string is not exactly as
///   wide as the choice set demands.
/// - Return [`Error::IndexOutOfRange`] if the index addresses no choice.
pub fn decode_answer(bits: impl AsRef<str>, choices: impl AsRef<str>) -> Result<char> {
    let bits = bits.as_ref();
    let choices = choices.as_ref();
    let size = choices.chars().count();
    let width = bit_width(size)?;
    if bits.len() != width {
        return Err(Error::WidthMismatch {
            expected: width,
            got: bits.len(),
        });
    }

    let index = from_bit_string(bits)?;
    choices
        .chars()
        .nth(index as usize)
        .ok_or(Error::IndexOutOfRange { index, size })
}

/// Pack an ordered run of answers into one base-32 code.
///
/// Widths come from the actual choice-set sizes; the concatenated bits are
/// left-padded up to the next symbol boundary before encoding. The standard
/// questionnaire packs to four symbols.
///
/// # Errors
///
/// - Return [`Error::NothingToPack`] if no answers are given.
/// - Return [`Error::PackedTooWide`] if the combined bits exceed 64.
/// - Any per-answer error from [`encode_answer`].
pub fn pack(answers: &[Answer], alphabet: &Alphabet) -> Result<String> {
    if answers.is_empty() {
        return Err(Error::NothingToPack);
    }

    let mut bits = String::new();
    for answer in answers {
        bits.push_str(&encode_answer(answer.selected, &answer.choices)?);
    }

    if bits.len() > u64::BITS as usize {
        return Err(Error::PackedTooWide(bits.len()));
    }

    let symbols = bits.len().div_ceil(BITS_PER_SYMBOL);
    Ok(alphabet.encode_padded(from_bit_string(&bits)?, symbols)?)
}

/// Unpack a base-32 answer code given the original ordered choice sets.
///
/// # Errors
///
/// - Return [`Error::WidthMismatch`] if the code length disagrees with the
///   symbol count the choice sets demand.
/// - Return [`Error::StrayBits`] if padding bits above the packed width are
///   set.
/// - Any per-answer error from [`decode_answer`].
pub fn unpack(
    code: impl AsRef<str>,
    choice_sets: &[impl AsRef<str>],
    alphabet: &Alphabet,
) -> Result<Vec<char>> {
    let code = code.as_ref();
    let mut total = 0;
    for choices in choice_sets {
        total += bit_width(choices.as_ref().chars().count())?;
    }

    let symbols = total.div_ceil(BITS_PER_SYMBOL);
    if code.chars().count() != symbols {
        return Err(Error::WidthMismatch {
            expected: symbols,
            got: code.chars().count(),
        });
    }

    let packed = alphabet.decode(code)?;
    if total < u64::BITS as usize && packed >> total != 0 {
        return Err(Error::StrayBits(code.into()));
    }

    let all_bits = to_bit_string(packed, total)?;
    let mut selections = Vec::with_capacity(choice_sets.len());
    let mut cursor = 0;
    for choices in choice_sets {
        let width = bit_width(choices.as_ref().chars().count())?;
        selections.push(decode_answer(&all_bits[cursor..cursor + width], choices)?);
        cursor += width;
    }

    Ok(selections)
}

/// Check that answers fit the standard questionnaire shape.
///
/// Exactly ten answers, one drawn from a two-option set and nine from
/// four-option sets. This is the shape the 19-bit/4-symbol identifier
/// contract is built on.
///
/// # Errors
///
/// - Return [`Error::WrongAnswerCount`] if not exactly ten answers.
/// - Return [`Error::NonStandardShape`] if the choice-set sizes deviate.
pub fn check_standard_shape(answers: &[Answer]) -> Result<()> {
    if answers.len() != QUESTIONNAIRE_LEN {
        return Err(Error::WrongAnswerCount(answers.len()));
    }

    let binary = answers
        .iter()
        .filter(|answer| answer.choices.chars().count() == 2)
        .count();
    let quaternary = answers
        .iter()
        .filter(|answer| answer.choices.chars().count() == 4)
        .count();
    if binary != 1 || quaternary != QUESTIONNAIRE_LEN - 1 {
        return Err(Error::NonStandardShape { binary, quaternary });
    }

    Ok(())
}

/// Answer packer error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Choice set with fewer than two options.
    #[error("choice set must offer at least two options, got {0}")]
    ChoiceSetTooSmall(usize),

    /// Selection that is not part of its choice set.
    #[error("selection {selected:?} is not one of {choices:?}")]
    UnknownChoice { selected: char, choices: String },

    /// Decoded index with no matching choice.
    #[error("index {index} is outside a choice set of {size} options")]
    IndexOutOfRange { index: u64, size: usize },

    /// Bit or symbol width disagrees with what the choice sets demand.
    #[error("expected width {expected}, got {got}")]
    WidthMismatch { expected: usize, got: usize },

    /// Packed padding bits that should be zero are set.
    #[error("stray bits above the packed width in {0:?}")]
    StrayBits(String),

    /// Combined answer bits exceed one 64-bit word.
    #[error("packed answers need {0} bits, which exceeds 64")]
    PackedTooWide(usize),

    /// Empty answer run.
    #[error("no answers to pack")]
    NothingToPack,

    /// Answer count off the standard ten.
    #[error("expected {n} answers, got {0}", n = QUESTIONNAIRE_LEN)]
    WrongAnswerCount(usize),

    /// Choice-set sizes off the standard one-binary-nine-quaternary shape.
    #[error(
        "expected one two-option set and nine four-option sets, \
         got {binary} and {quaternary}"
    )]
    NonStandardShape { binary: usize, quaternary: usize },

    /// Base-32 conversion fails.
    #[error(transparent)]
    Base32(#[from] base32::Error),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn standard_answers(selections: [char; QUESTIONNAIRE_LEN]) -> Vec<Answer> {
        STANDARD_QUESTIONNAIRE
            .iter()
            .zip(selections)
            .map(|(topic, selected)| Answer::new(selected, topic.choices))
            .collect()
    }

    #[test_case('a', "abcd", "00"; "first of four")]
    #[test_case('c', "abcd", "10"; "third of four")]
    #[test_case('d', "abcd", "11"; "last of four")]
    #[test_case('y', "yn", "0"; "binary yes")]
    #[test_case('n', "yn", "1"; "binary no")]
    #[test_case('C', "abcd", "10"; "uppercase selection")]
    #[test]
    fn encode_answer_as_index_bits(selected: char, choices: &str, expect: &str) {
        assert_eq!(encode_answer(selected, choices).unwrap(), expect);
    }

    #[test]
    fn encode_answer_rejects_bad_input() {
        assert_eq!(
            encode_answer('e', "abcd"),
            Err(Error::UnknownChoice {
                selected: 'e',
                choices: "abcd".into()
            })
        );
        assert_eq!(encode_answer('a', "a"), Err(Error::ChoiceSetTooSmall(1)));
    }

    #[test]
    fn decode_answer_inverts_encoding() {
        for choices in ["abcd", "yn", "pqrstvwx"] {
            for selected in choices.chars() {
                let bits = encode_answer(selected, choices).unwrap();
                assert_eq!(decode_answer(bits, choices).unwrap(), selected);
            }
        }
    }

    #[test]
    fn decode_answer_rejects_wrong_width() {
        assert_eq!(
            decode_answer("101", "abcd"),
            Err(Error::WidthMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test_case(2, 1; "binary")]
    #[test_case(3, 2; "ternary rounds up")]
    #[test_case(4, 2; "quaternary")]
    #[test_case(5, 3; "five rounds up")]
    #[test_case(32, 5; "full symbol")]
    #[test]
    fn bit_width_is_ceil_log2(size: usize, expect: usize) {
        assert_eq!(bit_width(size).unwrap(), expect);
    }

    #[test]
    fn standard_questionnaire_packs_to_nineteen_bits() {
        let total: usize = STANDARD_QUESTIONNAIRE
            .iter()
            .map(|topic| bit_width(topic.choices.chars().count()).unwrap())
            .sum();
        assert_eq!(total, 19);
    }

    #[test]
    fn pack_known_standard_response() {
        // Indices 1 2 0 3 1 0 0 2 3 then binary 1: 0110001101000010111.
        let alphabet = Alphabet::default();
        let answers =
            standard_answers(['b', 'c', 'a', 'd', 'b', 'a', 'a', 'c', 'd', 'n']);
        assert_eq!(pack(&answers, &alphabet).unwrap(), "66hr");
    }

    #[test_case(['a', 'a', 'a', 'a', 'a', 'a', 'a', 'a', 'a', 'y'], "0000"; "all first choices")]
    #[test_case(['d', 'd', 'd', 'd', 'd', 'd', 'd', 'd', 'd', 'n'], "gzzz"; "all last choices")]
    #[test]
    fn pack_extreme_standard_responses(
        selections: [char; QUESTIONNAIRE_LEN],
        expect: &str,
    ) {
        let alphabet = Alphabet::default();
        let answers = standard_answers(selections);
        assert_eq!(pack(&answers, &alphabet).unwrap(), expect);
    }

    #[test]
    fn unpack_inverts_pack() {
        let alphabet = Alphabet::default();
        let selections = ['b', 'c', 'a', 'd', 'b', 'a', 'a', 'c', 'd', 'n'];
        let answers = standard_answers(selections);
        let code = pack(&answers, &alphabet).unwrap();

        let choice_sets: Vec<&str> = STANDARD_QUESTIONNAIRE
            .iter()
            .map(|topic| topic.choices)
            .collect();
        let recovered = unpack(code, &choice_sets, &alphabet).unwrap();
        assert_eq!(recovered, selections.to_vec());
    }

    #[test]
    fn unpack_rejects_stray_bits() {
        // 2^19 encodes as "g000", one bit above the 19-bit payload.
        let alphabet = Alphabet::default();
        let choice_sets: Vec<&str> = STANDARD_QUESTIONNAIRE
            .iter()
            .map(|topic| topic.choices)
            .collect();
        let result = unpack("h000", &choice_sets, &alphabet);
        assert_eq!(result, Err(Error::StrayBits("h000".into())));
    }

    #[test]
    fn unpack_rejects_wrong_code_width() {
        let alphabet = Alphabet::default();
        let choice_sets: Vec<&str> = STANDARD_QUESTIONNAIRE
            .iter()
            .map(|topic| topic.choices)
            .collect();
        let result = unpack("66hr0", &choice_sets, &alphabet);
        assert_eq!(
            result,
            Err(Error::WidthMismatch {
                expected: 4,
                got: 5
            })
        );
    }

    #[test]
    fn pack_generalizes_beyond_the_standard_shape() {
        // Two ternary sets round up to two bits each: 01 10 -> 0110 -> one
        // symbol of value 6.
        let alphabet = Alphabet::default();
        let answers = vec![Answer::new('f', "efg"), Answer::new('k', "hjk")];
        assert_eq!(pack(&answers, &alphabet).unwrap(), "6");

        let recovered = unpack("6", &["efg", "hjk"], &alphabet).unwrap();
        assert_eq!(recovered, vec!['f', 'k']);
    }

    #[test]
    fn pack_rejects_empty_run() {
        let alphabet = Alphabet::default();
        assert_eq!(pack(&[], &alphabet), Err(Error::NothingToPack));
    }

    #[test]
    fn standard_shape_check() {
        let answers =
            standard_answers(['a', 'a', 'a', 'a', 'a', 'a', 'a', 'a', 'a', 'y']);
        assert_eq!(check_standard_shape(&answers), Ok(()));

        assert_eq!(
            check_standard_shape(&answers[..9]),
            Err(Error::WrongAnswerCount(9))
        );

        let mut skewed = answers;
        skewed[9] = Answer::new('a', "abcd");
        assert_eq!(
            check_standard_shape(&skewed),
            Err(Error::NonStandardShape {
                binary: 0,
                quaternary: 10
            })
        );
    }

    #[test]
    fn answer_by_index_resolves_choice() {
        let topic = &STANDARD_QUESTIONNAIRE[9];
        assert_eq!(topic.answer_by_index(1).unwrap().selected(), 'n');
        assert!(topic.answer_by_index(2).is_err());
    }
}
