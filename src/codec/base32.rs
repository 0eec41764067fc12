// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Base-32 integer codec.
//!
//! Every compact encoding in this crate goes through one fixed 32-symbol
//! alphabet: the ten digits plus a curated subset of lowercase letters that
//! leaves out visually ambiguous glyphs ("a", "i", "l", "o"). Thirty-two
//! symbols means every symbol carries exactly five bits, which is what lets
//! the geospatial codec split symbols evenly between two bisection paths.
//!
//! Alongside the base-32 conversions this module owns the bit-string
//! helpers used by the answer packer. Everything here is a pure function of
//! its inputs.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Symbol set used by every encoder in this crate unless overridden.
pub const DEFAULT_SYMBOLS: &str = "0123456789bcdefghjkmnpqrstuvwxyz";

/// Number of symbols an [`Alphabet`] must hold.
pub const ALPHABET_SIZE: usize = 32;

/// Bits carried by a single symbol.
pub const BITS_PER_SYMBOL: usize = 5;

/// A validated 32-symbol alphabet.
///
/// Symbols must be distinct lowercase letters or digits. Decoding is
/// case-insensitive, so an alphabet never contains uppercase symbols itself.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: String,
}

impl Alphabet {
    /// Construct new alphabet from its symbol string.
    ///
    /// # Errors
    ///
    /// - Return [`Error::WrongAlphabetSize`] if not exactly 32 symbols.
    /// - Return [`Error::ForbiddenAlphabetSymbol`] if a symbol is not a
    ///   lowercase letter or digit.
    /// - Return [`Error::DuplicateAlphabetSymbol`] if a symbol repeats.
    pub fn new(symbols: impl Into<String>) -> Result<Self> {
        let symbols = symbols.into();
        if symbols.chars().count() != ALPHABET_SIZE {
            return Err(Error::WrongAlphabetSize(symbols.chars().count()));
        }

        for (position, symbol) in symbols.char_indices() {
            if !symbol.is_ascii_lowercase() && !symbol.is_ascii_digit() {
                return Err(Error::ForbiddenAlphabetSymbol(symbol));
            }

            if symbols[..position].contains(symbol) {
                return Err(Error::DuplicateAlphabetSymbol(symbol));
            }
        }

        Ok(Self { symbols })
    }

    /// Treat alphabet as its symbol string.
    pub fn as_str(&self) -> &str {
        self.symbols.as_str()
    }

    /// Symbol that encodes zero.
    pub fn zero_symbol(&self) -> char {
        // INVARIANT: Construction guarantees 32 ASCII symbols.
        self.symbols.as_bytes()[0] as char
    }

    fn symbol(&self, index: u64) -> char {
        self.symbols.as_bytes()[index as usize] as char
    }

    /// Zero-based index of target symbol, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// - Return [`Error::UnknownSymbol`] if the symbol is outside the
    ///   alphabet.
    pub fn index_of(&self, symbol: char) -> Result<u64> {
        self.symbols
            .find(symbol.to_ascii_lowercase())
            .map(|index| index as u64)
            .ok_or(Error::UnknownSymbol(symbol))
    }

    /// Encode a non-negative integer into its shortest base-32 string.
    ///
    /// Zero encodes to the single zero symbol.
    pub fn encode(&self, mut value: u64) -> String {
        if value == 0 {
            return self.zero_symbol().to_string();
        }

        let mut encoded = Vec::new();
        while value > 0 {
            encoded.push(self.symbol(value % ALPHABET_SIZE as u64));
            value /= ALPHABET_SIZE as u64;
        }

        encoded.iter().rev().collect()
    }

    /// Encode a non-negative integer, zero-padded to a fixed width.
    ///
    /// # Errors
    ///
    /// - Return [`Error::WidthExceeded`] if the value needs more symbols
    ///   than the requested width.
    pub fn encode_padded(&self, value: u64, width: usize) -> Result<String> {
        let encoded = self.encode(value);
        if encoded.len() > width {
            return Err(Error::WidthExceeded { value, width });
        }

        let padding = self
            .zero_symbol()
            .to_string()
            .repeat(width - encoded.len());
        Ok(format!("{padding}{encoded}"))
    }

    /// Decode a base-32 string back into its integer, case-insensitively.
    ///
    /// # Errors
    ///
    /// - Return [`Error::UnknownSymbol`] if any symbol is outside the
    ///   alphabet.
    /// - Return [`Error::Overflow`] if the value does not fit in 64 bits.
    pub fn decode(&self, code: impl AsRef<str>) -> Result<u64> {
        let code = code.as_ref();
        let mut value: u64 = 0;
        for symbol in code.chars() {
            let index = self.index_of(symbol)?;
            value = value
                .checked_mul(ALPHABET_SIZE as u64)
                .and_then(|value| value.checked_add(index))
                .ok_or_else(|| Error::Overflow(code.into()))?;
        }

        Ok(value)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.into(),
        }
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(symbols: &str) -> Result<Self> {
        Self::new(symbols)
    }
}

impl TryFrom<String> for Alphabet {
    type Error = Error;

    fn try_from(symbols: String) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols
    }
}

impl Display for Alphabet {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

/// Render a non-negative integer as a zero-padded bit string.
///
/// # Errors
///
/// - Return [`Error::UnsupportedBitWidth`] if width is zero or above 64.
/// - Return [`Error::BitWidthExceeded`] if the value needs more bits than
///   the requested width.
pub fn to_bit_string(value: u64, width: usize) -> Result<String> {
    if width == 0 || width > u64::BITS as usize {
        return Err(Error::UnsupportedBitWidth(width));
    }

    if width < u64::BITS as usize && value >> width != 0 {
        return Err(Error::BitWidthExceeded { value, width });
    }

    Ok(format!("{value:0width$b}"))
}

/// Parse a bit string back into its integer.
///
/// # Errors
///
/// - Return [`Error::EmptyBits`] if the string holds no digits.
/// - Return [`Error::InvalidBit`] if a character is not "0" or "1".
/// - Return [`Error::Overflow`] if the string is wider than 64 bits.
pub fn from_bit_string(bits: impl AsRef<str>) -> Result<u64> {
    let bits = bits.as_ref();
    if bits.is_empty() {
        return Err(Error::EmptyBits);
    }

    if bits.len() > u64::BITS as usize {
        return Err(Error::Overflow(bits.into()));
    }

    let mut value: u64 = 0;
    for bit in bits.chars() {
        value <<= 1;
        match bit {
            '0' => {}
            '1' => value |= 1,
            _ => return Err(Error::InvalidBit(bit)),
        }
    }

    Ok(value)
}

/// Base-32 codec error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Alphabet does not hold exactly 32 symbols.
    #[error("alphabet must contain exactly {n} symbols, got {0}", n = ALPHABET_SIZE)]
    WrongAlphabetSize(usize),

    /// Alphabet symbol outside the allowed character set.
    #[error("alphabet symbol {0:?} is not a lowercase letter or digit")]
    ForbiddenAlphabetSymbol(char),

    /// Alphabet symbol used more than once.
    #[error("alphabet symbol {0:?} appears more than once")]
    DuplicateAlphabetSymbol(char),

    /// Symbol encountered during decoding that is not in the alphabet.
    #[error("symbol {0:?} is not part of the alphabet")]
    UnknownSymbol(char),

    /// Value needs more symbols than the requested padding width.
    #[error("value {value} does not fit in {width} symbols")]
    WidthExceeded { value: u64, width: usize },

    /// Value needs more bits than the requested bit width.
    #[error("value {value} does not fit in {width} bits")]
    BitWidthExceeded { value: u64, width: usize },

    /// Decoded value does not fit in 64 bits.
    #[error("{0:?} does not fit in 64 bits")]
    Overflow(String),

    /// Bit width outside the supported 1 to 64 range.
    #[error("bit width must be between 1 and 64, got {0}")]
    UnsupportedBitWidth(usize),

    /// Character in a bit string that is not a binary digit.
    #[error("expected binary digit, got {0:?}")]
    InvalidBit(char),

    /// Bit string with no digits at all.
    #[error("empty bit string")]
    EmptyBits,
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(0, "0"; "zero")]
    #[test_case(6, "6"; "single digit")]
    #[test_case(31, "z"; "last symbol")]
    #[test_case(32, "10"; "first rollover")]
    #[test_case(240, "7h"; "two symbols")]
    #[test_case(1048575, "zzzz"; "four symbol maximum")]
    #[test]
    fn encode_shortest_form(value: u64, expect: &str) {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.encode(value), expect);
    }

    #[test_case(1060, 4, "0114"; "padded")]
    #[test_case(29234652, 6, "0vw5fw"; "six wide")]
    #[test_case(0, 6, "000000"; "zero padded")]
    #[test]
    fn encode_padded_to_width(value: u64, width: usize, expect: &str) {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.encode_padded(value, width).unwrap(), expect);
    }

    #[test]
    fn encode_padded_rejects_narrow_width() {
        let alphabet = Alphabet::default();
        let result = alphabet.encode_padded(1048575, 3);
        assert_eq!(
            result,
            Err(Error::WidthExceeded {
                value: 1048575,
                width: 3
            })
        );
    }

    #[test]
    fn decode_round_trips() {
        let alphabet = Alphabet::default();
        for value in [0, 1, 31, 32, 1024, 203287, u64::from(u32::MAX)] {
            assert_eq!(alphabet.decode(alphabet.encode(value)).unwrap(), value);
        }
    }

    #[test]
    fn decode_ignores_case() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.decode("ZZZZ").unwrap(), 1048575);
        assert_eq!(alphabet.decode("ZzZz").unwrap(), 1048575);
        assert_eq!(alphabet.decode("0VW5FW").unwrap(), 29234652);
    }

    #[test_case('a'; "ambiguous a")]
    #[test_case('i'; "ambiguous i")]
    #[test_case('l'; "ambiguous l")]
    #[test_case('o'; "ambiguous o")]
    #[test_case('!'; "punctuation")]
    #[test]
    fn decode_rejects_unknown_symbol(symbol: char) {
        let alphabet = Alphabet::default();
        let result = alphabet.decode(format!("12{symbol}4"));
        assert_eq!(result, Err(Error::UnknownSymbol(symbol)));
    }

    #[test]
    fn decode_rejects_overflow() {
        let alphabet = Alphabet::default();
        // 14 symbols is 70 bits worth of payload.
        let result = alphabet.decode("zzzzzzzzzzzzzz");
        assert!(matches!(result, Err(Error::Overflow(_))));
    }

    #[test]
    fn alphabet_rejects_bad_symbol_sets() {
        assert_eq!(
            Alphabet::new("0123"),
            Err(Error::WrongAlphabetSize(4))
        );
        assert_eq!(
            Alphabet::new("A123456789bcdefghjkmnpqrstuvwxyz"),
            Err(Error::ForbiddenAlphabetSymbol('A'))
        );
        assert_eq!(
            Alphabet::new("0023456789bcdefghjkmnpqrstuvwxyz"),
            Err(Error::DuplicateAlphabetSymbol('0'))
        );
    }

    #[test_case(5, 3, "101"; "exact width")]
    #[test_case(5, 8, "00000101"; "padded width")]
    #[test_case(0, 1, "0"; "zero single bit")]
    #[test]
    fn bit_string_rendering(value: u64, width: usize, expect: &str) {
        assert_eq!(to_bit_string(value, width).unwrap(), expect);
    }

    #[test]
    fn bit_string_rejects_bad_widths() {
        assert_eq!(to_bit_string(1, 0), Err(Error::UnsupportedBitWidth(0)));
        assert_eq!(to_bit_string(1, 65), Err(Error::UnsupportedBitWidth(65)));
        assert_eq!(
            to_bit_string(4, 2),
            Err(Error::BitWidthExceeded { value: 4, width: 2 })
        );
    }

    #[test]
    fn bit_string_round_trips() {
        for (value, width) in [(0, 1), (1, 1), (203287, 19), (u64::MAX, 64)] {
            let bits = to_bit_string(value, width).unwrap();
            assert_eq!(bits.len(), width);
            assert_eq!(from_bit_string(bits).unwrap(), value);
        }
    }

    #[test]
    fn bit_string_parsing_rejects_junk() {
        assert_eq!(from_bit_string(""), Err(Error::EmptyBits));
        assert_eq!(from_bit_string("0120"), Err(Error::InvalidBit('2')));
        assert!(matches!(
            from_bit_string("1".repeat(65)),
            Err(Error::Overflow(_))
        ));
    }

    #[test]
    fn alphabet_serde_round_trip() {
        #[derive(Debug, PartialEq, Deserialize, Serialize)]
        struct Wrapper {
            alphabet: Alphabet,
        }

        let wrapper = Wrapper {
            alphabet: Alphabet::default(),
        };
        let serialized = toml::ser::to_string(&wrapper).unwrap();
        assert_eq!(
            serialized,
            format!("alphabet = \"{DEFAULT_SYMBOLS}\"\n")
        );

        let deserialized: Wrapper = toml::de::from_str(&serialized).unwrap();
        assert_eq!(deserialized, wrapper);
    }
}
