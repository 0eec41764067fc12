// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Identifier assembly.
//!
//! A __PPID__ is a compact, human-copyable identifier that packs three
//! things into sixteen base-32 symbols: whole hours elapsed since a fixed
//! epoch, a coarse geographic cell, and the answers to a fixed ten-topic
//! questionnaire.
//!
//! # Layout
//!
//! The three sub-codes are spliced rather than concatenated. With the
//! temporal code `t0..t5`, the geocode `g0..g5`, and the answer code
//! `a0..a3`:
//!
//! ```text
//! t0 t1 t2 t3 · g0 g1 · a0 g2 a1 g3 a2 g4 a3 g5 · t4 t5
//! ```
//!
//! The sixteen symbols are then grouped four-by-four with a hyphen and
//! upper-cased. Front-loading the coarse temporal and location prefixes
//! makes identifiers generated close together in time and space start with
//! the same symbols, so a human skimming a list can cluster them by eye.
//! The interleaved middle carries the identity-specific answer data mixed
//! with fine location detail. None of this aims at cryptographic
//! unlinkability; the layout is tuned for skimmability.
//!
//! # All-or-nothing
//!
//! Assembly either yields a structurally valid identifier or an error.
//! A failed sub-encoding never produces a partial identifier.
//!
//! # See Also
//!
//! 1. [`temporal`] for the hour encoding and its intentional same-hour
//!    collisions.
//! 2. [`geo`] for the bisection scheme behind the geocode.
//! 3. [`answers`] for the questionnaire packing and its 19-bit contract.

pub mod answers;
pub mod base32;
pub mod geo;
pub mod temporal;

use crate::{
    codec::{answers::Answer, geo::Location},
    config::GeneratorConfig,
};

use chrono::NaiveDateTime;
use regex::Regex;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use tracing::{debug, instrument};

/// Meaningful symbols in every identifier.
pub const PPID_SYMBOLS: usize = 16;

/// Symbols per display group.
pub const GROUP_SIZE: usize = 4;

/// Separator between display groups.
pub const SEPARATOR: char = '-';

/// Geocode symbols consumed by the splice.
pub const GEOCODE_SYMBOLS: usize = 6;

/// Answer symbols consumed by the splice.
const ANSWER_SYMBOLS: usize = 4;

/// Structural shape of an identifier: four groups of four alphanumerics,
/// hyphen-separated or compact.
const SHAPE: &str = r"(?i)^([0-9a-z]{16}|[0-9a-z]{4}(?:-[0-9a-z]{4}){3})$";

/// An assembled identifier in canonical grouped, upper-case form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ppid(String);

impl Ppid {
    /// Treat identifier as its canonical string form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Separator-free, lower-case symbol run for decoding.
    fn compact(&self) -> String {
        self.0
            .chars()
            .filter(|symbol| *symbol != SEPARATOR)
            .map(|symbol| symbol.to_ascii_lowercase())
            .collect()
    }
}

impl Display for Ppid {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Ppid {
    type Err = Error;

    /// Parse an externally supplied candidate into canonical form.
    ///
    /// Accepts the grouped and the compact shape in any casing, and
    /// normalizes to grouped upper-case.
    ///
    /// # Errors
    ///
    /// - Return [`Error::Malformed`] if the candidate fails the structural
    ///   check.
    fn from_str(candidate: &str) -> Result<Self> {
        if !validate(candidate) {
            return Err(Error::Malformed(candidate.into()));
        }

        let compact: String = candidate
            .chars()
            .filter(|symbol| *symbol != SEPARATOR)
            .collect();
        Ok(Self(group(&compact)))
    }
}

/// Time and place recovered from an identifier.
///
/// Only approximate by construction: hours truncate, and the geocode names
/// a cell rather than a point. Full answer recovery additionally needs the
/// original choice sets, which travel out of band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxDecode {
    /// Whole hours between the epoch and generation time.
    pub hours_since_epoch: u64,

    /// Start of the hour window the identifier was generated in.
    pub approx_instant: NaiveDateTime,

    /// Centroid of the geographic cell the identifier was generated in.
    pub location: Location,
}

/// Assemble an identifier from its raw inputs.
///
/// # Errors
///
/// - Return [`Error::Answers`] if the answers violate the standard
///   questionnaire shape (ten answers, one two-option set, nine
///   four-option sets).
/// - Return [`Error::Temporal`] if the instant precedes the configured
///   epoch.
/// - Return [`Error::Geo`] if geocoding fails.
#[instrument(skip(answers, config), level = "debug")]
pub fn generate(
    now: NaiveDateTime,
    location: Location,
    answers: &[Answer],
    config: &GeneratorConfig,
) -> Result<Ppid> {
    answers::check_standard_shape(answers)?;

    let hours = temporal::hours_since(config.epoch, now)?;
    let temporal_code = temporal::encode(hours, &config.alphabet)?;
    let geocode = geo::encode(location, GEOCODE_SYMBOLS, &config.alphabet)?;
    let answer_code = answers::pack(answers, &config.alphabet)?;
    debug!("splice {temporal_code} + {geocode} + {answer_code}");

    let ppid = Ppid(group(&splice(&temporal_code, &geocode, &answer_code)));
    if !validate(ppid.as_str()) {
        return Err(Error::Malformed(ppid.0));
    }

    Ok(ppid)
}

/// Recover approximate time and place from a candidate identifier.
///
/// # Errors
///
/// - Return [`Error::Malformed`] if the candidate fails the structural
///   check.
/// - Return [`Error::Temporal`] or [`Error::Geo`] if a sub-code holds
///   symbols outside the configured alphabet.
#[instrument(skip(config), level = "debug")]
pub fn decode_approx(candidate: &str, config: &GeneratorConfig) -> Result<ApproxDecode> {
    let ppid: Ppid = candidate.parse()?;
    let compact = ppid.compact();
    let (temporal_code, geocode, _) = unsplice(&compact);

    let hours = temporal::decode(temporal_code, &config.alphabet)?;
    let location = geo::decode(geocode, &config.alphabet)?;

    Ok(ApproxDecode {
        hours_since_epoch: hours,
        approx_instant: temporal::approximate_instant(config.epoch, hours),
        location,
    })
}

/// Recover the questionnaire selections from a candidate identifier.
///
/// Needs the original ordered choice sets, supplied out of band.
///
/// # Errors
///
/// - Return [`Error::Malformed`] if the candidate fails the structural
///   check.
/// - Return [`Error::Answers`] if unpacking against the choice sets fails.
pub fn decode_answers(
    candidate: &str,
    choice_sets: &[impl AsRef<str>],
    config: &GeneratorConfig,
) -> Result<Vec<char>> {
    let ppid: Ppid = candidate.parse()?;
    let compact = ppid.compact();
    let (_, _, answer_code) = unsplice(&compact);

    Ok(answers::unpack(answer_code, choice_sets, &config.alphabet)?)
}

/// Structural check of a candidate identifier.
///
/// Purely syntactic: four groups of four alphanumeric characters, either
/// compact or hyphen-separated. Makes no attempt to decode.
pub fn validate(candidate: &str) -> bool {
    Regex::new(SHAPE)
        .map(|shape| shape.is_match(candidate))
        .unwrap_or(false)
}

/// Weave the three sub-codes into the sixteen-symbol run.
fn splice(temporal: &str, geocode: &str, answer: &str) -> String {
    let geocode_symbols = geocode.as_bytes();
    let answer_symbols = answer.as_bytes();

    let mut spliced = String::with_capacity(PPID_SYMBOLS);
    spliced.push_str(&temporal[..4]);
    spliced.push_str(&geocode[..2]);
    for position in 0..ANSWER_SYMBOLS {
        spliced.push(answer_symbols[position] as char);
        spliced.push(geocode_symbols[2 + position] as char);
    }
    spliced.push_str(&temporal[4..6]);

    spliced
}

/// Split a compact symbol run back into its three sub-codes.
fn unsplice(compact: &str) -> (String, String, String) {
    let symbols = compact.as_bytes();

    let temporal = format!("{}{}", &compact[0..4], &compact[14..16]);
    let mut geocode = String::from(&compact[4..6]);
    let mut answer = String::with_capacity(ANSWER_SYMBOLS);
    for position in 0..ANSWER_SYMBOLS {
        answer.push(symbols[6 + 2 * position] as char);
        geocode.push(symbols[7 + 2 * position] as char);
    }

    (temporal, geocode, answer)
}

/// Group a compact run four-by-four and upper-case it.
fn group(compact: &str) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
        &compact[0..4],
        &compact[4..8],
        &compact[8..12],
        &compact[12..16]
    )
    .to_uppercase()
}

/// Identifier assembly error types.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Candidate fails the structural shape check.
    #[error("{0:?} is not a structurally valid identifier")]
    Malformed(String),

    /// Temporal encoding fails.
    #[error(transparent)]
    Temporal(#[from] temporal::Error),

    /// Geospatial encoding fails.
    #[error(transparent)]
    Geo(#[from] geo::Error),

    /// Answer packing fails.
    #[error(transparent)]
    Answers(#[from] answers::Error),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
