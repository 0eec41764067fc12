// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Compact personal identifier codec.
//!
//! ppid packs a timestamp, a geographic coordinate, and the answers to a
//! fixed ten-topic questionnaire into one short, human-copyable identifier,
//! and decodes such identifiers back into approximate time and place. The
//! codec is pure and stateless: time and location are supplied by the
//! caller, nothing is persisted, and identical inputs always produce the
//! identical identifier.
//!
//! The heavy lifting lives in [`codec`]; [`config`] collects the few knobs
//! the generator exposes into one explicit struct.

pub mod codec;
pub mod config;
pub mod path;

pub use codec::{
    answers::{Answer, Topic, QUESTIONNAIRE_LEN, STANDARD_QUESTIONNAIRE},
    decode_answers, decode_approx, generate,
    geo::Location,
    validate, ApproxDecode, Ppid,
};
pub use config::GeneratorConfig;
