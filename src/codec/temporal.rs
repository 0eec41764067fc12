// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Temporal encoder.
//!
//! Elapsed wall-clock time is represented as whole hours since a fixed
//! reference instant, truncated toward zero and zero-padded to six base-32
//! symbols. Truncation means every identifier generated inside the same hour
//! window shares the same temporal code. That collision is intentional: the
//! leading symbols of nearby identifiers stay visually stable, which matters
//! more here than strict uniqueness.
//!
//! Instants earlier than the epoch are rejected rather than clamped or
//! encoded with a sign, keeping the six-symbol layout unambiguous.

use crate::codec::base32::{self, Alphabet};

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Symbol width of every temporal code.
pub const TEMPORAL_WIDTH: usize = 6;

const MILLISECONDS_PER_HOUR: i64 = 3_600_000;

/// Default reference instant that elapsed hours are measured from.
pub fn default_epoch() -> NaiveDateTime {
    // INVARIANT: Literal date is always valid.
    NaiveDate::from_ymd_opt(1993, 2, 10)
        .and_then(|date| date.and_hms_opt(13, 12, 30))
        .unwrap_or_default()
}

/// Whole hours elapsed between epoch and target instant.
///
/// Truncates toward zero, so partial hours are discarded.
///
/// # Errors
///
/// - Return [`Error::BeforeEpoch`] if the target instant precedes the epoch.
pub fn hours_since(epoch: NaiveDateTime, now: NaiveDateTime) -> Result<u64> {
    let elapsed = (now - epoch).num_milliseconds();
    if elapsed < 0 {
        return Err(Error::BeforeEpoch { now, epoch });
    }

    Ok((elapsed / MILLISECONDS_PER_HOUR) as u64)
}

/// Encode elapsed hours into a six-symbol temporal code.
///
/// # Errors
///
/// - Return [`Error::Base32`] if the hour count does not fit six symbols.
pub fn encode(hours: u64, alphabet: &Alphabet) -> Result<String> {
    Ok(alphabet.encode_padded(hours, TEMPORAL_WIDTH)?)
}

/// Decode a temporal code back into elapsed hours.
///
/// # Errors
///
/// - Return [`Error::Base32`] if the code holds symbols outside the
///   alphabet.
pub fn decode(code: impl AsRef<str>, alphabet: &Alphabet) -> Result<u64> {
    Ok(alphabet.decode(code)?)
}

/// Reconstruct the approximate instant a temporal code was generated at.
///
/// Lands on the start of the encoded hour window.
pub fn approximate_instant(epoch: NaiveDateTime, hours: u64) -> NaiveDateTime {
    epoch + Duration::hours(hours as i64)
}

/// Temporal encoder error types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Target instant precedes the reference epoch.
    #[error("instant {now} precedes epoch {epoch}")]
    BeforeEpoch {
        now: NaiveDateTime,
        epoch: NaiveDateTime,
    },

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

    fn instant(text: &str) -> NaiveDateTime {
        text.parse().unwrap()
    }

    #[test_case("1993-02-10T19:12:30", 6; "exactly six hours")]
    #[test_case("1993-02-10T19:42:30", 6; "partial hour truncates")]
    #[test_case("1993-02-10T13:12:30", 0; "epoch itself")]
    #[test_case("2026-05-01T00:00:00", 291178; "decades later")]
    #[test]
    fn hours_since_epoch(now: &str, expect: u64) {
        let result = hours_since(default_epoch(), instant(now)).unwrap();
        assert_eq!(result, expect);
    }

    #[test]
    fn hours_since_rejects_instants_before_epoch() {
        let now = instant("1993-02-10T13:12:29");
        let result = hours_since(default_epoch(), now);
        assert_eq!(
            result,
            Err(Error::BeforeEpoch {
                now,
                epoch: default_epoch()
            })
        );
    }

    #[test_case(6, "000006"; "small count zero padded")]
    #[test_case(291178, "008wcb"; "large count")]
    #[test_case(0, "000000"; "zero hours")]
    #[test]
    fn encode_six_symbols(hours: u64, expect: &str) {
        let alphabet = Alphabet::default();
        assert_eq!(encode(hours, &alphabet).unwrap(), expect);
    }

    #[test]
    fn encode_decode_round_trips() {
        let alphabet = Alphabet::default();
        for hours in [0, 6, 291178, 32_u64.pow(6) - 1] {
            let code = encode(hours, &alphabet).unwrap();
            assert_eq!(code.len(), TEMPORAL_WIDTH);
            assert_eq!(decode(code, &alphabet).unwrap(), hours);
        }
    }

    #[test]
    fn encode_rejects_oversized_hour_counts() {
        let alphabet = Alphabet::default();
        let result = encode(32_u64.pow(6), &alphabet);
        assert!(matches!(
            result,
            Err(Error::Base32(base32::Error::WidthExceeded { .. }))
        ));
    }

    #[test]
    fn approximate_instant_lands_on_hour_window_start() {
        let hours = hours_since(default_epoch(), instant("1993-02-10T19:42:30")).unwrap();
        let result = approximate_instant(default_epoch(), hours);
        assert_eq!(result, instant("1993-02-10T19:12:30"));
    }
}
