// SPDX-FileCopyrightText: 2025 Galen Cuthbertson <g@galen.me>
// SPDX-License-Identifier: MIT

//! Geospatial codec.
//!
//! An invertible mapping between a coordinate pair and a fixed-length
//! base-32 string, equivalent to the classic Z-order geohash scheme.
//!
//! # Encoding
//!
//! Each axis starts from its full valid interval and is repeatedly bisected.
//! At every step the target value is tested against the midpoint: landing in
//! the upper half emits a 1 and narrows the interval upward, the lower half
//! emits a 0 and narrows downward. The emitted bit sequence is the binary
//! address of the smallest interval containing the point — a recursive
//! binary search whose branch choices are the output.
//!
//! A code of `L` symbols carries `5·L` bits, split between the two axes.
//! Longitude leads the interleave and therefore holds the extra bit whenever
//! `5·L` is odd, matching its naturally doubled range. Both bit sequences are
//! woven into a single word, which the base-32 codec renders zero-padded to
//! `L` symbols.
//!
//! # Decoding
//!
//! The reverse: decode the string to a word, split the word back into the
//! two bit sequences, and replay each bisection path. The reconstructed
//! coordinate is the centroid of the final narrowed cell, not necessarily
//! the original point; the error is bounded by half the cell width, which
//! shrinks geometrically with `L`.
//!
//! All bit work happens in one unsigned 64-bit word, which caps the code
//! length at twelve symbols. Twelve symbols resolve to tens of nanodegrees,
//! far below the precision of any supplied coordinate.

use crate::codec::base32::{self, Alphabet, BITS_PER_SYMBOL};

/// Symbol length used when no explicit length is requested.
pub const DEFAULT_LENGTH: usize = 12;

/// Longest supported code, bounded by the 64-bit interleave word.
pub const MAX_LENGTH: usize = 12;

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A validated geographic coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Construct new location from degree coordinates.
    ///
    /// # Errors
    ///
    /// - Return [`Error::LatitudeOutOfRange`] if latitude leaves [-90, 90].
    /// - Return [`Error::LongitudeOutOfRange`] if longitude leaves
    ///   [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&latitude) {
            return Err(Error::LatitudeOutOfRange(latitude));
        }

        if !(LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&longitude) {
            return Err(Error::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Encode a location into a fixed-length geocode.
///
/// # Errors
///
/// - Return [`Error::UnsupportedLength`] if length is zero or above
///   [`MAX_LENGTH`].
pub fn encode(location: Location, length: usize, alphabet: &Alphabet) -> Result<String> {
    let (longitude_bits, latitude_bits) = axis_widths(length)?;

    let longitude_path = bisection_path(
        location.longitude,
        LONGITUDE_RANGE,
        longitude_bits,
    );
    let latitude_path = bisection_path(location.latitude, LATITUDE_RANGE, latitude_bits);

    let woven = interleave(longitude_path, latitude_path, longitude_bits, latitude_bits);
    Ok(alphabet.encode_padded(woven, length)?)
}

/// Decode a geocode back into the centroid of its cell.
///
/// # Errors
///
/// - Return [`Error::UnsupportedLength`] if the code is empty or longer
///   than [`MAX_LENGTH`].
/// - Return [`Error::Base32`] if the code holds symbols outside the
///   alphabet.
pub fn decode(code: impl AsRef<str>, alphabet: &Alphabet) -> Result<Location> {
    let code = code.as_ref();
    let (longitude_bits, latitude_bits) = axis_widths(code.chars().count())?;

    let woven = alphabet.decode(code)?;
    let (longitude_path, latitude_path) =
        deinterleave(woven, longitude_bits, latitude_bits);

    let longitude = replay_bisection(longitude_path, LONGITUDE_RANGE, longitude_bits);
    let latitude = replay_bisection(latitude_path, LATITUDE_RANGE, latitude_bits);

    // INVARIANT: Centroids always land inside the valid axis ranges.
    Location::new(latitude, longitude)
}

/// Half cell widths at target code length, as (latitude, longitude) degrees.
///
/// A decoded centroid differs from the encoded point by at most these
/// bounds on each axis.
///
/// # Errors
///
/// - Return [`Error::UnsupportedLength`] if length is zero or above
///   [`MAX_LENGTH`].
pub fn cell_error(length: usize) -> Result<(f64, f64)> {
    let (longitude_bits, latitude_bits) = axis_widths(length)?;
    let latitude_error = (LATITUDE_RANGE.1 - LATITUDE_RANGE.0) / 2f64.powi(latitude_bits as i32 + 1);
    let longitude_error =
        (LONGITUDE_RANGE.1 - LONGITUDE_RANGE.0) / 2f64.powi(longitude_bits as i32 + 1);
    Ok((latitude_error, longitude_error))
}

/// Split the total bits between the axes, longitude first.
fn axis_widths(length: usize) -> Result<(u32, u32)> {
    if length == 0 || length > MAX_LENGTH {
        return Err(Error::UnsupportedLength(length));
    }

    let total = (length * BITS_PER_SYMBOL) as u32;
    Ok((total.div_ceil(2), total / 2))
}

/// Branch choices of a binary interval search narrowing onto the target.
fn bisection_path(target: f64, range: (f64, f64), bits: u32) -> u64 {
    let (mut low, mut high) = range;
    let mut path: u64 = 0;
    for _ in 0..bits {
        let midpoint = (low + high) / 2.0;
        path <<= 1;
        if target >= midpoint {
            path |= 1;
            low = midpoint;
        } else {
            high = midpoint;
        }
    }

    path
}

/// Replay a bisection path and land on the centroid of the final cell.
fn replay_bisection(path: u64, range: (f64, f64), bits: u32) -> f64 {
    let (mut low, mut high) = range;
    for index in (0..bits).rev() {
        let midpoint = (low + high) / 2.0;
        if (path >> index) & 1 == 1 {
            low = midpoint;
        } else {
            high = midpoint;
        }
    }

    (low + high) / 2.0
}

/// Weave two bisection paths into one word, longitude on even positions.
fn interleave(longitude: u64, latitude: u64, longitude_bits: u32, latitude_bits: u32) -> u64 {
    let mut woven: u64 = 0;
    let mut longitude_left = longitude_bits;
    let mut latitude_left = latitude_bits;
    for position in 0..longitude_bits + latitude_bits {
        woven <<= 1;
        if position % 2 == 0 {
            longitude_left -= 1;
            woven |= (longitude >> longitude_left) & 1;
        } else {
            latitude_left -= 1;
            woven |= (latitude >> latitude_left) & 1;
        }
    }

    woven
}

/// Split a woven word back into its two bisection paths.
fn deinterleave(woven: u64, longitude_bits: u32, latitude_bits: u32) -> (u64, u64) {
    let total = longitude_bits + latitude_bits;
    let mut longitude: u64 = 0;
    let mut latitude: u64 = 0;
    for position in 0..total {
        let bit = (woven >> (total - 1 - position)) & 1;
        if position % 2 == 0 {
            longitude = (longitude << 1) | bit;
        } else {
            latitude = (latitude << 1) | bit;
        }
    }

    (longitude, latitude)
}

/// Geospatial codec error types.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// Latitude outside [-90, 90] degrees.
    #[error("latitude {0} is outside [-90, 90] degrees")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("longitude {0} is outside [-180, 180] degrees")]
    LongitudeOutOfRange(f64),

    /// Code length outside the supported 1 to 12 symbol range.
    #[error("geocode length must be between 1 and {n} symbols, got {0}", n = MAX_LENGTH)]
    UnsupportedLength(usize),

    /// Base-32 conversion fails.
    #[error(transparent)]
    Base32(#[from] base32::Error),
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;
