// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of data structures related to domain names.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use arrayvec::ArrayVec;

mod error;
mod label;
mod wire;
pub use error::Error;
pub use label::Label;

/// The maximum length of a label in a domain name (not including the
/// octet that provides the length).
pub const MAX_LABEL_LEN: usize = 63;

/// The maximum length of the uncompressed on-the-wire representation of
/// a domain name.
pub const MAX_WIRE_LEN: usize = 255;

/// The maximum number of compression pointers followed while reading a
/// single name.
pub const MAX_POINTER_HOPS: usize = 128;

////////////////////////////////////////////////////////////////////////
// NAME STRUCTURE                                                     //
////////////////////////////////////////////////////////////////////////

/// A domain name.
///
/// A `Name` is an ordered sequence of [`Label`]s, in the same
/// left-to-right order in which they appear on the wire. The terminating
/// zero-length label is implied and never stored, so the DNS root `.`
/// is the `Name` with no labels.
///
/// `Name`s can be constructed
///
/// * through the [`FromStr`] implementation;
/// * from a sequence of labels through [`Name::from_labels`]; and
/// * from (possibly compressed) on-the-wire names through
///   [`Name::try_from_compressed`] or
///   [`Cursor::read_name`](crate::message::Cursor::read_name).
///
/// Every constructor checks that the uncompressed on-the-wire
/// representation is no longer than 255 octets, so encoding a `Name`
/// ([`Name::write_uncompressed`]) cannot fail.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct Name {
    labels: Vec<Label>,
}

#[allow(clippy::len_without_is_empty)] // We have is_root().
impl Name {
    /// Returns the DNS root `.`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a `Name` from raw labels, given from left to right.
    pub fn from_labels<I, L>(labels: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut wire_len = 1;
        let mut built = Vec::new();
        for label in labels {
            let label = Label::try_from(label.as_ref())?;
            wire_len += label.len() + 1;
            if wire_len > MAX_WIRE_LEN {
                return Err(Error::NameTooLong);
            }
            built.push(label);
        }
        Ok(Self { labels: built })
    }

    /// Returns whether the `Name` is the DNS root `.`.
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the labels of this `Name`, from left to right.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the number of (non-null) labels in this `Name`.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Compares two names, ignoring ASCII case.
    pub fn eq_ignore_ascii_case(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Returns the length of the uncompressed on-the-wire
    /// representation of this `Name`, including the terminating null
    /// label.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Tries to read a compressed name present at index `start` of the
    /// provided buffer. Pointers are followed; offsets given in
    /// pointers are treated as indices into `octets` (so generally one
    /// will pass an entire DNS message in `octets`). Two things are
    /// returned on success:
    ///
    /// * the decoded `Name`; and
    /// * the number of contiguous octets read at `start`, i.e. the
    ///   number of octets to skip to reach the next field. If the name
    ///   is a lone pointer, this is 2.
    pub fn try_from_compressed(octets: &[u8], start: usize) -> Result<(Self, usize), Error> {
        wire::parse_compressed_name(octets, start)
    }

    /// Appends the uncompressed on-the-wire representation of this
    /// `Name` to `buf`.
    pub fn write_uncompressed(&self, buf: &mut Vec<u8>) {
        for label in &self.labels {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.octets());
        }
        buf.push(0);
    }

    /// Returns the uncompressed on-the-wire representation of this
    /// `Name`.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_len());
        self.write_uncompressed(&mut buf);
        buf
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            f.write_str(".")
        } else {
            for label in &self.labels {
                write!(f, "{}.", label)?;
            }
            Ok(())
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

////////////////////////////////////////////////////////////////////////
// NAME PARSING FROM STRINGS                                          //
////////////////////////////////////////////////////////////////////////

/// Parses a textual domain name. The trailing dot is optional (names
/// are always treated as fully qualified), `.` alone is the root, and
/// the escapes `\X` and `\DDD` of RFC 1035 § 5.1 are understood.
impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::StrEmpty);
        } else if s == "." {
            return Ok(Self::root());
        }

        let mut remaining_octets: &[u8] = s.as_ref();
        let mut labels = Vec::new();
        let mut current = ArrayVec::<u8, MAX_LABEL_LEN>::new();

        // NOTE: to check that the string is ASCII, it suffices to check
        // that each octet is ASCII as we go. This is because all
        // multi-byte characters start with an octet that is not ASCII.
        while let Some(&octet) = remaining_octets.first() {
            if octet == b'\\' {
                let (value, consumed) = parse_escape(&remaining_octets[1..])?;
                current.try_push(value).or(Err(Error::LabelTooLong))?;
                remaining_octets = &remaining_octets[consumed + 1..];
            } else if octet == b'.' {
                labels.push(Label::try_from(current.as_slice())?);
                current.clear();
                remaining_octets = &remaining_octets[1..];
            } else if !octet.is_ascii() {
                return Err(Error::StrNotAscii);
            } else {
                current.try_push(octet).or(Err(Error::LabelTooLong))?;
                remaining_octets = &remaining_octets[1..];
            }
        }
        if !current.is_empty() {
            labels.push(Label::try_from(current.as_slice())?);
        }
        Self::from_labels(labels)
    }
}

/// Parses an escape sequence. We expect `remaining_octets` to start
/// with the octet immediately *after* the backslash that introduces the
/// escape sequence.
fn parse_escape(remaining_octets: &[u8]) -> Result<(u8, usize), Error> {
    if remaining_octets.is_empty() {
        Err(Error::InvalidEscape)
    } else if remaining_octets[0].is_ascii_digit() {
        if remaining_octets.len() < 3
            || !remaining_octets[1].is_ascii_digit()
            || !remaining_octets[2].is_ascii_digit()
        {
            Err(Error::InvalidEscape)
        } else {
            let hundreds = (remaining_octets[0] - b'0') as usize;
            let tens = (remaining_octets[1] - b'0') as usize;
            let ones = (remaining_octets[2] - b'0') as usize;
            let value = 100 * hundreds + 10 * tens + ones;
            if value > 255 {
                Err(Error::InvalidEscape)
            } else {
                Ok((value as u8, 3))
            }
        }
    } else if remaining_octets[0].is_ascii() {
        Ok((remaining_octets[0], 1))
    } else {
        Err(Error::StrNotAscii)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
