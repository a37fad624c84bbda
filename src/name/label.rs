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

//! Implementation of the [`Label`] type.

use std::convert::TryFrom;
use std::fmt;

use arrayvec::ArrayVec;

use super::{Error, MAX_LABEL_LEN};

////////////////////////////////////////////////////////////////////////
// LABELS                                                             //
////////////////////////////////////////////////////////////////////////

/// One label of a domain name.
///
/// A `Label` holds between 1 and 63 arbitrary octets. The zero-length
/// label only ever appears on the wire as the terminator of a name, so
/// it is never stored. Case is preserved and comparisons are exact;
/// use [`Label::eq_ignore_ascii_case`] for the case-insensitive
/// comparison of [RFC 4343].
///
/// `Label` implements [`TryFrom`] for `&[u8]` and `&str`:
///
/// ```
/// use std::convert::TryFrom;
/// use dnsmsg::name::Label;
///
/// let label = Label::try_from("example").unwrap();
/// assert_eq!(label.octets(), b"example");
/// assert!(Label::try_from(&b""[..]).is_err());
/// ```
///
/// [RFC 4343]: https://datatracker.ietf.org/doc/html/rfc4343
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Label {
    octets: ArrayVec<u8, MAX_LABEL_LEN>,
}

#[allow(clippy::len_without_is_empty)] // A label is never empty!
impl Label {
    /// Wraps up `octets` as a `Label` without checking its length. To
    /// be used only within the parent module, and only after checking
    /// that `octets` is between 1 and 63 octets long.
    pub(super) fn from_unchecked(octets: &[u8]) -> Self {
        let mut buf = ArrayVec::new();
        buf.extend(octets.iter().copied());
        Self { octets: buf }
    }

    /// Compares two labels, ignoring ASCII case.
    pub fn eq_ignore_ascii_case(&self, other: &Self) -> bool {
        self.octets().eq_ignore_ascii_case(other.octets())
    }

    /// Returns the number of octets in this `Label`.
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    /// Returns the octets of this `Label`.
    pub fn octets(&self) -> &[u8] {
        &self.octets
    }
}

impl TryFrom<&[u8]> for Label {
    type Error = Error;

    fn try_from(octets: &[u8]) -> Result<Self, Self::Error> {
        if octets.is_empty() {
            Err(Error::NullLabel)
        } else if octets.len() > MAX_LABEL_LEN {
            Err(Error::LabelTooLong)
        } else {
            Ok(Self::from_unchecked(octets))
        }
    }
}

impl TryFrom<&str> for Label {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::try_from(text.as_bytes())
    }
}

impl AsRef<[u8]> for Label {
    fn as_ref(&self) -> &[u8] {
        self.octets()
    }
}

/// When a `Label` is displayed, periods, backslashes, and octets that
/// are not ASCII graphic characters are escaped in accordance with
/// RFC 1035 § 5.1 and RFC 4343 § 2.1.
/// * Periods are escaped `\.`;
/// * backslashes are escaped `\\`;
/// * all other ASCII graphic characters are not escaped; and
/// * all other octets are escaped `\xyz`, where `xyz` is the
///   three-digit zero-padded decimal representation of the octet.
impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for octet in self.octets() {
            if *octet == b'.' {
                f.write_str("\\.")?;
            } else if *octet == b'\\' {
                f.write_str("\\\\")?;
            } else if octet.is_ascii_graphic() {
                write!(f, "{}", *octet as char)?;
            } else {
                write!(f, "\\{:03}", *octet)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_enforces_length_bounds() {
        assert_eq!(Label::try_from(&b""[..]), Err(Error::NullLabel));
        assert_eq!(Label::try_from(&[b'x'; 64][..]), Err(Error::LabelTooLong));
        assert_eq!(Label::try_from(&[b'x'; 63][..]).unwrap().len(), 63);
    }

    #[test]
    fn comparison_preserves_case() {
        let lower = Label::try_from("blog").unwrap();
        let upper = Label::try_from("BLOG").unwrap();
        assert_ne!(lower, upper);
        assert!(lower.eq_ignore_ascii_case(&upper));
    }

    #[test]
    fn display_escapes_special_octets() {
        let label = Label::try_from(&b"a.b\\c\x07 "[..]).unwrap();
        assert_eq!(label.to_string(), "a\\.b\\\\c\\007\\032");
    }
}
