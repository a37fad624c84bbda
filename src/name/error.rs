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

//! Provides the [`Error`] type for domain-name-related errors.

use std::fmt;

/// An error signaling that a domain name could not be decoded or
/// constructed.
///
/// The variants reached while reading a name from a message
/// ([`InvalidLabelType`](Error::InvalidLabelType),
/// [`InvalidPointer`](Error::InvalidPointer),
/// [`LabelTooLong`](Error::LabelTooLong),
/// [`NameTooLong`](Error::NameTooLong),
/// [`TooManyPointers`](Error::TooManyPointers), and
/// [`UnexpectedEom`](Error::UnexpectedEom)) all mean the message is
/// malformed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// An invalid escape sequence was encountered when parsing a
    /// [`Name`](super::Name) from a [`str`].
    InvalidEscape,

    /// A length octet used one of the reserved label types (its top
    /// two bits were `01` or `10`).
    InvalidLabelType,

    /// A compression pointer did not point strictly before the run of
    /// labels containing it.
    InvalidPointer,

    /// A label was longer than 63 octets.
    LabelTooLong,

    /// The name is too long (longer than 255 octets on the wire).
    NameTooLong,

    /// An empty label was found where a label of at least one octet is
    /// required.
    NullLabel,

    /// When parsing a [`Name`](super::Name) from a [`str`], the string
    /// was empty.
    StrEmpty,

    /// When parsing a [`Name`](super::Name) from a [`str`], the string
    /// was not strictly ASCII.
    StrNotAscii,

    /// More than [`MAX_POINTER_HOPS`](super::MAX_POINTER_HOPS)
    /// compression pointers were followed for a single name.
    TooManyPointers,

    /// We unexpectedly encountered the end of the message while reading
    /// the name.
    UnexpectedEom,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::InvalidEscape => f.write_str("invalid escape sequence"),
            Self::InvalidLabelType => f.write_str("reserved label type"),
            Self::InvalidPointer => f.write_str("invalid pointer"),
            Self::LabelTooLong => f.write_str("label is longer than 63 octets"),
            Self::NameTooLong => f.write_str("name is longer than 255 octets on the wire"),
            Self::NullLabel => f.write_str("empty label"),
            Self::StrEmpty => f.write_str("string was empty"),
            Self::StrNotAscii => f.write_str("string was not ASCII"),
            Self::TooManyPointers => f.write_str("too many compression pointers"),
            Self::UnexpectedEom => f.write_str("unexpected end of message"),
        }
    }
}

impl std::error::Error for Error {}
