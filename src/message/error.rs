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

//! Error types for reading and writing DNS messages.

use std::fmt;

use crate::name;

////////////////////////////////////////////////////////////////////////
// DECODING ERRORS                                                    //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a DNS message could not be decoded.
///
/// Every variant means that the message is malformed. Whether such a
/// message is dropped, logged, or answered with
/// [`Rcode::FormErr`](super::Rcode::FormErr) is up to the caller.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    /// Fewer than twelve octets were available for the header.
    HeaderTooShort,

    /// The section counts in the header call for more entries than the
    /// rest of the message could possibly hold.
    CountExceedsMessage,

    /// The message ended before a field was complete.
    UnexpectedEom,

    /// A domain name (an owner, a QNAME, or a name in RDATA) could not
    /// be decoded.
    InvalidName(name::Error),

    /// The name in the RDATA of an NS record did not occupy exactly
    /// RDLENGTH octets.
    RdataLengthMismatch,
}

impl From<name::Error> for Error {
    fn from(err: name::Error) -> Self {
        Self::InvalidName(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::HeaderTooShort => f.write_str("header too short"),
            Self::CountExceedsMessage => {
                f.write_str("section counts exceed what the message can hold")
            }
            Self::UnexpectedEom => f.write_str("unexpected end of message in field"),
            Self::InvalidName(err) => write!(f, "invalid name: {}", err),
            Self::RdataLengthMismatch => f.write_str("RDATA does not match RDLENGTH"),
        }
    }
}

impl std::error::Error for Error {}

/// The type returned by fallible decoding functions.
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////
// ENCODING ERRORS                                                    //
////////////////////////////////////////////////////////////////////////

/// An error signaling that a DNS message could not be encoded.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EncodeError {
    /// A section held more than 65,535 entries.
    TooManyEntries,

    /// RDATA was longer than 65,535 octets.
    RdataTooLong,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::TooManyEntries => f.write_str("too many entries in a section"),
            Self::RdataTooLong => f.write_str("RDATA is longer than 65535 octets"),
        }
    }
}

impl std::error::Error for EncodeError {}
