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

//! Provides the [`Rdata`] type for the data portion of DNS records.

use std::fmt;
use std::net::Ipv4Addr;

use super::Type;
use crate::message::{Cursor, EncodeError, Error, Result};
use crate::name::Name;
use crate::util::write_hex;

////////////////////////////////////////////////////////////////////////
// RDATA                                                              //
////////////////////////////////////////////////////////////////////////

/// The RDATA of a DNS record.
///
/// Only NS records have their RDATA interpreted: the target name may be
/// compressed on the wire, so it has to be decoded against the whole
/// message to be meaningful elsewhere. All other types are kept as the
/// raw RDATA octets.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Rdata {
    /// The name server named by an NS record.
    Ns(Name),

    /// Uninterpreted RDATA.
    Opaque(Box<[u8]>),
}

impl Rdata {
    /// Reads `rdlength` octets of RDATA for a record of type `rr_type`.
    ///
    /// The cursor must be positioned at the start of the RDATA. On
    /// success it is left just past the RDATA. RDLENGTH always decides
    /// where the RDATA ends; for NS records, the name must occupy
    /// exactly that many octets at the start of the RDATA, or
    /// [`Error::RdataLengthMismatch`] is returned.
    pub fn read(rr_type: Type, cursor: &mut Cursor, rdlength: u16) -> Result<Self> {
        cursor.atomically(|cursor| {
            let start = cursor.position();
            let rdlength = rdlength as usize;
            if rdlength > cursor.remaining() {
                return Err(Error::UnexpectedEom);
            }

            if rr_type == Type::NS {
                let name = cursor.read_name()?;
                if cursor.position() - start != rdlength {
                    return Err(Error::RdataLengthMismatch);
                }
                Ok(Self::Ns(name))
            } else {
                let octets = cursor.read_octets(rdlength)?;
                Ok(Self::Opaque(octets.into()))
            }
        })
    }

    /// Returns the length of the RDATA when written.
    pub fn wire_len(&self) -> usize {
        match self {
            Self::Ns(name) => name.wire_len(),
            Self::Opaque(octets) => octets.len(),
        }
    }

    /// Writes RDLENGTH followed by the RDATA. Names are written without
    /// compression.
    pub fn write(&self, buf: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        let rdlength = u16::try_from(self.wire_len()).map_err(|_| EncodeError::RdataTooLong)?;
        buf.extend_from_slice(&rdlength.to_be_bytes());
        match self {
            Self::Ns(name) => name.write_uncompressed(buf),
            Self::Opaque(octets) => buf.extend_from_slice(octets),
        }
        Ok(())
    }

    /// Returns the name server, if this is NS RDATA.
    pub fn as_ns(&self) -> Option<&Name> {
        match self {
            Self::Ns(name) => Some(name),
            Self::Opaque(_) => None,
        }
    }

    /// Returns the raw octets, if this is uninterpreted RDATA.
    pub fn as_opaque(&self) -> Option<&[u8]> {
        match self {
            Self::Ns(_) => None,
            Self::Opaque(octets) => Some(octets),
        }
    }

    /// Returns a [`Display`](fmt::Display) implementation that uses the
    /// textual form appropriate to `rr_type` where one is known.
    pub fn display_as(&self, rr_type: Type) -> impl fmt::Display + '_ {
        DisplayAs {
            rdata: self,
            rr_type,
        }
    }
}

/// Displays the RDATA in the generic form of [RFC 3597 § 5].
///
/// [RFC 3597 § 5]: https://datatracker.ietf.org/doc/html/rfc3597#section-5
impl fmt::Display for Rdata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ns(name) => write!(f, "{}", name),
            Self::Opaque(octets) => {
                write!(f, "\\# {}", octets.len())?;
                if !octets.is_empty() {
                    f.write_str(" ")?;
                    write_hex(f, octets)?;
                }
                Ok(())
            }
        }
    }
}

struct DisplayAs<'a> {
    rdata: &'a Rdata,
    rr_type: Type,
}

impl fmt::Display for DisplayAs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.rr_type, self.rdata) {
            (Type::A, Rdata::Opaque(octets)) => match <[u8; 4]>::try_from(&octets[..]) {
                Ok(address) => write!(f, "{}", Ipv4Addr::from(address)),
                Err(_) => write!(f, "{}", self.rdata),
            },
            _ => write!(f, "{}", self.rdata),
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
