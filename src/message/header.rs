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

//! Implementation of the [`Header`] type and its codec.

use super::constants::*;
use super::error::{Error, Result};
use super::{Cursor, Opcode, Rcode};

////////////////////////////////////////////////////////////////////////
// HEADER                                                             //
////////////////////////////////////////////////////////////////////////

/// The fixed twelve-octet header of a DNS message.
///
/// [RFC 1035 § 4.1.1] lays the header out as the ID, a sixteen-bit
/// flags field, and four sixteen-bit section counts. The flags field is
/// packed, from the most significant bit down, as QR (1 bit), OPCODE
/// (4), AA (1), TC (1), RD (1), RA (1), Z (3), and RCODE (4).
///
/// Decoding and encoding are exact inverses. Encoding does not validate
/// or canonicalize anything: an [`Opcode::Reserved`] or
/// [`Rcode::Reserved`] value wider than four bits, or a `z` wider than
/// three, is truncated to its field width. Keeping values in range is
/// the caller's responsibility.
///
/// The counts state how many entries of each section follow the header.
/// [`Header::read`] does not check them against the length of the
/// message; that happens when the sections are read.
///
/// [RFC 1035 § 4.1.1]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Header {
    /// The transaction ID that correlates a response with its query.
    pub id: u16,

    /// True for a query. This is the *inverse* of the QR bit, which is
    /// set for responses.
    pub is_query: bool,

    pub opcode: Opcode,

    /// Authoritative answer.
    pub aa: bool,

    /// Truncation.
    pub tc: bool,

    /// Recursion desired.
    pub rd: bool,

    /// Recursion available.
    pub ra: bool,

    /// The three reserved Z bits, preserved as received.
    pub z: u8,

    pub rcode: Rcode,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    /// Returns the header of a response to a message with this header:
    /// the ID, opcode, and RD bit are echoed and everything else is
    /// cleared.
    pub fn response(&self) -> Self {
        Self {
            id: self.id,
            is_query: false,
            opcode: self.opcode,
            rd: self.rd,
            ..Self::default()
        }
    }

    /// Reads a header at the cursor. This fails with
    /// [`Error::HeaderTooShort`], without moving the cursor, if fewer
    /// than twelve octets remain.
    pub fn read(cursor: &mut Cursor) -> Result<Self> {
        if cursor.remaining() < HEADER_SIZE {
            return Err(Error::HeaderTooShort);
        }
        let id = cursor.read_u16()?;
        let flags = cursor.read_u16()?;
        Ok(Self {
            id,
            is_query: flags & QR_MASK == 0,
            opcode: Opcode::from_flags(flags),
            aa: flags & AA_MASK != 0,
            tc: flags & TC_MASK != 0,
            rd: flags & RD_MASK != 0,
            ra: flags & RA_MASK != 0,
            z: ((flags & Z_MASK) >> Z_SHIFT) as u8,
            rcode: Rcode::from_flags(flags),
            qdcount: cursor.read_u16()?,
            ancount: cursor.read_u16()?,
            nscount: cursor.read_u16()?,
            arcount: cursor.read_u16()?,
        })
    }

    /// Packs the flags field.
    fn flags(&self) -> u16 {
        let mut flags = self.opcode.to_flags() | self.rcode.to_flags();
        flags |= (u16::from(self.z) << Z_SHIFT) & Z_MASK;
        for (bit, mask) in [
            (!self.is_query, QR_MASK),
            (self.aa, AA_MASK),
            (self.tc, TC_MASK),
            (self.rd, RD_MASK),
            (self.ra, RA_MASK),
        ] {
            if bit {
                flags |= mask;
            }
        }
        flags
    }

    /// Returns the on-the-wire representation of the header.
    pub fn to_wire(&self) -> [u8; HEADER_SIZE] {
        let mut octets = [0; HEADER_SIZE];
        let fields = [
            self.id,
            self.flags(),
            self.qdcount,
            self.ancount,
            self.nscount,
            self.arcount,
        ];
        for (chunk, field) in octets.chunks_exact_mut(2).zip(fields) {
            chunk.copy_from_slice(&field.to_be_bytes());
        }
        octets
    }

    /// Appends the on-the-wire representation of the header to `buf`.
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_wire());
    }
}

/// The default header is that of an empty standard query with ID 0.
impl Default for Header {
    fn default() -> Self {
        Self {
            id: 0,
            is_query: true,
            opcode: Opcode::Query,
            aa: false,
            tc: false,
            rd: false,
            ra: false,
            z: 0,
            rcode: Rcode::NoError,
            qdcount: 0,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(octets: &[u8]) -> Result<Header> {
        Header::read(&mut Cursor::new(octets))
    }

    #[test]
    fn decodes_plain_query() {
        let header = decode(b"\x00\x01\x00\x00\x00\x01\x00\x02\x00\x03\x00\x04").unwrap();
        assert_eq!(
            header,
            Header {
                id: 1,
                qdcount: 1,
                ancount: 2,
                nscount: 3,
                arcount: 4,
                ..Header::default()
            }
        );
    }

    #[test]
    fn decodes_flag_bits() {
        // QR, OPCODE 1 (IQUERY), RCODE 1 (FORMERR).
        let header = decode(b"\x00\x01\x88\x01\x00\x02\x00\x03\x00\x04\x00\x05").unwrap();
        assert!(!header.is_query);
        assert_eq!(header.opcode, Opcode::IQuery);
        assert_eq!(header.rcode, Rcode::FormErr);
        assert_eq!(header.qdcount, 2);
        assert_eq!(header.arcount, 5);

        // QR, OPCODE 2 (STATUS), and every rcode in turn.
        for (raw, rcode) in [
            (2, Rcode::ServFail),
            (3, Rcode::NxDomain),
            (4, Rcode::NotImp),
            (5, Rcode::Refused),
        ] {
            let mut octets = *b"\x00\x01\x90\x00\x00\x02\x00\x03\x00\x04\x00\x05";
            octets[3] = raw;
            let header = decode(&octets).unwrap();
            assert_eq!(header.opcode, Opcode::Status);
            assert_eq!(header.rcode, rcode);
        }

        // AA, TC, RD, RA individually.
        let header = decode(b"\x00\x00\x07\x80\x00\x00\x00\x00\x00\x00\x00\x00").unwrap();
        assert!(header.is_query && header.aa && header.tc && header.rd && header.ra);
    }

    #[test]
    fn encodes_status_refused_response() {
        let header = Header {
            id: 1,
            is_query: false,
            opcode: Opcode::Status,
            rcode: Rcode::Refused,
            qdcount: 2,
            ancount: 3,
            nscount: 4,
            arcount: 5,
            ..Header::default()
        };
        let wire = header.to_wire();
        assert_eq!(&wire, b"\x00\x01\x90\x05\x00\x02\x00\x03\x00\x04\x00\x05");
        assert_eq!(decode(&wire), Ok(header));
    }

    #[test]
    fn round_trips_every_flag() {
        let header = Header {
            id: 0xbeef,
            is_query: false,
            opcode: Opcode::Reserved(15),
            aa: true,
            tc: true,
            rd: true,
            ra: true,
            z: 0b101,
            rcode: Rcode::Reserved(15),
            qdcount: 0xffff,
            ancount: 1,
            nscount: 0,
            arcount: 0x1234,
        };
        let mut buf = Vec::new();
        header.write(&mut buf);
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(decode(&buf), Ok(header));
    }

    #[test]
    fn reserved_z_bits_are_preserved() {
        let header = decode(b"\x00\x00\x00\x70\x00\x00\x00\x00\x00\x00\x00\x00").unwrap();
        assert_eq!(header.z, 0b111);
        assert_eq!(header.rcode, Rcode::NoError);
        assert_eq!(header.to_wire()[3], 0x70);
    }

    #[test]
    fn encoding_truncates_wide_fields() {
        let header = Header {
            z: 0xff,
            rcode: Rcode::Reserved(0x1f),
            ..Header::default()
        };
        assert_eq!(&header.to_wire()[2..4], b"\x00\x7f");
    }

    #[test]
    fn rejects_short_header() {
        for size in 0..HEADER_SIZE {
            let buf = vec![0; size];
            let mut cursor = Cursor::new(&buf);
            assert_eq!(Header::read(&mut cursor), Err(Error::HeaderTooShort));
            assert_eq!(cursor.position(), 0);
        }
    }

    #[test]
    fn response_echoes_id_opcode_and_rd() {
        let query = Header {
            id: 77,
            opcode: Opcode::IQuery,
            rd: true,
            aa: true,
            qdcount: 1,
            ..Header::default()
        };
        let response = query.response();
        assert_eq!(response.id, 77);
        assert!(!response.is_query);
        assert_eq!(response.opcode, Opcode::IQuery);
        assert!(response.rd);
        assert!(!response.aa);
        assert_eq!(response.qdcount, 0);
    }
}
