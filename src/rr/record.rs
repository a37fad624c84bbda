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

//! Provides the [`ResourceRecord`] type.

use std::fmt;

use super::{Rdata, Ttl, Type};
use crate::class::Class;
use crate::message::{Cursor, EncodeError, Result};
use crate::name::Name;

/// A DNS resource record as found in the answer, authority, and
/// additional sections of a message.
///
/// RDLENGTH is not stored; it is derived from the [`Rdata`] when the
/// record is written.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ResourceRecord {
    pub owner: Name,
    pub rr_type: Type,
    pub class: Class,
    pub ttl: Ttl,
    pub rdata: Rdata,
}

impl ResourceRecord {
    /// Reads a record at the cursor. On failure the cursor is left
    /// where it was.
    pub fn read(cursor: &mut Cursor) -> Result<Self> {
        cursor.atomically(|cursor| {
            let owner = cursor.read_name()?;
            let rr_type = Type::from(cursor.read_u16()?);
            let class = Class::from(cursor.read_u16()?);
            let ttl = Ttl::from(cursor.read_u32()?);
            let rdlength = cursor.read_u16()?;
            let rdata = Rdata::read(rr_type, cursor, rdlength)?;
            Ok(Self {
                owner,
                rr_type,
                class,
                ttl,
                rdata,
            })
        })
    }

    /// Writes the record without name compression.
    pub fn write(&self, buf: &mut Vec<u8>) -> std::result::Result<(), EncodeError> {
        let start = buf.len();
        self.owner.write_uncompressed(buf);
        buf.extend_from_slice(&u16::from(self.rr_type).to_be_bytes());
        buf.extend_from_slice(&u16::from(self.class).to_be_bytes());
        buf.extend_from_slice(&u32::from(self.ttl).to_be_bytes());
        self.rdata.write(buf).map_err(|err| {
            buf.truncate(start);
            err
        })
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.owner,
            self.ttl,
            self.class,
            self.rr_type,
            self.rdata.display_as(self.rr_type),
        )
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Error;

    #[test]
    fn read_works() {
        let octets = b"\x07example\x00\x00\x01\x00\x01\x00\x00\x0e\x10\x00\x04\xc0\x00\x02\x01";
        let mut cursor = Cursor::new(octets);
        let record = ResourceRecord::read(&mut cursor).unwrap();
        assert_eq!(record.owner, "example.".parse::<Name>().unwrap());
        assert_eq!(record.rr_type, Type::A);
        assert_eq!(record.class, Class::IN);
        assert_eq!(record.ttl, Ttl::from(3600));
        assert_eq!(record.rdata.as_opaque(), Some(&b"\xc0\x00\x02\x01"[..]));
        assert!(cursor.at_eom());
        assert_eq!(record.to_string(), "example.\t3600\tIN\tA\t192.0.2.1");
    }

    #[test]
    fn read_is_atomic() {
        let octets = b"\x07example\x00\x00\x02\x00\x01\x00\x00\x0e\x10\x00\x05\x00";
        let mut cursor = Cursor::new(octets);
        assert_eq!(ResourceRecord::read(&mut cursor), Err(Error::UnexpectedEom));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn write_works() {
        let record = ResourceRecord {
            owner: "example.".parse().unwrap(),
            rr_type: Type::from(0xff00),
            class: Class::CH,
            ttl: Ttl::from(u32::MAX),
            rdata: Rdata::Opaque(b"\x01\x02"[..].into()),
        };
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        assert_eq!(
            buf,
            b"\x07example\x00\xff\x00\x00\x03\xff\xff\xff\xff\x00\x02\x01\x02"
        );
        assert_eq!(ResourceRecord::read(&mut Cursor::new(&buf)), Ok(record));
    }

    #[test]
    fn failed_write_leaves_buffer_unchanged() {
        let record = ResourceRecord {
            owner: Name::root(),
            rr_type: Type::TXT,
            class: Class::IN,
            ttl: Ttl::from(0),
            rdata: Rdata::Opaque(vec![0; 70000].into()),
        };
        let mut buf = vec![1, 2, 3];
        assert_eq!(record.write(&mut buf), Err(EncodeError::RdataTooLong));
        assert_eq!(buf, [1, 2, 3]);
    }
}
