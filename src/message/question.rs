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

//! Implementation of the [`Question`] type.

use std::fmt;

use super::{Cursor, Result};
use crate::class::Class;
use crate::name::Name;
use crate::rr::Type;

/// The question of a DNS query.
///
/// Defined in [RFC 1035 § 4.1.2], a DNS question includes
///
/// * the QNAME, which is the domain name whose records are being
///   queried;
/// * the QTYPE, which specifies what types of records are desired; and
/// * the QCLASS, which specifies which DNS class(es) to search.
///
/// QTYPE values are a superset of TYPE values and QCLASS values are a
/// superset of CLASS values, so [`Type`] and [`Class`] are used for
/// both.
///
/// [RFC 1035 § 4.1.2]: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Question {
    pub qname: Name,
    pub qtype: Type,
    pub qclass: Class,
}

impl Question {
    /// Reads a question at the cursor. On failure the cursor is left
    /// where it was.
    pub fn read(cursor: &mut Cursor) -> Result<Self> {
        cursor.atomically(|cursor| {
            let qname = cursor.read_name()?;
            let qtype = Type::from(cursor.read_u16()?);
            let qclass = Class::from(cursor.read_u16()?);
            Ok(Self {
                qname,
                qtype,
                qclass,
            })
        })
    }

    /// Writes the question without name compression.
    pub fn write(&self, buf: &mut Vec<u8>) {
        self.qname.write_uncompressed(buf);
        buf.extend_from_slice(&u16::from(self.qtype).to_be_bytes());
        buf.extend_from_slice(&u16::from(self.qclass).to_be_bytes());
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ";{}\t\t{}\t{}", self.qname, self.qclass, self.qtype)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////
