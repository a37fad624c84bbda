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

//! Provides the [`Type`] structure for DNS RR types.

use std::fmt;
use std::str::FromStr;

use crate::util::{parse_generic_mnemonic, Caseless};

////////////////////////////////////////////////////////////////////////
// RR TYPES                                                           //
////////////////////////////////////////////////////////////////////////

/// Represents the TYPE of a DNS record, or the QTYPE of a question.
///
/// An RR type is represented on the wire as an unsigned 16-bit integer.
/// Hence this is basically a wrapper around `u16` with nice
/// [`Debug`](fmt::Debug), [`Display`](fmt::Display), and [`FromStr`]
/// implementations for working with the common textual representations
/// of RR types. In addition, constants for common RR types (e.g.
/// [`Type::A`]) are provided. Only [`Type::NS`] changes how a record's
/// data is decoded; see [`Rdata`](super::Rdata).
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Type(u16);

/// Defines the `Type` constants along with their mnemonics for the
/// [`FromStr`] and [`Display`](fmt::Display) implementations.
macro_rules! rr_types {
    ($($name:ident = $value:expr,)*) => {
        impl Type {
            $(pub const $name: Type = Type($value);)*
        }

        impl Type {
            /// Looks up a type by its mnemonic.
            fn from_mnemonic(text: &str) -> Option<Self> {
                $(
                    if Caseless(text) == Caseless(stringify!($name)) {
                        return Some(Self::$name);
                    }
                )*
                None
            }

            /// Returns the mnemonic of this type, if it has one.
            fn mnemonic(self) -> Option<&'static str> {
                match self {
                    $(Self::$name => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

rr_types! {
    // RFC 1035
    A = 1,
    NS = 2,
    MD = 3,
    MF = 4,
    CNAME = 5,
    SOA = 6,
    MB = 7,
    MG = 8,
    MR = 9,
    NULL = 10,
    WKS = 11,
    PTR = 12,
    HINFO = 13,
    MINFO = 14,
    MX = 15,
    TXT = 16,

    // RFC 3596
    AAAA = 28,

    // RFC 6891 (decoded as opaque data only)
    OPT = 41,

    // RFC 1035 QTYPEs
    AXFR = 252,
    MAILB = 253,
    MAILA = 254,
    ANY = 255,
}

impl From<u16> for Type {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Type> for u16 {
    fn from(rr_type: Type) -> Self {
        rr_type.0
    }
}

impl FromStr for Type {
    type Err = &'static str;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text == "*" {
            return Ok(Self::ANY);
        }
        match Self::from_mnemonic(text) {
            Some(rr_type) => Ok(rr_type),
            None => match parse_generic_mnemonic(text, "TYPE") {
                Some(Ok(value)) => Ok(Self(value)),
                Some(Err(_)) => Err("type value is not a valid unsigned 16-bit integer"),
                None => Err("unknown type"),
            },
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.mnemonic() {
            Some(mnemonic) => f.write_str(mnemonic),
            None => write!(f, "TYPE{}", self.0), // RFC 3597 § 5
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_displays_according_to_rfc3597() {
        // TYPE65280 is from the private use range, so it should always
        // be unknown.
        let rr_type = Type::from(0xff00);
        assert_eq!(rr_type.to_string(), "TYPE65280");
        assert_eq!(Type::MF.to_string(), "MF");
    }

    #[test]
    fn type_parses_mnemonics_and_rfc3597_form() {
        let type_a: Type = "TYPE1".parse().unwrap();
        let type_65280: Type = "TYPE65280".parse().unwrap();
        assert_eq!(type_a, Type::A);
        assert_eq!(u16::from(type_65280), 65280);
        assert_eq!("ns".parse::<Type>(), Ok(Type::NS));
        assert_eq!("*".parse::<Type>(), Ok(Type::ANY));
        assert!("BOGUS".parse::<Type>().is_err());
    }
}
