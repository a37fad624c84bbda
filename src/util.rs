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

//! Crate-private utilities.

use std::fmt::{self, Write};

/// A wrapper around [`str`] references whose [`PartialEq`] and [`Eq`]
/// implementations are ASCII-case-insensitive.
pub struct Caseless<'a>(pub &'a str);

impl PartialEq for Caseless<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(other.0)
    }
}

impl Eq for Caseless<'_> {}

/// Parses the numeric suffix of an RFC 3597 generic mnemonic such as
/// `TYPE65280` or `CLASS255`. Returns `None` if `text` does not start
/// with `prefix` (compared case-insensitively).
pub fn parse_generic_mnemonic(
    text: &str,
    prefix: &str,
) -> Option<Result<u16, std::num::ParseIntError>> {
    text.get(0..prefix.len())
        .filter(|p| p.eq_ignore_ascii_case(prefix))
        .map(|_| text[prefix.len()..].parse::<u16>())
}

/// Converts a nibble into an ASCII hex character. Lower-case hex digits
/// are used. The passed value must be less than 16.
fn nibble_to_ascii_hex_digit(nibble: u8) -> char {
    debug_assert!(nibble < 16);
    if nibble < 10 {
        char::from(b'0' + nibble)
    } else {
        char::from(b'a' + nibble - 10)
    }
}

/// Writes `octets` in lower-case hexadecimal, two digits per octet.
pub fn write_hex(f: &mut fmt::Formatter, octets: &[u8]) -> fmt::Result {
    for octet in octets {
        f.write_char(nibble_to_ascii_hex_digit(octet >> 4))?;
        f.write_char(nibble_to_ascii_hex_digit(octet & 0xf))?;
    }
    Ok(())
}
