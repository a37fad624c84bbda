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

//! Implementation of the [`Cursor`] type for reading on-the-wire DNS
//! messages.

use super::error::{Error, Result};
use crate::name::Name;

////////////////////////////////////////////////////////////////////////
// CURSOR                                                             //
////////////////////////////////////////////////////////////////////////

/// A sequential reader over the octets of a DNS message.
///
/// A `Cursor` borrows the whole message and keeps a read position into
/// it. Reads consume octets from the position onward and advance it;
/// every read that would run past the end of the message fails with
/// [`Error::UnexpectedEom`] and leaves the position untouched. Multi-byte
/// integers are read in network byte order.
///
/// Domain names are read with [`Cursor::read_name`], which may follow
/// compression pointers to anywhere earlier in the message. The position
/// afterward is just past the name as it appears at the original
/// position (i.e., just past the first pointer, if there is one).
///
/// A `Cursor` owns its position, so separate messages (or separate
/// passes over one message) can be read independently and in parallel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cursor<'a> {
    octets: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a `Cursor` positioned at the start of `octets`.
    pub fn new(octets: &'a [u8]) -> Self {
        Self {
            octets,
            position: 0,
        }
    }

    /// Returns the whole underlying message.
    pub fn octets(&self) -> &'a [u8] {
        self.octets
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the read position to `position`, which may be anywhere
    /// from the start to the end of the message inclusive.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.octets.len() {
            Err(Error::UnexpectedEom)
        } else {
            self.position = position;
            Ok(())
        }
    }

    /// Returns the number of octets left to read.
    pub fn remaining(&self) -> usize {
        self.octets.len() - self.position
    }

    /// Returns whether the `Cursor` has reached the end of the message.
    pub fn at_eom(&self) -> bool {
        self.position >= self.octets.len()
    }

    /// Runs `f`, restoring the read position if it fails. This makes a
    /// sequence of reads atomic.
    pub fn atomically<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = saved;
        }
        result
    }

    /// Reads `len` raw octets.
    pub fn read_octets(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(Error::UnexpectedEom)?;
        let octets = self
            .octets
            .get(self.position..end)
            .ok_or(Error::UnexpectedEom)?;
        self.position = end;
        Ok(octets)
    }

    /// Reads a fixed number of raw octets into an array.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_octets(N)?);
        Ok(array)
    }

    /// Reads a single octet.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array::<1>().map(|[octet]| octet)
    }

    /// Reads a network-byte-order `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Reads a network-byte-order `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Reads a possibly compressed domain name. On failure the position
    /// is not changed.
    pub fn read_name(&mut self) -> Result<Name> {
        let (name, len) = Name::try_from_compressed(self.octets, self.position)?;
        self.position += len;
        Ok(name)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name;

    #[test]
    fn reads_integers_in_network_byte_order() {
        let mut cursor = Cursor::new(b"\x01\x02\x03\x04\x05\x06\x07");
        assert_eq!(cursor.read_u8(), Ok(0x01));
        assert_eq!(cursor.read_u16(), Ok(0x0203));
        assert_eq!(cursor.read_u32(), Ok(0x04050607));
        assert!(cursor.at_eom());
    }

    #[test]
    fn reads_past_end_fail_without_advancing() {
        let mut cursor = Cursor::new(b"\x01\x02\x03");
        cursor.read_u8().unwrap();
        assert_eq!(cursor.read_u32(), Err(Error::UnexpectedEom));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_octets(3), Err(Error::UnexpectedEom));
        assert_eq!(cursor.read_octets(usize::MAX), Err(Error::UnexpectedEom));
        assert_eq!(cursor.read_octets(2), Ok(&b"\x02\x03"[..]));
        assert_eq!(cursor.read_u8(), Err(Error::UnexpectedEom));
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn set_position_stays_in_bounds() {
        let mut cursor = Cursor::new(b"\x01\x02");
        assert_eq!(cursor.set_position(2), Ok(()));
        assert_eq!(cursor.set_position(3), Err(Error::UnexpectedEom));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn atomically_restores_position_on_failure() {
        let mut cursor = Cursor::new(b"\x00\x01\x02");
        let result = cursor.atomically(|c| {
            c.read_u16()?;
            c.read_u16()
        });
        assert_eq!(result, Err(Error::UnexpectedEom));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn read_name_returns_after_first_pointer() {
        let mut cursor = Cursor::new(b"\x02eu\x00\x03www\xc0\x00\xff");
        cursor.set_position(4).unwrap();
        let name = cursor.read_name().unwrap();
        assert_eq!(name, "www.eu".parse::<Name>().unwrap());
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.read_u8(), Ok(0xff));
    }

    #[test]
    fn read_name_failure_keeps_position() {
        let mut cursor = Cursor::new(b"\x00\x03www\xc0\x05");
        cursor.set_position(1).unwrap();
        assert_eq!(
            cursor.read_name(),
            Err(Error::InvalidName(name::Error::InvalidPointer))
        );
        assert_eq!(cursor.position(), 1);
    }
}
