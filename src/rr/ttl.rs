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

//! Provides the [`Ttl`] structure for DNS RR TTLs.

use std::fmt;

////////////////////////////////////////////////////////////////////////
// TTLS                                                               //
////////////////////////////////////////////////////////////////////////

/// The time to live (TTL) of a DNS record, in seconds.
///
/// [RFC 2181 § 8] restricts meaningful TTLs to 0 through 2³¹ - 1, but
/// the codec carries the 32-bit wire value through unchanged so that a
/// decoded record re-encodes to the same octets. Consumers that cache
/// records are responsible for the RFC 2181 interpretation; see
/// [`Ttl::is_rfc2181_valid`].
///
/// [RFC 2181 § 8]: https://datatracker.ietf.org/doc/html/rfc2181#section-8
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Ttl(u32);

impl Ttl {
    /// Returns whether the most significant bit of the TTL is clear.
    pub fn is_rfc2181_valid(self) -> bool {
        self.0 <= i32::MAX as u32
    }
}

impl From<u32> for Ttl {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Ttl> for u32 {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_preserved() {
        assert_eq!(u32::from(Ttl::from(0)), 0);
        assert_eq!(u32::from(Ttl::from(86178)), 86178);
        assert_eq!(u32::from(Ttl::from(u32::MAX)), u32::MAX);
    }

    #[test]
    fn rfc2181_validity_checks_top_bit() {
        assert!(Ttl::from(i32::MAX as u32).is_rfc2181_valid());
        assert!(!Ttl::from(i32::MAX as u32 + 1).is_rfc2181_valid());
    }
}
