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

//! Implementation of parsing of compressed on-the-wire names.

use super::{Error, Label, Name, MAX_POINTER_HOPS, MAX_WIRE_LEN};

/// The top two bits of a length octet that mark a compression pointer.
const POINTER_MARKER: u8 = 0xc0;

////////////////////////////////////////////////////////////////////////
// PARSING OF COMPRESSED ON-THE-WIRE NAMES                            //
////////////////////////////////////////////////////////////////////////

/// Parses a compressed name starting at index `start` of `octets`.
/// Pointers are followed. Indices given in pointers are treated as
/// indices of `octets`, so the intention is for an entire DNS message
/// to be passed in `octets`. This is the implementation of
/// [`Name::try_from_compressed`].
///
/// Pointer following is an explicit loop. Each pointer must point
/// strictly before the start of the run of labels ("chunk") it ends,
/// so every hop moves backward, and at most [`MAX_POINTER_HOPS`]
/// pointers are followed.
pub fn parse_compressed_name(octets: &[u8], start: usize) -> Result<(Name, usize), Error> {
    let mut labels = Vec::new();
    let mut wire_len = 1;
    let mut chunk_start = start;
    let mut index = start;
    let mut end_of_first_chunk = None;
    let mut hops = 0;

    loop {
        let len = *octets.get(index).ok_or(Error::UnexpectedEom)?;
        if len & POINTER_MARKER == POINTER_MARKER {
            let target = parse_pointer(octets, chunk_start, index)?;
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(Error::TooManyPointers);
            }
            end_of_first_chunk.get_or_insert(index + 2);
            chunk_start = target;
            index = target;
        } else if len & POINTER_MARKER != 0 {
            return Err(Error::InvalidLabelType);
        } else if len == 0 {
            end_of_first_chunk.get_or_insert(index + 1);
            break;
        } else {
            let label_start = index + 1;
            let label_end = label_start + len as usize;
            let label = octets
                .get(label_start..label_end)
                .ok_or(Error::UnexpectedEom)?;
            wire_len += label.len() + 1;
            if wire_len > MAX_WIRE_LEN {
                return Err(Error::NameTooLong);
            }
            labels.push(Label::from_unchecked(label));
            index = label_end;
        }
    }

    let contiguous_len = end_of_first_chunk.map_or(0, |end| end - start);
    Ok((Name { labels }, contiguous_len))
}

/// Parses a pointer at `index` in `octets`. This also checks that the
/// pointer refers to an index *earlier* than the start of the chunk it
/// is in (`chunk_start`).
fn parse_pointer(octets: &[u8], chunk_start: usize, index: usize) -> Result<usize, Error> {
    match octets.get(index..index + 2) {
        Some(&[high, low]) => {
            let pointer = (((high & !POINTER_MARKER) as usize) << 8) | low as usize;
            if pointer >= chunk_start {
                // According to RFC 1035 § 4.1.4, pointers point to a
                // *prior* occurrence of the name. (Importantly, this
                // prevents loops!)
                Err(Error::InvalidPointer)
            } else {
                Ok(pointer)
            }
        }
        _ => Err(Error::UnexpectedEom),
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `n` pointers, each pointing at the one before it, with
    /// the first pointing at a root name at offset 0. Returns the
    /// buffer and the offset of the last pointer.
    fn pointer_chain(n: usize) -> (Vec<u8>, usize) {
        let mut octets = vec![0];
        let mut previous = 0;
        for _ in 0..n {
            let here = octets.len();
            octets.push(POINTER_MARKER | (previous >> 8) as u8);
            octets.push(previous as u8);
            previous = here;
        }
        (octets, previous)
    }

    #[test]
    fn accepts_valid_uncompressed_names() {
        let octets = b"junk\x07example\x04test\x00junk";
        let target: Name = "example.test.".parse().unwrap();
        assert_eq!(parse_compressed_name(octets, 4), Ok((target, 14)));
    }

    #[test]
    fn accepts_valid_compressed_names() {
        let octets = b"junk\x04test\x00junk\x07example\xc0\x04junk";
        let target: Name = "example.test.".parse().unwrap();
        assert_eq!(parse_compressed_name(octets, 14), Ok((target, 10)));
    }

    #[test]
    fn resolves_pointer_to_earlier_name() {
        // A header's worth of zeros, the name "eu." at offset 12, and
        // then a lone pointer back to it.
        let mut octets = vec![0; 12];
        octets.extend_from_slice(b"\x02eu\x00\xc0\x0c");
        let (name, len) = parse_compressed_name(&octets, 16).unwrap();
        assert_eq!(name, Name::from_labels(["eu"]).unwrap());
        assert_eq!(len, 2);
    }

    #[test]
    fn follows_nested_pointers() {
        let octets = b"\x03com\x00\x07example\xc0\x00\x04blog\xc0\x05";
        let (name, len) = parse_compressed_name(octets, 15).unwrap();
        assert_eq!(name, "blog.example.com".parse::<Name>().unwrap());
        assert_eq!(len, 7);
    }

    #[test]
    fn rejects_self_and_forward_pointers() {
        assert_eq!(
            parse_compressed_name(b"\xc0\x00", 0),
            Err(Error::InvalidPointer)
        );
        assert_eq!(
            parse_compressed_name(b"\xc0\x02\x00", 0),
            Err(Error::InvalidPointer)
        );
    }

    #[test]
    fn rejects_pointer_into_own_chunk() {
        // The pointer is past its target, but the target lies in the
        // same run of labels, which would loop forever.
        assert_eq!(
            parse_compressed_name(b"\x00\x01a\xc0\x01", 1),
            Err(Error::InvalidPointer)
        );
    }

    #[test]
    fn rejects_cycles_reached_through_earlier_chunks() {
        // Offset 0 points forward to offset 2, which points back to 0.
        assert_eq!(
            parse_compressed_name(b"\xc0\x02\xc0\x00", 2),
            Err(Error::InvalidPointer)
        );
    }

    #[test]
    fn enforces_hop_limit() {
        let (octets, start) = pointer_chain(MAX_POINTER_HOPS);
        assert_eq!(parse_compressed_name(&octets, start), Ok((Name::root(), 2)));
        let (octets, start) = pointer_chain(MAX_POINTER_HOPS + 1);
        assert_eq!(
            parse_compressed_name(&octets, start),
            Err(Error::TooManyPointers)
        );
    }

    #[test]
    fn rejects_reserved_label_types() {
        assert_eq!(
            parse_compressed_name(b"\x41x", 0),
            Err(Error::InvalidLabelType)
        );
        assert_eq!(
            parse_compressed_name(b"\x80\x00", 0),
            Err(Error::InvalidLabelType)
        );
    }

    #[test]
    fn rejects_unexpected_eom() {
        assert_eq!(
            parse_compressed_name(b"\x07example\x04tes", 0),
            Err(Error::UnexpectedEom)
        );
        assert_eq!(
            parse_compressed_name(b"\x07example", 0),
            Err(Error::UnexpectedEom)
        );
        assert_eq!(parse_compressed_name(b"\x00\xc0", 1), Err(Error::UnexpectedEom));
        assert_eq!(parse_compressed_name(b"", 0), Err(Error::UnexpectedEom));
        assert_eq!(parse_compressed_name(b"\x00", 5), Err(Error::UnexpectedEom));
    }

    #[test]
    fn rejects_long_name_built_from_pointers() {
        // Four 63-octet labels, each run pointing at the previous one:
        // 4 * 64 + 1 = 257 octets uncompressed.
        let mut octets = Vec::new();
        let mut previous = None;
        for _ in 0..4 {
            let here = octets.len();
            octets.push(63);
            octets.extend_from_slice(&[b'x'; 63]);
            match previous {
                Some(p) => octets.extend_from_slice(&[POINTER_MARKER, p as u8]),
                None => octets.push(0),
            }
            previous = Some(here);
        }
        let start = previous.unwrap();
        assert_eq!(parse_compressed_name(&octets, start), Err(Error::NameTooLong));
        assert!(parse_compressed_name(&octets, 65).is_ok());
    }
}
