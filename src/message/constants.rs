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

//! Constants related to DNS messages.

pub const HEADER_SIZE: usize = 12;

// Masks and shifts for the sixteen-bit flags field that follows the ID.
pub const QR_MASK: u16 = 0x8000;
pub const OPCODE_MASK: u16 = 0x7800;
pub const OPCODE_SHIFT: u32 = 11;
pub const AA_MASK: u16 = 0x0400;
pub const TC_MASK: u16 = 0x0200;
pub const RD_MASK: u16 = 0x0100;
pub const RA_MASK: u16 = 0x0080;
pub const Z_MASK: u16 = 0x0070;
pub const Z_SHIFT: u32 = 4;
pub const RCODE_MASK: u16 = 0x000f;

/// The smallest possible question: a root QNAME, QTYPE, and QCLASS.
pub const MIN_QUESTION_SIZE: usize = 5;

/// The smallest possible RR: a root owner, TYPE, CLASS, TTL, and
/// RDLENGTH with empty RDATA.
pub const MIN_RR_SIZE: usize = 11;
