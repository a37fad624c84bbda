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

//! Decoding and encoding of DNS messages as exchanged over UDP.
//!
//! The core of this crate is the message codec in [`message`],
//! [`name`], and [`rr`]: the twelve-octet header, the question
//! section, and the resource record sections, including decoding of
//! compressed domain names. Encoding always writes names uncompressed.
//!
//! On top of the codec, [`server`] provides a minimal responder that
//! answers every query with a fixed IPv4 address, and [`io`] provides
//! a blocking UDP I/O provider to run it.

pub mod class;
pub mod io;
pub mod message;
pub mod name;
pub mod rr;
pub mod server;
pub mod thread;
mod util;
