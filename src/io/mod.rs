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

//! I/O providers for running [`Responder`s](crate::server::Responder).
//!
//! The [`Responder`](crate::server::Responder) structure and its methods
//! implement message processing abstracted from underlying network
//! I/O. Therefore, to actually serve DNS, an I/O provider is needed.
//! The provider takes a [`Responder`](crate::server::Responder) and,
//! when run, acts as the intermediary between operating system network
//! APIs on one hand and the [`Responder`](crate::server::Responder) on
//! the other.

mod blocking;

pub use blocking::{BlockingIoConfig, BlockingIoProvider};
