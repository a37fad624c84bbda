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

//! Implements the `query` command.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};

use dnsmsg::message::{Message, Question};

use crate::args::QueryArgs;

/// How long to wait for the response.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// The size of the receive buffer. Responses are at most 512 octets
/// without EDNS, but servers do not always honor that.
const RECEIVE_BUFFER_SIZE: usize = 4096;

pub fn query(args: QueryArgs) -> Result<()> {
    let question = Question {
        qname: args.name,
        qtype: args.qtype,
        qclass: args.qclass,
    };
    let query = Message::new_query(question, !args.no_recursion);
    let octets = query.to_wire().context("failed to encode the query")?;

    // Bind an ephemeral port in the server's address family.
    let local: SocketAddr = match args.server {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(local).context("failed to bind a local socket")?;
    socket
        .set_read_timeout(Some(RESPONSE_TIMEOUT))
        .context("failed to set the receive timeout")?;

    debug!(
        "Sending {}-octet query with ID {} to {}",
        octets.len(),
        query.header.id,
        args.server
    );
    socket
        .send_to(&octets, args.server)
        .with_context(|| format!("failed to send the query to {}", args.server))?;

    let mut buf = vec![0; RECEIVE_BUFFER_SIZE];
    let (len, src) = socket
        .recv_from(&mut buf)
        .context("failed to receive a response")?;
    if src != args.server {
        return Err(anyhow!("received a datagram from unexpected source {}", src));
    }

    let response = Message::from_wire(&buf[..len]).context("failed to decode the response")?;
    if response.header.id != query.header.id {
        warn!(
            "Response ID {} does not match query ID {}",
            response.header.id, query.header.id
        );
    }
    print!("{}", response);
    println!("\n;; SERVER: {}", args.server);
    println!(";; MSG SIZE  rcvd: {}", len);
    Ok(())
}
