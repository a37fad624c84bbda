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

//! Implements command-line argument parsing.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use dnsmsg::class::Class;
use dnsmsg::name::Name;
use dnsmsg::rr::Type;

/// Parses the command line arguments.
pub fn parse() -> Args {
    Args::parse()
}

/// A small DNS responder and query tool
#[derive(Debug, Parser)]
#[command(author, version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer A queries with a fixed address
    Serve(ServeArgs),

    /// Send a query and print the response
    Query(QueryArgs),
}

#[derive(Debug, ClapArgs)]
pub struct ServeArgs {
    /// Set the configuration file to use
    #[arg(long, conflicts_with_all = ["bind", "ip", "port", "answer", "ttl"], value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set the server bind IP address and port
    #[arg(long, value_name = "IP:PORT")]
    pub bind: Option<SocketAddr>,

    /// Set the server bind IP address
    #[arg(long, conflicts_with = "bind", value_name = "IP")]
    pub ip: Option<IpAddr>,

    /// Set the server port
    #[arg(long, conflicts_with = "bind", value_name = "PORT")]
    pub port: Option<u16>,

    /// Set the IPv4 address to answer with
    #[arg(long, value_name = "IPV4")]
    pub answer: Option<Ipv4Addr>,

    /// Set the TTL of answers, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub ttl: Option<u32>,
}

#[derive(Debug, ClapArgs)]
pub struct QueryArgs {
    /// The domain name to query
    #[arg(value_name = "NAME")]
    pub name: Name,

    /// Set the QTYPE (e.g. A, NS, TYPE65280)
    #[arg(long = "type", short = 't', default_value = "A", value_name = "TYPE")]
    pub qtype: Type,

    /// Set the QCLASS (e.g. IN, CH, CLASS255)
    #[arg(long = "class", short = 'c', default_value = "IN", value_name = "CLASS")]
    pub qclass: Class,

    /// Set the server to query
    #[arg(long, short = 's', default_value = "192.203.230.10:53", value_name = "IP:PORT")]
    pub server: SocketAddr,

    /// Clear the RD (recursion desired) bit
    #[arg(long)]
    pub no_recursion: bool,
}
