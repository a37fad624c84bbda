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

//! Implements the server configuration file.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use log::Level::Debug;
use log::{debug, log_enabled};
use serde::Deserialize;

use dnsmsg::io::BlockingIoConfig;
use dnsmsg::rr::Ttl;

use crate::args::ServeArgs;

////////////////////////////////////////////////////////////////////////
// CONFIGURATION LOADING                                              //
////////////////////////////////////////////////////////////////////////

/// Loads the server configuration from the file given by `path`.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = fs::read(path.as_ref()).context("failed to read the configuration file")?;
    let config = parse(&raw_config)?;
    log_config_summary(&config);
    Ok(config)
}

/// Parses the contents of a configuration file.
fn parse(raw_config: &[u8]) -> Result<Config> {
    toml::from_slice(raw_config).context("failed to parse the configuration file")
}

/// Loads the server configuration from the parsed command line
/// arguments given by `args`.
pub fn load_from_args(args: ServeArgs) -> Config {
    let bind = args.bind.unwrap_or_else(|| {
        let ip = args.ip.unwrap_or(DEFAULT_BIND_IP);
        let port = args.port.unwrap_or(DEFAULT_BIND_PORT);
        SocketAddr::new(ip, port)
    });

    let config = Config {
        bind,
        answer: args.answer.unwrap_or(DEFAULT_ANSWER),
        ttl: args.ttl.unwrap_or(DEFAULT_TTL),
        udp_workers: default_udp_workers(),
    };
    log_config_summary(&config);
    config
}

/// Summarizes the configuration in the log, if the debug log level is
/// enabled.
fn log_config_summary(config: &Config) {
    if !log_enabled!(Debug) {
        // Don't compute the message if it will never be printed.
        return;
    }

    debug!(
        "Configuration loaded:\n\
         Bind address: {}\n\
         Answer:       {}\n\
         TTL:          {}\n\
         UDP workers:  {}",
        config.bind, config.answer, config.ttl, config.udp_workers,
    );
}

////////////////////////////////////////////////////////////////////////
// CONFIGURATION FILE STRUCTURE                                       //
////////////////////////////////////////////////////////////////////////

/// The complete configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default = "default_answer")]
    pub answer: Ipv4Addr,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default = "default_udp_workers")]
    pub udp_workers: usize,
}

impl Config {
    /// Returns the configured TTL.
    pub fn ttl(&self) -> Ttl {
        Ttl::from(self.ttl)
    }

    /// Returns the configuration for the I/O provider.
    pub fn io_config(&self) -> BlockingIoConfig {
        BlockingIoConfig {
            udp_workers: self.udp_workers,
        }
    }
}

const DEFAULT_BIND_IP: IpAddr = IpAddr::V6(Ipv6Addr::LOCALHOST);
const DEFAULT_BIND_PORT: u16 = 53;
const DEFAULT_ANSWER: Ipv4Addr = Ipv4Addr::new(1, 1, 1, 1);
const DEFAULT_TTL: u32 = 3600;

fn default_bind() -> SocketAddr {
    SocketAddr::new(DEFAULT_BIND_IP, DEFAULT_BIND_PORT)
}

fn default_answer() -> Ipv4Addr {
    DEFAULT_ANSWER
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_udp_workers() -> usize {
    2
}
