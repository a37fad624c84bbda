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

//! Implements the `serve` command (i.e., running the responder).

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use dnsmsg::io::BlockingIoProvider;
use dnsmsg::server::Responder;
use dnsmsg::thread::ThreadGroup;

use crate::args::ServeArgs;
use crate::config;

pub fn serve(args: ServeArgs) -> Result<()> {
    info!(
        "dnsmsg v{}.{}.{} starting.",
        env!("CARGO_PKG_VERSION_MAJOR"),
        env!("CARGO_PKG_VERSION_MINOR"),
        env!("CARGO_PKG_VERSION_PATCH"),
    );

    // Get the configuration, either from the file system or from the
    // command line arguments, as appropriate.
    let config = if let Some(ref config_path) = args.config {
        info!("Loading the configuration from {}.", config_path.display());
        config::load_from_path(config_path).context("failed to load the configuration")?
    } else {
        info!("Loading the configuration from the command line.");
        config::load_from_args(args)
    };

    let io_provider = BlockingIoProvider::bind(config.io_config(), config.bind)
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let responder = Arc::new(Responder::new(config.answer, config.ttl()));

    // Set up signal handling before starting, so that an early signal
    // still shuts us down gracefully.
    let mut signals = set_up_signal_handling().context("failed to set up signal handling")?;

    info!("Set-up is complete; starting the responder.");
    let thread_group = ThreadGroup::new();
    io_provider
        .start(&responder, &thread_group)
        .context("failed to start the I/O provider")?;

    if let Some(signal) = signals.forever().next() {
        let name = if signal == SIGINT { "SIGINT" } else { "SIGTERM" };
        info!("Received {}; shutting down.", name);
    }

    thread_group.shut_down();
    thread_group.await_shutdown();
    info!("Shutdown complete.");
    Ok(())
}

fn set_up_signal_handling() -> Result<Signals> {
    let term_signals = [SIGINT, SIGTERM];
    let already_terminating = Arc::new(AtomicBool::new(false));

    // This sets up signal handlers to exit immediately if a second
    // termination signal arrives before the process finishes shutting
    // down gracefully.
    for sig in term_signals {
        signal_hook::flag::register_conditional_shutdown(sig, 1, already_terminating.clone())?;
        signal_hook::flag::register(sig, already_terminating.clone())?;
    }

    Signals::new(term_signals).map_err(Into::into)
}
