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

//! The `dnsmsg` command-line tool.

use std::fmt::Write;
use std::process;

use env_logger::Env;
use log::error;

mod args;
mod config;
mod query;
mod serve;

use args::Command;

fn main() {
    env_logger::init_from_env(Env::new().default_filter_or("warn"));

    let args = args::parse();
    let result = match args.command {
        Command::Serve(serve_args) => serve::serve(serve_args),
        Command::Query(query_args) => query::query(query_args),
    };

    if let Err(e) = result {
        let mut message = String::from("Failed:");
        for (i, cause) in e.chain().enumerate() {
            let _ = write!(message, "\n[{}] {}", i + 1, cause);
        }
        message.push_str("\nExiting with failure.");
        error!("{}", message);
        process::exit(1);
    }
}
