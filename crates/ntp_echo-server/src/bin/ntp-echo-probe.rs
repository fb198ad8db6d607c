// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Liveness probe for the echo server, suitable for container health checks.
//!
//! Prints `OK` and exits 0 when the server answers; otherwise prints the
//! reason and exits 1.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use echo_server::probe::{self, DEFAULT_PROBE_TARGET, DEFAULT_PROBE_TIMEOUT};

#[derive(Parser, Debug)]
#[command(name = "ntp-echo-probe")]
#[command(about = "Check that an NTP echo server answers")]
struct Args {
    /// Server to probe (host:port)
    #[arg(long, default_value = DEFAULT_PROBE_TARGET)]
    server: String,

    /// How long to wait for the reply (milliseconds)
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    timeout_ms: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    match probe::check(&args.server, Duration::from_millis(args.timeout_ms)).await {
        Ok(()) => {
            println!("OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}
