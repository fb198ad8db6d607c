// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP echo server daemon.
//!
//! ```text
//! IGNORE_CLIENT_IPS=10.0.0.5 TZ=Europe/Berlin ntp-echo --listen 0.0.0.0:123
//! ```
//!
//! Runs until Ctrl-C, then stops both stages and exits 0. Bind failures and
//! bad configuration exit non-zero.

use std::io;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use echo_server::config::{
    DEFAULT_LISTEN_ADDR, DEFAULT_POLL_INTERVAL, LISTEN_ENV, QUIET_CLIENTS_ENV, QuietClients,
};
use echo_server::error::EchoServerError;
use echo_server::logging::{self, LogClock};
use echo_server::server::NtpEchoServer;

#[derive(Parser, Debug)]
#[command(name = "ntp-echo")]
#[command(about = "Stratum 2 NTP time echo server")]
struct Args {
    /// Address to bind (IP:port)
    #[arg(long, env = LISTEN_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Comma-separated client IPs whose requests are not logged
    #[arg(long, env = QUIET_CLIENTS_ENV, default_value = "")]
    quiet_clients: String,

    /// How long each stage waits before re-checking for shutdown (milliseconds)
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_interval_ms: u64,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init(LogClock::from_env());

    let quiet = QuietClients::parse(&args.quiet_clients).map_err(|e| {
        error!("{}", e);
        io::Error::from(EchoServerError::Config(e))
    })?;

    let server = NtpEchoServer::builder()
        .listen(args.listen.as_str())
        .poll_interval(Duration::from_millis(args.poll_interval_ms))
        .quiet_clients(quiet)
        .build()
        .await
        .inspect_err(|e| error!("failed to start on {}: {}", args.listen, e))?;

    server
        .run_until(async {
            tokio::signal::ctrl_c()
                .await
                .inspect_err(|e| error!("failed to listen for Ctrl-C: {}", e))?;
            info!("interrupt received, shutting down");
            Ok(())
        })
        .await?;

    info!("exited");
    Ok(())
}
