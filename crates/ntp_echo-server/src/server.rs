// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The echo server and its lifecycle.
//!
//! The server uses a builder pattern for configuration. Building binds the
//! UDP socket; [`NtpEchoServer::spawn`] starts the ingestion and processing
//! stages as two tokio tasks and returns a [`ServerHandle`] that raises the
//! shutdown signal and joins them.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use echo_server::server::NtpEchoServer;
//!
//! let server = NtpEchoServer::builder()
//!     .listen("0.0.0.0:123")
//!     .build()
//!     .await?;
//!
//! server
//!     .run_until(tokio::signal::ctrl_c())
//!     .await
//! # }
//! ```

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::{DEFAULT_LISTEN_ADDR, DEFAULT_POLL_INTERVAL, QuietClients};
use crate::error::{ConfigError, EchoServerError};
use crate::ingest::IngestionStage;
use crate::process::ProcessingStage;
use crate::state::ReplyState;

/// Builder for configuring and creating an [`NtpEchoServer`].
#[derive(Clone, Debug)]
pub struct NtpEchoServerBuilder {
    listen_addr: String,
    poll_interval: Duration,
    quiet_clients: QuietClients,
    reply_state: ReplyState,
}

impl Default for NtpEchoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NtpEchoServerBuilder {
    /// Create a builder with the default listen address (`0.0.0.0:123`),
    /// a one second poll interval, no quiet clients and stratum 2 replies.
    pub fn new() -> Self {
        NtpEchoServerBuilder {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            quiet_clients: QuietClients::new(),
            reply_state: ReplyState::default(),
        }
    }

    /// Set the `IP:port` to bind. Port 0 picks an ephemeral port.
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    /// Set how long each stage waits before re-checking the shutdown signal.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the peers whose requests are answered without a log line.
    pub fn quiet_clients(mut self, quiet: QuietClients) -> Self {
        self.quiet_clients = quiet;
        self
    }

    /// Override the header values written into replies.
    pub fn reply_state(mut self, state: ReplyState) -> Self {
        self.reply_state = state;
        self
    }

    /// Build the server. Binds to the configured listen address.
    ///
    /// Fails with `InvalidInput` for a bad address or a zero poll interval,
    /// and with the underlying socket error if the bind itself fails.
    pub async fn build(self) -> io::Result<NtpEchoServer> {
        if self.poll_interval.is_zero() {
            return Err(EchoServerError::Config(ConfigError::ZeroPollInterval).into());
        }
        let addr: SocketAddr = self.listen_addr.parse().map_err(|e| {
            EchoServerError::Config(ConfigError::InvalidListenAddress {
                address: self.listen_addr.clone(),
                detail: format!("{e}"),
            })
        })?;

        info!("ignoring IPs for logging: {}", self.quiet_clients);
        let sock = UdpSocket::bind(addr).await?;
        let local_addr = sock.local_addr()?;
        info!("listening on {}", local_addr);

        Ok(NtpEchoServer {
            sock: Arc::new(sock),
            local_addr,
            poll_interval: self.poll_interval,
            quiet_clients: self.quiet_clients,
            reply_state: self.reply_state,
        })
    }
}

/// A bound echo server, not yet serving.
///
/// Created via [`NtpEchoServer::builder()`].
#[derive(Debug)]
pub struct NtpEchoServer {
    sock: Arc<UdpSocket>,
    local_addr: SocketAddr,
    poll_interval: Duration,
    quiet_clients: QuietClients,
    reply_state: ReplyState,
}

impl NtpEchoServer {
    /// Create a builder for configuring the server.
    pub fn builder() -> NtpEchoServerBuilder {
        NtpEchoServerBuilder::new()
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start both stages on the current tokio runtime.
    pub fn spawn(self) -> ServerHandle {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let ingest = IngestionStage::new(self.sock.clone(), self.poll_interval);
        let process = ProcessingStage::new(
            self.sock,
            self.reply_state,
            self.quiet_clients,
            self.poll_interval,
        );

        ServerHandle {
            local_addr: self.local_addr,
            shutdown_tx,
            ingest: tokio::spawn(ingest.run(queue_tx, shutdown_rx.clone())),
            process: tokio::spawn(process.run(queue_rx, shutdown_rx)),
        }
    }

    /// Serve until `trigger` completes, then shut down and join both stages.
    ///
    /// The stages are stopped either way; an error from `trigger` (for
    /// example a signal handler that could not be installed) takes precedence
    /// over one from the shutdown itself.
    pub async fn run_until<F>(self, trigger: F) -> io::Result<()>
    where
        F: Future<Output = io::Result<()>>,
    {
        let handle = self.spawn();
        let triggered = trigger.await;
        let stopped = handle.shutdown().await;
        triggered.and(stopped)
    }
}

/// Handle to a running server.
///
/// Dropping the handle without calling [`shutdown`](ServerHandle::shutdown)
/// also stops both stages, since they treat a closed signal as shutdown, but
/// nothing waits for them.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    ingest: JoinHandle<()>,
    process: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether both stages have exited.
    pub fn is_finished(&self) -> bool {
        self.ingest.is_finished() && self.process.is_finished()
    }

    /// Raise the shutdown signal and wait for both stages to exit.
    ///
    /// Each stage notices within one poll interval at most. Fails only if a
    /// stage task panicked or was cancelled.
    pub async fn shutdown(self) -> io::Result<()> {
        // A send error means both stages already exited; the joins below still apply.
        let _ = self.shutdown_tx.send(true);
        let ingest = self.ingest.await;
        let process = self.process.await;
        ingest.map_err(join_error)?;
        process.map_err(join_error)?;
        Ok(())
    }
}

fn join_error(e: tokio::task::JoinError) -> io::Error {
    EchoServerError::Io(io::Error::other(format!("stage task failed: {e}"))).into()
}
