// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The ingestion stage.
//!
//! Owns the receive side of the shared socket. Every datagram is stamped with
//! its arrival time before anything else happens to it, then handed to the
//! processing stage over an unbounded channel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::protocol;
use crate::unix_time;

/// Size of the receive buffer. Longer datagrams are truncated by the OS.
pub const RECV_BUF_LEN: usize = 1024;

/// A received datagram waiting to be processed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Datagram {
    /// The payload exactly as received.
    pub bytes: Vec<u8>,
    /// Where it came from; the reply goes back here.
    pub peer: SocketAddr,
    /// Arrival time, read from the wall clock right after the receive completed.
    pub received: protocol::TimestampFormat,
}

/// Receive loop feeding the handoff channel.
#[derive(Debug)]
pub struct IngestionStage {
    socket: Arc<UdpSocket>,
    poll_interval: Duration,
}

impl IngestionStage {
    /// Create the stage. `poll_interval` bounds each wait on the socket.
    pub fn new(socket: Arc<UdpSocket>, poll_interval: Duration) -> Self {
        IngestionStage {
            socket,
            poll_interval,
        }
    }

    /// Run until the shutdown signal is raised (or its sender dropped), or
    /// until the processing stage stops consuming.
    ///
    /// Receive errors are logged and the loop keeps going.
    pub async fn run(
        self,
        queue: mpsc::UnboundedSender<Datagram>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut recv_buf = [0u8; RECV_BUF_LEN];

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("shutdown sender dropped");
                        break;
                    }
                }

                result = tokio::time::timeout(
                    self.poll_interval,
                    self.socket.recv_from(&mut recv_buf),
                ) => {
                    match result {
                        // Nothing arrived this interval; loop back to the shutdown check.
                        Err(_elapsed) => {}
                        Ok(Ok((len, peer))) => {
                            let received: protocol::TimestampFormat =
                                unix_time::Instant::now().into();
                            let datagram = Datagram {
                                bytes: recv_buf[..len].to_vec(),
                                peer,
                                received,
                            };
                            if queue.send(datagram).is_err() {
                                debug!("handoff queue closed");
                                break;
                            }
                        }
                        Ok(Err(e)) => {
                            warn!("receive error: {}", e);
                        }
                    }
                }
            }
        }

        info!("ingestion stage stopped");
    }
}
