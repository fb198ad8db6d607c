// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The processing stage.
//!
//! Pulls datagrams off the handoff channel, turns each into a reply via
//! [`handle_request`](crate::pipeline::handle_request) and sends it back on
//! the shared socket. Malformed requests are dropped without a reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::QuietClients;
use crate::ingest::Datagram;
use crate::pipeline::{HandleResult, handle_request};
use crate::state::ReplyState;

/// Reply loop draining the handoff channel.
#[derive(Debug)]
pub struct ProcessingStage {
    socket: Arc<UdpSocket>,
    reply_state: ReplyState,
    quiet_clients: QuietClients,
    poll_interval: Duration,
}

impl ProcessingStage {
    /// Create the stage. `poll_interval` bounds each wait on the queue.
    pub fn new(
        socket: Arc<UdpSocket>,
        reply_state: ReplyState,
        quiet_clients: QuietClients,
        poll_interval: Duration,
    ) -> Self {
        ProcessingStage {
            socket,
            reply_state,
            quiet_clients,
            poll_interval,
        }
    }

    /// Run until the shutdown signal is raised (or its sender dropped), or
    /// until the ingestion stage has gone away and the queue is drained.
    ///
    /// Items still queued when shutdown is observed are discarded.
    pub async fn run(
        self,
        mut queue: mpsc::UnboundedReceiver<Datagram>,
        mut shutdown: watch::Receiver<bool>,
    ) {
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

                item = tokio::time::timeout(self.poll_interval, queue.recv()) => {
                    match item {
                        Err(_elapsed) => {}
                        Ok(None) => {
                            debug!("handoff queue closed");
                            break;
                        }
                        Ok(Some(datagram)) => self.reply(datagram).await,
                    }
                }
            }
        }

        info!("processing stage stopped");
    }

    async fn reply(&self, datagram: Datagram) {
        let peer = datagram.peer;
        let buf = match handle_request(
            &datagram.bytes,
            peer.ip(),
            datagram.received,
            &self.reply_state,
        ) {
            HandleResult::Response(buf) => buf,
            HandleResult::Drop(_) => return,
        };

        if let Err(e) = self.socket.send_to(&buf, peer).await {
            warn!("failed to send reply to {}: {}", peer, e);
            return;
        }

        if !self.quiet_clients.contains(&peer.ip()) {
            info!("handled NTP request from {}", peer.ip());
        }
    }
}
