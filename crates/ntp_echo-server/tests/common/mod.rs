// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for server integration tests.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use echo_server::protocol::{Packet, TimestampFormat};
use echo_server::server::{NtpEchoServerBuilder, ServerHandle};
use tokio::net::UdpSocket;

/// Poll interval used by test servers, short so shutdown tests stay fast.
#[allow(dead_code)]
pub(crate) const TEST_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a test waits for a reply before concluding none is coming.
#[allow(dead_code)]
pub(crate) const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Spawn a test server on an ephemeral loopback port.
///
/// Returns the running handle; its `local_addr()` is the address to send to.
pub(crate) async fn spawn_test_server(builder: NtpEchoServerBuilder) -> ServerHandle {
    let server = builder
        .listen("127.0.0.1:0")
        .poll_interval(TEST_POLL_INTERVAL)
        .build()
        .await
        .expect("failed to bind test server");
    server.spawn()
}

/// Build a client request whose transmit timestamp has the given raw bits.
#[allow(dead_code)]
pub(crate) fn build_client_packet(transmit_bits: u64) -> [u8; 48] {
    let packet = Packet {
        transmit_timestamp: TimestampFormat::from_bits(transmit_bits),
        ..Packet::default()
    };
    packet.encode().expect("failed to serialize")
}

/// Send a raw UDP packet to `addr` and receive the response with a timeout.
///
/// Returns `None` if the server doesn't respond within the timeout.
#[allow(dead_code)]
pub(crate) async fn send_receive_raw(
    addr: SocketAddr,
    packet: &[u8],
    timeout: Duration,
) -> Option<Vec<u8>> {
    let sock = UdpSocket::bind("127.0.0.1:0").await.expect("bind failed");
    send_receive_on(&sock, addr, packet, timeout).await
}

/// Like [`send_receive_raw`] but on a caller-owned socket.
#[allow(dead_code)]
pub(crate) async fn send_receive_on(
    sock: &UdpSocket,
    addr: SocketAddr,
    packet: &[u8],
    timeout: Duration,
) -> Option<Vec<u8>> {
    sock.send_to(packet, addr).await.expect("send failed");

    let mut buf = vec![0u8; 2048];
    match tokio::time::timeout(timeout, sock.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => {
            buf.truncate(len);
            Some(buf)
        }
        _ => None,
    }
}

/// Parse a response buffer into a Packet.
#[allow(dead_code)]
pub(crate) fn parse_response(buf: &[u8]) -> Packet {
    Packet::decode(buf).expect("failed to parse response")
}

/// Collects formatted log output so tests can assert on what was logged.
#[allow(dead_code)]
#[derive(Clone, Debug, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    /// A plain-text fmt subscriber at `DEBUG` that writes into this buffer.
    ///
    /// Install it with `tracing::subscriber::set_default` on a current-thread
    /// runtime so the server's spawned stages log into it as well.
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish()
    }

    /// Number of captured lines containing `needle`.
    pub(crate) fn count_lines(&self, needle: &str) -> usize {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
