// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Liveness probe.
//!
//! Sends the smallest possible client request (first byte `0x1B`, LI 0, VN 3,
//! mode 3, then 47 zero bytes) and checks that a 48-byte server-mode reply
//! comes back in time. Only the length and the mode bits are examined.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;

use crate::error::ProbeError;
use crate::protocol::{self, PACKET_LEN};

/// Port the probe targets when none is given.
pub const DEFAULT_PROBE_TARGET: &str = "127.0.0.1:123";

/// How long the probe waits for a reply by default.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Receive buffer for the reply; anything larger than a header is suspect anyway.
const PROBE_RECV_LEN: usize = 512;

/// The probe request: `0x1B` followed by zeros.
pub fn probe_request() -> [u8; PACKET_LEN] {
    let mut buf = [0u8; PACKET_LEN];
    buf[0] = 0x1B;
    buf
}

/// Check a reply datagram: exactly 48 bytes with mode 4 in the low three bits.
pub fn check_reply(reply: &[u8]) -> Result<(), ProbeError> {
    if reply.len() != PACKET_LEN {
        return Err(ProbeError::UnexpectedLength { len: reply.len() });
    }
    let mode = reply[0] & 0b111;
    if mode != protocol::Mode::Server as u8 {
        return Err(ProbeError::UnexpectedMode { mode });
    }
    Ok(())
}

/// Probe `server` (a `host:port` string) and wait up to `timeout` for the reply.
pub async fn check(server: &str, timeout: Duration) -> Result<(), ProbeError> {
    let target = tokio::net::lookup_host(server).await?.next().ok_or_else(|| {
        ProbeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{server} did not resolve to any address"),
        ))
    })?;
    check_addr(target, timeout).await
}

/// Probe a resolved address.
pub async fn check_addr(target: SocketAddr, timeout: Duration) -> Result<(), ProbeError> {
    let local: SocketAddr = if target.is_ipv4() {
        (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let sock = UdpSocket::bind(local).await?;
    // Connecting filters out datagrams from anyone but the target.
    sock.connect(target).await?;

    let exchange = async {
        sock.send(&probe_request()).await?;
        let mut buf = [0u8; PROBE_RECV_LEN];
        let len = sock.recv(&mut buf).await?;
        Ok::<_, std::io::Error>(buf[..len].to_vec())
    };

    let reply = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ProbeError::Timeout { waited: timeout })??;
    check_reply(&reply)
}
