// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::net::IpAddr;

use tracing::{debug, warn};

use crate::error::ProtocolError;
use crate::protocol::{self, PACKET_LEN};
use crate::response::{build_echo_response, serialize_response_with_t3};
use crate::state::ReplyState;
use crate::unix_time;

/// The complete result of handling a client request.
#[derive(Debug)]
pub enum HandleResult {
    /// Send this response buffer to the client.
    Response([u8; PACKET_LEN]),
    /// Drop the packet without replying.
    Drop(ProtocolError),
}

/// Handle a single datagram (pure logic, no I/O).
///
/// `received` is the arrival time recorded by the ingestion stage. The
/// transmit timestamp is read from the wall clock during serialization, so the
/// caller should send the buffer right away.
///
/// Nothing about the request is validated beyond its length: any 48-byte
/// datagram gets a reply, including the all-zero probe.
pub fn handle_request(
    recv_buf: &[u8],
    src_ip: IpAddr,
    received: protocol::TimestampFormat,
    state: &ReplyState,
) -> HandleResult {
    let request = match protocol::Packet::decode(recv_buf) {
        Ok(req) => req,
        Err(e) => {
            debug!("dropping invalid request from {}: {}", src_ip, e);
            return HandleResult::Drop(ProtocolError::Malformed(e));
        }
    };
    debug!(
        "request from {}: version {}, mode {:?}, client transmit {:.6}",
        src_ip,
        request.version.value(),
        request.mode,
        unix_time::timestamp_to_unix_secs_f64(request.transmit_timestamp)
    );

    let response = build_echo_response(&request, state, received);
    match serialize_response_with_t3(&response) {
        Ok(buf) => HandleResult::Response(buf),
        Err(e) => {
            warn!("failed to encode reply for {}: {}", src_ip, e);
            HandleResult::Drop(ProtocolError::ReplyEncoding(e))
        }
    }
}
