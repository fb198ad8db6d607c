// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use crate::protocol::{self, PACKET_LEN, ToBytes};
use crate::state::ReplyState;
use crate::unix_time;
use echo_proto::error::FormatError;

/// Offset of the transmit timestamp within the 48-byte header.
pub const TRANSMIT_OFFSET: usize = 40;

/// Build the echo reply for a decoded client request.
///
/// - `origin_timestamp` is the client's `transmit_timestamp`, copied as raw halves
/// - `receive_timestamp` is `received`, stamped by the ingestion stage
/// - `reference_timestamp` trails `received` by `state.reference_age_secs`
/// - `transmit_timestamp` is left zero (patched just before sending)
pub fn build_echo_response(
    request: &protocol::Packet,
    state: &ReplyState,
    received: protocol::TimestampFormat,
) -> protocol::Packet {
    protocol::Packet {
        leap_indicator: state.leap_indicator,
        version: state.version,
        mode: protocol::Mode::Server,
        stratum: state.stratum,
        poll: state.poll,
        precision: state.precision,
        root_delay: state.root_delay,
        root_dispersion: state.root_dispersion,
        reference_id: state.reference_id,
        reference_timestamp: received.wrapping_sub_secs(state.reference_age_secs),
        origin_timestamp: request.transmit_timestamp,
        receive_timestamp: received,
        transmit_timestamp: protocol::TimestampFormat::default(),
    }
}

/// Serialize a reply and patch in `t3` as its transmit timestamp.
pub fn serialize_response_at(
    response: &protocol::Packet,
    t3: protocol::TimestampFormat,
) -> Result<[u8; PACKET_LEN], FormatError> {
    let mut buf = response.encode()?;
    t3.to_bytes(&mut buf[TRANSMIT_OFFSET..])?;
    Ok(buf)
}

/// Serialize a reply and patch T3 (transmit timestamp) from the wall clock
/// as late as possible.
pub fn serialize_response_with_t3(
    response: &protocol::Packet,
) -> Result<[u8; PACKET_LEN], FormatError> {
    serialize_response_at(response, unix_time::Instant::now().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Mode, Packet, TimestampFormat, Version};

    fn request_with_transmit(bits: u64) -> Packet {
        Packet {
            version: Version::V4,
            poll: 6,
            transmit_timestamp: TimestampFormat::from_bits(bits),
            ..Packet::default()
        }
    }

    #[test]
    fn test_reply_header_fields() {
        let received = TimestampFormat {
            seconds: 3_913_056_000,
            fraction: 0x4000_0000,
        };
        let reply = build_echo_response(
            &request_with_transmit(0xE000_0000_1234_5678),
            &ReplyState::default(),
            received,
        );
        assert_eq!(reply.mode, Mode::Server);
        assert_eq!(reply.version, Version::V3);
        assert_eq!(reply.stratum.0, 2);
        assert_eq!(reply.poll, 10);
        assert_eq!(reply.precision, 0);
        assert_eq!(reply.receive_timestamp, received);
        assert_eq!(reply.reference_timestamp.seconds, 3_913_055_995);
        assert_eq!(reply.reference_timestamp.fraction, 0x4000_0000);
        assert!(reply.transmit_timestamp.is_zero());
    }

    #[test]
    fn test_origin_is_bit_exact_copy() {
        let bits = 0xFFFF_FFFF_FFFF_FFFF;
        let reply = build_echo_response(
            &request_with_transmit(bits),
            &ReplyState::default(),
            TimestampFormat::default(),
        );
        assert_eq!(reply.origin_timestamp.to_bits(), bits);
    }

    #[test]
    fn test_serialize_patches_t3() {
        let reply = build_echo_response(
            &request_with_transmit(1),
            &ReplyState::default(),
            TimestampFormat::from_bits(0xE93C_7E80_0000_0001),
        );
        let t3 = TimestampFormat::from_bits(0xE93C_7E80_DEAD_BEEF);
        let buf = serialize_response_at(&reply, t3).unwrap();
        assert_eq!(buf.len(), 48);
        assert_eq!(buf[0], 0x1C);
        assert_eq!(&buf[40..48], &0xE93C_7E80_DEAD_BEEFu64.to_be_bytes());
        // Everything before the transmit timestamp is untouched.
        assert_eq!(&buf[..40], &reply.encode().unwrap()[..40]);
    }

    #[test]
    fn test_serialize_with_wall_clock() {
        let reply = build_echo_response(
            &request_with_transmit(1),
            &ReplyState::default(),
            TimestampFormat::default(),
        );
        let buf = serialize_response_with_t3(&reply).unwrap();
        let parsed = Packet::decode(&buf).unwrap();
        assert!(!parsed.transmit_timestamp.is_zero());
    }
}
