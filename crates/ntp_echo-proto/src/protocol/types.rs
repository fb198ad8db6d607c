// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use super::{ConstPackedSizeBytes, FromBytes, PACKET_LEN, ToBytes};
use crate::error::FormatError;

/// **NTP Short Format** - Used in delay and dispersion header fields. A 16-bit unsigned seconds
/// field and a 16-bit fraction field (Q16.16).
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Seconds              |           Fraction            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShortFormat {
    /// Seconds component (16-bit unsigned).
    pub seconds: u16,
    /// Fractional seconds component (16-bit unsigned).
    pub fraction: u16,
}

/// **NTP Timestamp Format** - A 32-bit unsigned seconds field spanning 136 years and a 32-bit
/// fraction field resolving 232 picoseconds (Q32.32).
///
/// The prime epoch is 0 h 1 January 1900 UTC, when all bits are zero.
///
/// The two halves are kept exactly as they appeared on the wire. Echoing a
/// client's transmit timestamp back as the origin timestamp is a plain copy of
/// this struct, never a trip through floating point.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimestampFormat {
    /// Seconds since 1900-01-01 00:00:00 UTC (32-bit unsigned).
    pub seconds: u32,
    /// Fractional seconds (32-bit unsigned, resolution of ~232 picoseconds).
    pub fraction: u32,
}

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current month.
///
/// Note that this field is packed in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap required.
    #[default]
    NoWarning = 0,
    /// Last minute of the day has 61 seconds.
    AddOne = 1,
    /// Last minute of the day has 59 seconds.
    SubOne = 2,
    /// Clock unsynchronized.
    Unknown = 3,
}

impl TryFrom<u8> for LeapIndicator {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeapIndicator::NoWarning),
            1 => Ok(LeapIndicator::AddOne),
            2 => Ok(LeapIndicator::SubOne),
            3 => Ok(LeapIndicator::Unknown),
            _ => Err(()),
        }
    }
}

/// A 3-bit integer representing the NTP version number.
///
/// Note that while this struct is 8-bits, this field is packed to 3 in the actual header.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(pub(super) u8);

/// A 3-bit integer representing the association mode.
///
/// Note that while this enum is 8-bits, this field is packed to 3 in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved mode (value 0).
    Reserved = 0,
    /// Symmetric active mode (value 1).
    SymmetricActive = 1,
    /// Symmetric passive mode (value 2).
    SymmetricPassive = 2,
    /// Client mode (value 3).
    #[default]
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
    /// Broadcast mode (value 5).
    Broadcast = 5,
    /// NTP control message mode (value 6).
    NtpControlMessage = 6,
    /// Reserved for private use (value 7).
    ReservedForPrivateUse = 7,
}

impl TryFrom<u8> for Mode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Reserved),
            1 => Ok(Mode::SymmetricActive),
            2 => Ok(Mode::SymmetricPassive),
            3 => Ok(Mode::Client),
            4 => Ok(Mode::Server),
            5 => Ok(Mode::Broadcast),
            6 => Ok(Mode::NtpControlMessage),
            7 => Ok(Mode::ReservedForPrivateUse),
            _ => Err(()),
        }
    }
}

/// An 8-bit integer representing the stratum.
///
/// ```ignore
/// +--------+-----------------------------------------------------+
/// | Value  | Meaning                                             |
/// +--------+-----------------------------------------------------+
/// | 0      | unspecified or invalid                              |
/// | 1      | primary server (e.g., equipped with a GPS receiver) |
/// | 2-15   | secondary server (via NTP)                          |
/// | 16     | unsynchronized                                      |
/// | 17-255 | reserved                                            |
/// +--------+-----------------------------------------------------+
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

/// A 32-bit code identifying the particular server or reference clock.
///
/// The echo service never interprets this field; it is carried as four opaque
/// octets in both directions.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReferenceIdentifier(pub [u8; 4]);

/// **Packet Header** - the fixed 48-byte NTP header.
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |LI | VN  |Mode |    Stratum     |     Poll      |  Precision   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Delay                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Dispersion                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Reference ID                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                     Reference Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Origin Timestamp (64)                    +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Receive Timestamp (64)                   +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Transmit Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Packet {
    /// Leap indicator warning of impending leap second.
    pub leap_indicator: LeapIndicator,
    /// NTP protocol version number.
    pub version: Version,
    /// Association mode (client, server, broadcast, etc.).
    pub mode: Mode,
    /// Stratum level of the time source.
    pub stratum: Stratum,
    /// Maximum interval between successive messages, in log2 seconds.
    pub poll: i8,
    /// Precision of the system clock, in log2 seconds.
    pub precision: i8,
    /// Total round-trip delay to the reference clock, in NTP short format.
    pub root_delay: ShortFormat,
    /// Total dispersion to the reference clock, in NTP short format.
    pub root_dispersion: ShortFormat,
    /// Reference identifier (clock source or server address).
    pub reference_id: ReferenceIdentifier,
    /// Time when the system clock was last set or corrected.
    pub reference_timestamp: TimestampFormat,
    /// Time at the client when the request departed for the server.
    pub origin_timestamp: TimestampFormat,
    /// Time at the server when the request arrived from the client.
    pub receive_timestamp: TimestampFormat,
    /// Time at the server when the response left for the client.
    pub transmit_timestamp: TimestampFormat,
}

/// The consecutive types within the first packed byte in the NTP packet.
pub type PacketByte1 = (LeapIndicator, Version, Mode);

// Inherent implementations.

impl TimestampFormat {
    /// Build a timestamp from its raw 64-bit wire value (seconds in the high word).
    pub const fn from_bits(bits: u64) -> Self {
        TimestampFormat {
            seconds: (bits >> 32) as u32,
            fraction: bits as u32,
        }
    }

    /// The raw 64-bit wire value (seconds in the high word).
    pub const fn to_bits(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }

    /// Whether both halves are zero (the "unknown time" value in RFC 5905).
    pub const fn is_zero(self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }

    /// Move the timestamp `secs` seconds into the past, wrapping within the
    /// 32-bit era like the seconds field itself does. The fraction is untouched.
    pub const fn wrapping_sub_secs(self, secs: u32) -> Self {
        TimestampFormat {
            seconds: self.seconds.wrapping_sub(secs),
            fraction: self.fraction,
        }
    }
}

impl ReferenceIdentifier {
    /// The all-zero identifier.
    pub const UNSET: Self = ReferenceIdentifier([0; 4]);
}

impl Version {
    /// NTP version 3. The echo service answers with this version.
    pub const V3: Self = Version(3);
    /// NTP version 4 (current standard).
    pub const V4: Self = Version(4);

    /// The largest value the 3-bit version field can carry.
    pub const MAX_WIRE: u8 = 0b111;

    /// Returns the raw version number as a `u8`.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Stratum {
    /// Unspecified or invalid.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// The minimum value specifying a secondary server (via NTP). The echo
    /// service always answers with this stratum.
    pub const SECONDARY_MIN: Self = Stratum(2);
}

impl Packet {
    /// Decode the first 48 bytes of `buf` as a packet.
    ///
    /// Trailing bytes are ignored. Fails with [`FormatError::BufferTooShort`]
    /// when fewer than 48 bytes are available.
    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        let (packet, _) = Packet::from_bytes(buf)?;
        Ok(packet)
    }

    /// Encode the packet into its 48-byte wire form.
    pub fn encode(&self) -> Result<[u8; PACKET_LEN], FormatError> {
        let mut buf = [0u8; PACKET_LEN];
        self.to_bytes(&mut buf)?;
        Ok(buf)
    }
}

// Size implementations.

impl ConstPackedSizeBytes for ShortFormat {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for TimestampFormat {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for Stratum {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for ReferenceIdentifier {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for PacketByte1 {
    const PACKED_SIZE_BYTES: usize = 1;
}

impl ConstPackedSizeBytes for Packet {
    const PACKED_SIZE_BYTES: usize = PacketByte1::PACKED_SIZE_BYTES
        + Stratum::PACKED_SIZE_BYTES
        + 2
        + ShortFormat::PACKED_SIZE_BYTES * 2
        + ReferenceIdentifier::PACKED_SIZE_BYTES
        + TimestampFormat::PACKED_SIZE_BYTES * 4;
}

// Default implementations.

impl Default for Version {
    /// Defaults to NTPv4, the current standard (RFC 5905).
    fn default() -> Self {
        Version::V4
    }
}

impl Default for Packet {
    /// Defaults to a client request template with every other field zeroed.
    fn default() -> Self {
        Packet {
            leap_indicator: LeapIndicator::default(),
            version: Version::default(),
            mode: Mode::default(),
            stratum: Stratum::default(),
            poll: 0,
            precision: 0,
            root_delay: ShortFormat::default(),
            root_dispersion: ShortFormat::default(),
            reference_id: ReferenceIdentifier::default(),
            reference_timestamp: TimestampFormat::default(),
            origin_timestamp: TimestampFormat::default(),
            receive_timestamp: TimestampFormat::default(),
            transmit_timestamp: TimestampFormat::default(),
        }
    }
}

// Display implementations.

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:08x}.{:08x}", self.seconds, self.fraction)
    }
}

impl fmt::Display for ReferenceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_packed_size() {
        assert_eq!(Packet::PACKED_SIZE_BYTES, 48);
        assert_eq!(Packet::PACKED_SIZE_BYTES, PACKET_LEN);
    }

    #[test]
    fn test_timestamp_bits_roundtrip() {
        let ts = TimestampFormat {
            seconds: 0xDEAD_BEEF,
            fraction: 0x0123_4567,
        };
        assert_eq!(ts.to_bits(), 0xDEAD_BEEF_0123_4567);
        assert_eq!(TimestampFormat::from_bits(ts.to_bits()), ts);
    }

    #[test]
    fn test_timestamp_wrapping_sub_secs() {
        let ts = TimestampFormat {
            seconds: 3,
            fraction: 77,
        };
        let earlier = ts.wrapping_sub_secs(5);
        assert_eq!(earlier.seconds, u32::MAX - 1);
        assert_eq!(earlier.fraction, 77);
    }

    #[test]
    fn test_timestamp_display() {
        let ts = TimestampFormat {
            seconds: 1,
            fraction: 0xABCD,
        };
        assert_eq!(ts.to_string(), "00000001.0000abcd");
    }

    #[test]
    fn test_version_value() {
        assert_eq!(Version::V3.value(), 3);
        assert_eq!(Version::default().value(), 4);
    }

    #[test]
    fn test_mode_try_from() {
        assert_eq!(Mode::try_from(3), Ok(Mode::Client));
        assert_eq!(Mode::try_from(4), Ok(Mode::Server));
        assert_eq!(Mode::try_from(8), Err(()));
    }

    #[test]
    fn test_reference_id_display() {
        let id = ReferenceIdentifier([10, 0, 0, 1]);
        assert_eq!(id.to_string(), "10.0.0.1");
    }

    #[test]
    fn test_default_packet_is_client_request() {
        let pkt = Packet::default();
        assert_eq!(pkt.mode, Mode::Client);
        assert_eq!(pkt.version, Version::V4);
        assert!(pkt.transmit_timestamp.is_zero());
    }
}
