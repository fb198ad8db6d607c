// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::FormatError;

use super::{
    ConstPackedSizeBytes, FromBytes, LeapIndicator, Mode, Packet, ReferenceIdentifier,
    ShortFormat, Stratum, TimestampFormat, ToBytes, Version,
};

fn check_len(buf: &[u8], needed: usize) -> Result<(), FormatError> {
    if buf.len() < needed {
        return Err(FormatError::BufferTooShort {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

impl FromBytes for ShortFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        let seconds = NetworkEndian::read_u16(&buf[..2]);
        let fraction = NetworkEndian::read_u16(&buf[2..4]);
        Ok((ShortFormat { seconds, fraction }, Self::PACKED_SIZE_BYTES))
    }
}

impl FromBytes for TimestampFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        let seconds = NetworkEndian::read_u32(&buf[..4]);
        let fraction = NetworkEndian::read_u32(&buf[4..8]);
        Ok((
            TimestampFormat { seconds, fraction },
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

impl FromBytes for Stratum {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        Ok((Stratum(buf[0]), 1))
    }
}

impl FromBytes for ReferenceIdentifier {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        Ok((
            ReferenceIdentifier([buf[0], buf[1], buf[2], buf[3]]),
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

impl FromBytes for (LeapIndicator, Version, Mode) {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, 1)?;
        let li_vn_mode = buf[0];
        let li_u8 = li_vn_mode >> 6;
        let vn_u8 = (li_vn_mode >> 3) & 0b111;
        let mode_u8 = li_vn_mode & 0b111;
        let li = LeapIndicator::try_from(li_u8).map_err(|_| FormatError::InvalidField {
            field: "leap indicator",
            value: li_u8 as u64,
        })?;
        let vn = Version(vn_u8);
        let mode = Mode::try_from(mode_u8).map_err(|_| FormatError::InvalidField {
            field: "association mode",
            value: mode_u8 as u64,
        })?;
        Ok(((li, vn, mode), 1))
    }
}

impl FromBytes for Packet {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;

        let mut offset = 0;

        let ((leap_indicator, version, mode), n) =
            <(LeapIndicator, Version, Mode)>::from_bytes(&buf[offset..])?;
        offset += n;

        let (stratum, n) = Stratum::from_bytes(&buf[offset..])?;
        offset += n;

        let poll = buf[offset] as i8;
        offset += 1;

        let precision = buf[offset] as i8;
        offset += 1;

        let (root_delay, n) = ShortFormat::from_bytes(&buf[offset..])?;
        offset += n;

        let (root_dispersion, n) = ShortFormat::from_bytes(&buf[offset..])?;
        offset += n;

        let (reference_id, n) = ReferenceIdentifier::from_bytes(&buf[offset..])?;
        offset += n;

        let (reference_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;

        let (origin_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;

        let (receive_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;

        let (transmit_timestamp, n) = TimestampFormat::from_bytes(&buf[offset..])?;
        offset += n;

        Ok((
            Packet {
                leap_indicator,
                version,
                mode,
                stratum,
                poll,
                precision,
                root_delay,
                root_dispersion,
                reference_id,
                reference_timestamp,
                origin_timestamp,
                receive_timestamp,
                transmit_timestamp,
            },
            offset,
        ))
    }
}

// Writers.

impl ToBytes for ShortFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        NetworkEndian::write_u16(&mut buf[..2], self.seconds);
        NetworkEndian::write_u16(&mut buf[2..4], self.fraction);
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for TimestampFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        NetworkEndian::write_u32(&mut buf[..4], self.seconds);
        NetworkEndian::write_u32(&mut buf[4..8], self.fraction);
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for Stratum {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[0] = self.0;
        Ok(1)
    }
}

impl ToBytes for ReferenceIdentifier {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;
        buf[..4].copy_from_slice(&self.0);
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for (LeapIndicator, Version, Mode) {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, 1)?;
        buf[0] = pack_li_vn_mode(*self)?;
        Ok(1)
    }
}

/// Pack the first header byte, refusing a version that does not fit 3 bits.
pub(super) fn pack_li_vn_mode(
    (li, vn, mode): (LeapIndicator, Version, Mode),
) -> Result<u8, FormatError> {
    if vn.0 > Version::MAX_WIRE {
        return Err(FormatError::FieldOverflow {
            field: "version",
            value: vn.0 as u64,
            bits: 3,
        });
    }
    Ok(((li as u8) << 6) | (vn.0 << 3) | mode as u8)
}

impl ToBytes for Packet {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError> {
        check_len(buf, Self::PACKED_SIZE_BYTES)?;

        let mut offset = 0;

        let li_vn_mode = (self.leap_indicator, self.version, self.mode);
        offset += li_vn_mode.to_bytes(&mut buf[offset..])?;
        offset += self.stratum.to_bytes(&mut buf[offset..])?;
        buf[offset] = self.poll as u8;
        offset += 1;
        buf[offset] = self.precision as u8;
        offset += 1;
        offset += self.root_delay.to_bytes(&mut buf[offset..])?;
        offset += self.root_dispersion.to_bytes(&mut buf[offset..])?;
        offset += self.reference_id.to_bytes(&mut buf[offset..])?;
        offset += self.reference_timestamp.to_bytes(&mut buf[offset..])?;
        offset += self.origin_timestamp.to_bytes(&mut buf[offset..])?;
        offset += self.receive_timestamp.to_bytes(&mut buf[offset..])?;
        offset += self.transmit_timestamp.to_bytes(&mut buf[offset..])?;

        Ok(offset)
    }
}
