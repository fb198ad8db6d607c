// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use crate::error::FormatError;

/// Types that have a constant size when written to or read from bytes.
pub trait ConstPackedSizeBytes {
    /// The constant size in bytes when this type is packed for network transmission.
    const PACKED_SIZE_BYTES: usize;
}

/// Parse a type from a byte slice, returning the parsed value and the number
/// of bytes consumed.
///
/// Failures are reported as [`FormatError`]; callers in the server treat
/// every decode failure as a malformed datagram.
pub trait FromBytes: Sized {
    /// Parse from the given byte slice. Returns the parsed value and the
    /// number of bytes consumed from the front of `buf`.
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), FormatError>;
}

/// Serialize a type into a byte slice, returning the number of bytes written.
pub trait ToBytes {
    /// Write this value into the given byte slice. Returns the number of bytes
    /// written. Fails with [`FormatError::BufferTooShort`] if `buf` is too short.
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, FormatError>;
}
