// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error type for the 48-byte packet codec.
//!
//! Every variant describes a single bad packet. None of them is fatal to a
//! server: the request is dropped and the loop moves on.

use std::fmt;

/// Errors that can occur while packing or unpacking an NTP packet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatError {
    /// The buffer is too short for the expected data.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// A field could not be interpreted while unpacking.
    InvalidField {
        /// Name of the field that was invalid.
        field: &'static str,
        /// The invalid value.
        value: u64,
    },
    /// A field value does not fit its width on the wire.
    FieldOverflow {
        /// Name of the field that overflowed.
        field: &'static str,
        /// The value that was too wide.
        value: u64,
        /// Width of the wire field in bits.
        bits: u8,
    },
}

impl FormatError {
    /// Whether this error means "the peer sent something that is not a packet".
    ///
    /// Short buffers and unpack failures both qualify; callers drop the
    /// datagram without replying.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FormatError::BufferTooShort { .. } | FormatError::InvalidField { .. }
        )
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "invalid NTP packet: too short (needed {} bytes, got {})",
                    needed, available
                )
            }
            FormatError::InvalidField { field, value } => {
                write!(f, "invalid NTP packet: unpack error in {}: {}", field, value)
            }
            FormatError::FieldOverflow { field, value, bits } => {
                write!(f, "{} value {} does not fit in {} bits", field, value, bits)
            }
        }
    }
}

impl From<FormatError> for std::io::Error {
    fn from(err: FormatError) -> std::io::Error {
        let kind = match &err {
            FormatError::BufferTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            FormatError::InvalidField { .. } => std::io::ErrorKind::InvalidData,
            FormatError::FieldOverflow { .. } => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, err)
    }
}

impl std::error::Error for FormatError {}
