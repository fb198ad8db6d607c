// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Types and constants for the NTP packet header.
//!
//! Every type is packed and unpacked over byte slices through the
//! [`FromBytes`]/[`ToBytes`] traits, with byteorder's `NetworkEndian` doing
//! the big-endian work.
//!
//! Documentation is largely derived from IETF RFC 5905.

/// Conventional NTP port number.
pub const PORT: u16 = 123;

/// Size of an NTP packet header without extension fields or MAC.
pub const PACKET_LEN: usize = 48;

mod bytes;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
