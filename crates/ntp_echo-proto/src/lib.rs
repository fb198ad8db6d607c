// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP packet types, the fixed 48-byte wire codec, and timestamp conversion.
//!
//! This crate provides the pieces of RFC 5905 that a single-hop time echo
//! service needs: the packet header layout, big-endian encoding and decoding,
//! and conversion between Unix wall-clock time and the NTP 32.32 fixed-point
//! timestamp format.

#![warn(missing_docs)]

/// Error types for packet encoding and decoding.
pub mod error;

/// NTP protocol types and constants (RFC 5905).
pub mod protocol;

/// Unix time conversion utilities for NTP timestamps.
pub mod unix_time;
