// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the echo server.
//!
//! Public APIs return `io::Result<T>`. Internally, errors are constructed as
//! [`EchoServerError`] variants and converted to `io::Error` via
//! `From<EchoServerError> for io::Error`, so callers that care can downcast:
//!
//! ```no_run
//! use echo_server::error::{ConfigError, EchoServerError};
//!
//! # fn example(result: std::io::Result<()>) {
//! if let Err(e) = result {
//!     match e.get_ref().and_then(|inner| inner.downcast_ref::<EchoServerError>()) {
//!         Some(EchoServerError::Config(ConfigError::InvalidListenAddress { address, .. })) => {
//!             eprintln!("fix the listen address: {address}")
//!         }
//!         _ => eprintln!("server error: {e}"),
//!     }
//! }
//! # }
//! ```

pub use echo_proto::error::FormatError;

use std::fmt;
use std::io;
use std::time::Duration;

/// Errors that can occur during echo server operations.
#[derive(Debug)]
pub enum EchoServerError {
    /// A request or reply could not be handled at the packet level.
    Protocol(ProtocolError),
    /// Invalid configuration (bad listen address, bad quiet client entry).
    Config(ConfigError),
    /// Underlying I/O error (socket bind, send/recv, task join).
    Io(io::Error),
}

/// Per-packet failures. None of them stops the server.
#[derive(Clone, Debug)]
pub enum ProtocolError {
    /// The datagram is not a decodable NTP packet.
    Malformed(FormatError),
    /// The reply could not be serialized.
    ReplyEncoding(FormatError),
}

/// Server configuration errors.
#[derive(Clone, Debug)]
pub enum ConfigError {
    /// Invalid listen address.
    InvalidListenAddress {
        /// The address that was invalid.
        address: String,
        /// Detail about why it is invalid.
        detail: String,
    },
    /// An entry in the quiet client list is not an IP address.
    InvalidQuietClient {
        /// The offending entry.
        entry: String,
    },
    /// The stage poll interval must be non-zero.
    ZeroPollInterval,
}

/// Why a liveness probe failed.
#[derive(Debug)]
pub enum ProbeError {
    /// No reply arrived in time.
    Timeout {
        /// How long the probe waited.
        waited: Duration,
    },
    /// The reply was not exactly 48 bytes.
    UnexpectedLength {
        /// Length of the datagram received.
        len: usize,
    },
    /// The reply mode was not 4 (server).
    UnexpectedMode {
        /// Mode bits of the reply.
        mode: u8,
    },
    /// Resolving, binding, sending or receiving failed.
    Io(io::Error),
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for EchoServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchoServerError::Protocol(e) => write!(f, "NTP echo protocol error: {e}"),
            EchoServerError::Config(e) => write!(f, "NTP echo config error: {e}"),
            EchoServerError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(e) => write!(f, "{e}"),
            ProtocolError::ReplyEncoding(e) => write!(f, "failed to encode reply: {e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidListenAddress { address, detail } => {
                write!(f, "invalid listen address '{address}': {detail}")
            }
            ConfigError::InvalidQuietClient { entry } => {
                write!(f, "invalid quiet client entry '{entry}': not an IP address")
            }
            ConfigError::ZeroPollInterval => write!(f, "poll interval must be non-zero"),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Timeout { waited } => {
                write!(f, "Healthcheck failure: no reply within {waited:?}")
            }
            ProbeError::UnexpectedLength { len } => write!(f, "Unexpected length: {len}"),
            ProbeError::UnexpectedMode { mode } => write!(f, "Unexpected mode: {mode}"),
            ProbeError::Io(e) => write!(f, "Healthcheck failure: {e}"),
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for EchoServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EchoServerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Malformed(e) | ProtocolError::ReplyEncoding(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

// ── From conversions ────────────────────────────────────────────────

impl From<EchoServerError> for io::Error {
    fn from(err: EchoServerError) -> io::Error {
        let kind = match &err {
            EchoServerError::Protocol(_) => io::ErrorKind::InvalidData,
            EchoServerError::Config(_) => io::ErrorKind::InvalidInput,
            EchoServerError::Io(e) => e.kind(),
        };
        // Preserve the original io::Error directly for the Io variant.
        if let EchoServerError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for EchoServerError {
    fn from(err: io::Error) -> EchoServerError {
        EchoServerError::Io(err)
    }
}

impl From<ProtocolError> for EchoServerError {
    fn from(err: ProtocolError) -> EchoServerError {
        EchoServerError::Protocol(err)
    }
}

impl From<ConfigError> for EchoServerError {
    fn from(err: ConfigError) -> EchoServerError {
        EchoServerError::Config(err)
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> ProbeError {
        ProbeError::Io(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
