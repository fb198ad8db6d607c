// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! A minimal NTP time echo server.
//!
//! The server answers 48-byte NTP client requests with a stratum 2 reply built
//! from the local wall clock. It never synchronizes to an upstream source.
//!
//! # Architecture
//!
//! Two tokio tasks share one UDP socket:
//!
//! - the [ingestion stage](ingest) receives datagrams, stamps their arrival
//!   time and pushes them onto an unbounded handoff channel;
//! - the [processing stage](process) decodes each request, builds the reply
//!   and sends it back to the peer.
//!
//! The [lifecycle controller](server) binds the socket, starts both stages and
//! joins them after a shutdown signal.

#![warn(missing_docs)]

// Re-export protocol types from echo_proto for convenience.
pub use echo_proto::{protocol, unix_time};

/// Server configuration values shared by the builder and the binaries.
pub mod config;

/// Error types for the echo server.
pub mod error;

/// Receive side of the socket: the ingestion stage.
pub mod ingest;

/// Log subscriber setup with timezone-aware timestamps.
pub mod logging;

/// Pure request handling: decode, build, serialize.
pub mod pipeline;

/// Liveness probe client.
pub mod probe;

/// Reply side of the socket: the processing stage.
pub mod process;

/// Reply packet construction.
pub mod response;

/// Server builder, lifecycle and shutdown handle.
pub mod server;

/// Fixed header values carried by every reply.
pub mod state;
