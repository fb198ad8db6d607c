// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use crate::protocol;

/// Header values written into every reply.
///
/// The echo server does not discipline its clock, so these never change at
/// runtime. The defaults describe a stratum 2 NTPv3 server with a zero root
/// delay and dispersion and an unset reference identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplyState {
    /// Leap indicator warning of impending leap second.
    pub leap_indicator: protocol::LeapIndicator,
    /// Protocol version written into replies.
    pub version: protocol::Version,
    /// Stratum level of this server.
    pub stratum: protocol::Stratum,
    /// Poll exponent, in log2 seconds.
    pub poll: i8,
    /// Precision of the server's clock, in log2 seconds.
    pub precision: i8,
    /// Total round-trip delay to the primary reference source.
    pub root_delay: protocol::ShortFormat,
    /// Total dispersion to the primary reference source.
    pub root_dispersion: protocol::ShortFormat,
    /// Reference clock identifier.
    pub reference_id: protocol::ReferenceIdentifier,
    /// How far the reference timestamp trails the receive timestamp, in seconds.
    pub reference_age_secs: u32,
}

impl Default for ReplyState {
    fn default() -> Self {
        ReplyState {
            leap_indicator: protocol::LeapIndicator::NoWarning,
            version: protocol::Version::V3,
            stratum: protocol::Stratum::SECONDARY_MIN,
            poll: 10,
            precision: 0,
            root_delay: protocol::ShortFormat::default(),
            root_dispersion: protocol::ShortFormat::default(),
            reference_id: protocol::ReferenceIdentifier::UNSET,
            reference_age_secs: 5,
        }
    }
}
