// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::time;

use crate::error::FormatError;
use crate::protocol;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// The number of seconds in one NTP era (2^32 seconds, approximately 136 years).
///
/// Era 0 spans from 1900-01-01 00:00:00 UTC to 2036-02-07 06:28:15 UTC.
pub const ERA_SECONDS: i64 = 1 << 32;

const NANOS_PER_SEC: u64 = 1_000_000_000;

// 2^32 as a float, the scale of the NTP fraction field.
const FRACTION_SCALE: f64 = 4_294_967_296.0;

/// Describes an instant relative to the `UNIX_EPOCH` - 00:00:00 Coordinated Universal Time (UTC),
/// Thursday, 1 January 1970 in seconds with the fractional part in nanoseconds.
///
/// If the **Instant** describes some moment prior to `UNIX_EPOCH`, both the `secs` and
/// `subsec_nanos` components will be negative.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Instant {
    secs: i64,
    subsec_nanos: i32,
}

impl Instant {
    /// Create a new **Instant** given its `secs` and `subsec_nanos` components.
    ///
    /// To indicate a time following `UNIX_EPOCH`, both `secs` and `subsec_nanos` must be positive.
    /// To indicate a time prior to `UNIX_EPOCH`, both `secs` and `subsec_nanos` must be negative.
    /// Violating these invariants will result in a **panic!**.
    pub fn new(secs: i64, subsec_nanos: i32) -> Instant {
        if secs > 0 && subsec_nanos < 0 {
            panic!("invalid instant: secs was positive but subsec_nanos was negative");
        }
        if secs < 0 && subsec_nanos > 0 {
            panic!("invalid instant: secs was negative but subsec_nanos was positive");
        }
        Instant { secs, subsec_nanos }
    }

    /// The current host wall-clock time.
    ///
    /// ## Example
    ///
    /// ```
    /// println!("{:?}", echo_proto::unix_time::Instant::now());
    /// ```
    pub fn now() -> Self {
        time::SystemTime::now().into()
    }

    /// The "seconds" component of the **Instant**.
    pub fn secs(&self) -> i64 {
        self.secs
    }

    /// The fractional component of the **Instant** in nanoseconds.
    pub fn subsec_nanos(&self) -> i32 {
        self.subsec_nanos
    }
}

impl From<time::SystemTime> for Instant {
    fn from(t: time::SystemTime) -> Self {
        match t.duration_since(time::UNIX_EPOCH) {
            Ok(duration) => Instant::new(duration.as_secs() as i64, duration.subsec_nanos() as i32),
            Err(sys_time_err) => {
                let before = sys_time_err.duration();
                Instant::new(-(before.as_secs() as i64), -(before.subsec_nanos() as i32))
            }
        }
    }
}

/// Split absolute NTP seconds plus a non-negative nanosecond remainder into
/// the 32.32 wire form. The seconds wrap into the 32-bit era.
fn split(ntp_secs: i64, nanos: u64) -> protocol::TimestampFormat {
    protocol::TimestampFormat {
        seconds: ntp_secs.rem_euclid(ERA_SECONDS) as u32,
        fraction: ((nanos << 32) / NANOS_PER_SEC) as u32,
    }
}

impl From<Instant> for protocol::TimestampFormat {
    /// Converts a Unix [`Instant`] to a 32-bit NTP timestamp.
    ///
    /// The fraction is `(nanos * 2^32) / 10^9`, truncated, computed in integers
    /// so repeated conversions never drift. Seconds outside era 0 wrap modulo
    /// 2^32, which is how NTPv4 carries them on the wire.
    fn from(t: Instant) -> Self {
        let mut ntp_secs = t.secs() + EPOCH_DELTA;
        let mut nanos = t.subsec_nanos() as i64;
        if nanos < 0 {
            ntp_secs -= 1;
            nanos += NANOS_PER_SEC as i64;
        }
        split(ntp_secs, nanos as u64)
    }
}

/// Convert Unix time given as floating seconds into an NTP timestamp.
///
/// The fractional remainder is multiplied by 2^32 and truncated. NaN and
/// infinities are rejected with [`FormatError::InvalidField`].
pub fn timestamp_from_unix_secs_f64(t: f64) -> Result<protocol::TimestampFormat, FormatError> {
    if !t.is_finite() {
        return Err(FormatError::InvalidField {
            field: "unix time",
            value: t.to_bits(),
        });
    }
    let ntp = t + EPOCH_DELTA as f64;
    let whole = ntp.floor();
    let fraction = ((ntp - whole) * FRACTION_SCALE) as u64;
    Ok(protocol::TimestampFormat {
        seconds: (whole as i64).rem_euclid(ERA_SECONDS) as u32,
        fraction: fraction.min(u32::MAX as u64) as u32,
    })
}

/// Interpret an NTP timestamp as era-0 Unix seconds.
///
/// Lossy; for log lines and diagnostics only. Anything that goes back on the
/// wire must use the raw [`protocol::TimestampFormat`] halves.
pub fn timestamp_to_unix_secs_f64(ts: protocol::TimestampFormat) -> f64 {
    (ts.seconds as i64 - EPOCH_DELTA) as f64 + ts.fraction as f64 / FRACTION_SCALE
}
