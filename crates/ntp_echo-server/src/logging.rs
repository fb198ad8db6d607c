// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Tracing subscriber setup for the server binary.
//!
//! Log lines are stamped in UTC unless `TZ` names another zone, in which case
//! the local time for that zone is used. The filter follows `RUST_LOG` and
//! defaults to `info`.

use std::fmt;

use chrono::{Local, Utc};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Environment variable selecting the timezone of log timestamps.
pub const TZ_ENV: &str = "TZ";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

/// Which clock stamps log lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogClock {
    /// Coordinated Universal Time.
    Utc,
    /// The process-local zone (as configured by `TZ`).
    Local,
}

impl LogClock {
    /// Pick a clock from a `TZ` value. Unset, empty and `UTC` all mean UTC.
    pub fn from_tz(tz: Option<&str>) -> Self {
        match tz.map(str::trim) {
            None | Some("") => LogClock::Utc,
            Some(tz) if tz.eq_ignore_ascii_case("UTC") || tz.eq_ignore_ascii_case(":UTC") => {
                LogClock::Utc
            }
            Some(_) => LogClock::Local,
        }
    }

    /// Pick a clock from the process environment.
    pub fn from_env() -> Self {
        Self::from_tz(std::env::var(TZ_ENV).ok().as_deref())
    }

    /// Format the current time the way log lines show it.
    pub fn now_string(&self) -> String {
        match self {
            LogClock::Utc => Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            LogClock::Local => Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl FormatTime for LogClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", self.now_string())
    }
}

/// Install the global subscriber: `EnvFilter` (default `info`) plus a `fmt`
/// layer stamped by `clock`. Does nothing if a subscriber is already set.
pub fn init(clock: LogClock) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_timer(clock))
        .try_init();
}
