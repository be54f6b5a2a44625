// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging initialization
//!
//! Slot calls log through the `log` facade (`trace` per call, `debug` per
//! failure). Hosts that have no logger of their own can install
//! `env_logger` with [`init_env`].

use crate::status::Status;

/// Log level for shlink logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    #[default]
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl LogLevel {
    /// Level for a count of `-v` flags on top of `base`
    #[must_use]
    pub fn raised(self, steps: u8) -> Self {
        let levels = [
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ];
        let index = (self as usize + usize::from(steps)).min(levels.len() - 1);
        levels[index]
    }
}

/// Initialize logging with environment variable override
///
/// Reads `RUST_LOG` if set, otherwise uses `default_level`.
pub fn init_env(default_level: LogLevel) -> Status {
    let filter: log::LevelFilter = default_level.into();

    match env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(filter.to_string()),
    )
    .format_timestamp_millis()
    .try_init()
    {
        Ok(()) => Status::Ok,
        Err(_) => Status::Fail,
    }
}
