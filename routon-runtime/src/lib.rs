// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `routon` library provides the runtime environment for the Routon
/// autonomous routine controller.
///
/// A routine is an ordered list of timed or distance-bounded machine steps.
/// The runtime polls every step executor once per control cycle; the
/// sequencer in the `runtime` module keeps the ordered completion state and
/// is the only memory shared between executors. The `kernel` module holds
/// the step executors and assembles a routine from configuration, and the
/// `device` module defines the actuator and stopwatch contracts together
/// with virtual devices for simulation.
pub mod core;
pub mod device;
pub mod kernel;
pub mod logger;

#[macro_use]
extern crate log;

mod config;

pub use self::config::*;

pub mod runtime;
pub use self::runtime::Error;
pub use self::runtime::Runtime;

/// Routon runtime module containing various constants.
pub mod consts {
    use std::time::Duration;

    /// Routon runtime version.
    ///
    /// # Example
    ///
    /// ```
    /// use routon::consts::VERSION;
    ///
    /// println!("Routon runtime version: {}", VERSION);
    /// ```
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Default control cycle interval.
    ///
    /// Every executor of the scheduled routine is polled once per cycle.
    pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_millis(20);

    /// Component delay threshold.
    ///
    /// A component spending more than this per tick delays the whole cycle.
    pub const COMPONENT_DELAY_THRESHOLD: Duration = Duration::from_millis(1);
}

/// Read a TOML configuration document from disk.
pub fn from_file<T, P>(path: P) -> runtime::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<std::path::Path>,
{
    let contents = std::fs::read_to_string(path).map_err(Error::Io)?;

    toml::from_str(&contents).map_err(Error::Parse)
}
