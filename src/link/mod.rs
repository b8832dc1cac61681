// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device link abstraction.
//!
//! A [`DeviceLink`] wraps the plug's network telemetry/command protocol
//! behind two operations: fetch the current status and set the relay state.
//! The link performs no retries - retry policy, if any, belongs to the
//! caller.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
mod response;

#[cfg(feature = "http")]
pub use http::{Credentials, HttpLink};
#[cfg(feature = "http")]
pub use response::{DeviceStatus, EnergyReading, RelayStatus, SensorStatus};

use crate::error::LinkError;

/// A snapshot of the plug's reported telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlugStatus {
    /// Last reported current draw in milliamps.
    pub current_ma: u32,
    /// Last reported relay state.
    pub power_on: bool,
}

/// Capability to fetch plug telemetry and command the relay over the network.
#[allow(async_fn_in_trait)]
pub trait DeviceLink {
    /// Queries the device for its current draw and relay state.
    ///
    /// Data points the device omits from its response default to zero
    /// current and power off; a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` on connection, timeout, or protocol failure.
    async fn fetch_status(&self) -> Result<PlugStatus, LinkError>;

    /// Commands the relay on or off.
    ///
    /// # Errors
    ///
    /// Returns `LinkError` if the command could not be delivered.
    async fn set_power(&self, on: bool) -> Result<(), LinkError>;
}
