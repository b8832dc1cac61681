// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of device status responses.
//!
//! The plug answers a `Status 0` query with a JSON document containing the
//! relay section (`StatusSTS`) and the sensor section (`StatusSNS`). Both
//! sections, and every data point inside them, are optional: firmware
//! without energy monitoring simply omits the `ENERGY` block. Missing data
//! points decode to zero current and power off rather than an error.

use serde::Deserialize;

use super::PlugStatus;

/// Full status response from a `Status 0` query.
///
/// # Examples
///
/// ```
/// use plugwatch::link::DeviceStatus;
///
/// let json = r#"{
///     "StatusSTS": { "POWER": "ON" },
///     "StatusSNS": {
///         "Time": "2024-01-01T12:00:00",
///         "ENERGY": { "Power": 10, "Voltage": 230, "Current": 0.045 }
///     }
/// }"#;
/// let status: DeviceStatus = serde_json::from_str(json).unwrap();
/// assert!(status.power_on());
/// assert_eq!(status.current_ma(), 45);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatus {
    /// Relay status section.
    #[serde(rename = "StatusSTS")]
    pub status_sts: Option<RelayStatus>,

    /// Sensor status section containing energy data.
    #[serde(rename = "StatusSNS")]
    pub status_sns: Option<SensorStatus>,
}

impl DeviceStatus {
    /// Returns the reported relay state, defaulting to off when absent.
    #[must_use]
    pub fn power_on(&self) -> bool {
        self.status_sts.as_ref().is_some_and(RelayStatus::is_on)
    }

    /// Returns the reported current draw in milliamps, defaulting to zero
    /// when the device reports no energy data.
    #[must_use]
    pub fn current_ma(&self) -> u32 {
        self.status_sns
            .as_ref()
            .and_then(|s| s.energy.as_ref())
            .map_or(0, EnergyReading::current_ma)
    }

    /// Collapses the response into the link-level status snapshot.
    #[must_use]
    pub fn to_plug_status(&self) -> PlugStatus {
        PlugStatus {
            current_ma: self.current_ma(),
            power_on: self.power_on(),
        }
    }
}

/// Relay state section of a status response.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayStatus {
    /// Relay state string (`"ON"` / `"OFF"`).
    #[serde(rename = "POWER", alias = "POWER1", default)]
    pub power: String,
}

impl RelayStatus {
    /// Returns `true` if the relay reports itself as on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power.eq_ignore_ascii_case("on")
    }
}

/// Sensor status section wrapping energy data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SensorStatus {
    /// Timestamp of the reading.
    #[serde(default)]
    pub time: String,

    /// Energy monitoring data.
    #[serde(rename = "ENERGY")]
    pub energy: Option<EnergyReading>,
}

/// Energy monitoring data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnergyReading {
    /// Current power consumption in Watts.
    #[serde(default)]
    pub power: u32,

    /// Voltage in Volts.
    #[serde(default)]
    pub voltage: u16,

    /// Current in Amperes.
    #[serde(default)]
    pub current: f32,
}

impl EnergyReading {
    /// Returns the current draw in milliamps.
    #[must_use]
    pub fn current_ma(&self) -> u32 {
        // Reported currents are a few amperes at most; the product fits u32.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ma = (self.current.max(0.0) * 1000.0).round() as u32;
        ma
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_status() {
        let json = r#"{
            "StatusSTS": { "POWER": "ON" },
            "StatusSNS": {
                "Time": "2024-01-01T12:00:00",
                "ENERGY": { "Power": 45, "Voltage": 230, "Current": 0.196 }
            }
        }"#;

        let status: DeviceStatus = serde_json::from_str(json).unwrap();
        assert!(status.power_on());
        assert_eq!(status.current_ma(), 196);

        let energy = status.status_sns.unwrap().energy.unwrap();
        assert_eq!(energy.power, 45);
        assert_eq!(energy.voltage, 230);
    }

    #[test]
    fn missing_sections_default_to_idle() {
        let status: DeviceStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.power_on());
        assert_eq!(status.current_ma(), 0);

        let plug = status.to_plug_status();
        assert_eq!(plug.current_ma, 0);
        assert!(!plug.power_on);
    }

    #[test]
    fn missing_energy_block_defaults_current() {
        let json = r#"{
            "StatusSTS": { "POWER": "ON" },
            "StatusSNS": { "Time": "2024-01-01T12:00:00" }
        }"#;

        let status: DeviceStatus = serde_json::from_str(json).unwrap();
        assert!(status.power_on());
        assert_eq!(status.current_ma(), 0);
    }

    #[test]
    fn relay_alias_power1() {
        let json = r#"{ "StatusSTS": { "POWER1": "ON" } }"#;
        let status: DeviceStatus = serde_json::from_str(json).unwrap();
        assert!(status.power_on());
    }

    #[test]
    fn relay_state_is_case_insensitive() {
        let relay: RelayStatus = serde_json::from_str(r#"{ "POWER": "on" }"#).unwrap();
        assert!(relay.is_on());

        let relay: RelayStatus = serde_json::from_str(r#"{ "POWER": "OFF" }"#).unwrap();
        assert!(!relay.is_on());
    }

    #[test]
    fn current_rounds_to_nearest_milliamp() {
        let energy = EnergyReading {
            power: 0,
            voltage: 230,
            current: 0.0304,
        };
        assert_eq!(energy.current_ma(), 30);
    }
}
