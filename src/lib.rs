// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `plugwatch` - an idle-shutoff watchdog for smart plugs with energy
//! monitoring.
//!
//! The monitor polls a plug's reported current draw and powers it off after
//! two consecutive low-current polling cycles, so an appliance left idle -
//! a finished washing machine, a 3D printer after a job - does not sit on
//! standby power indefinitely. A single low reading never triggers a
//! shutoff: the debounce suppresses transient dips like a washer pausing
//! between cycles.
//!
//! # Components
//!
//! - [`DeviceLink`]: capability to fetch telemetry and command the relay.
//!   [`HttpLink`] implements it over the plug's `/cm?cmnd=` web API.
//! - [`monitor::evaluate`]: the pure decision engine.
//! - [`PlugMonitor`]: the poll/control loop owning the mutable state and a
//!   bounded activity log (100 entries, oldest evicted first).
//! - [`api`]: action selectors and JSON rendering for whatever surface
//!   fronts the monitor.
//!
//! # Quick Start
//!
//! ```no_run
//! use plugwatch::{HttpLink, MonitorConfig, PlugMonitor};
//!
//! #[tokio::main]
//! async fn main() -> plugwatch::Result<()> {
//!     let config = MonitorConfig::new("192.168.1.58")
//!         .with_device_name("washing-machine")
//!         .with_low_threshold_ma(30);
//!
//!     let link = HttpLink::from_config(&config)?;
//!     let monitor = PlugMonitor::new(link, &config);
//!
//!     // Poll every 30 seconds until shutdown.
//!     monitor.run(config.check_interval()).await;
//!     Ok(())
//! }
//! ```
//!
//! # On-Demand Operation
//!
//! No timer is mandated: a request handler can drive one cycle per request
//! instead.
//!
//! ```no_run
//! use plugwatch::{Action, HttpLink, MonitorConfig, PlugMonitor, api};
//!
//! # async fn handle(selector: Option<&str>) -> plugwatch::Result<()> {
//! let config = MonitorConfig::new("192.168.1.58");
//! let monitor = PlugMonitor::new(HttpLink::from_config(&config)?, &config);
//!
//! let response = api::dispatch(&monitor, Action::parse(selector)).await;
//! println!("{response}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod link;
pub mod monitor;

pub use api::Action;
pub use config::{ConfigError, MonitorConfig};
pub use error::{LinkError, Result};
#[cfg(feature = "http")]
pub use link::HttpLink;
pub use link::{DeviceLink, PlugStatus};
pub use monitor::{Decision, MonitorState, PlugMonitor, StatusSnapshot, Verdict};
