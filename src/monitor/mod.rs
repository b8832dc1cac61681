// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The poll/control loop.
//!
//! [`PlugMonitor`] owns the mutable [`MonitorState`] for one plug and
//! orchestrates each cycle: fetch telemetry over the device link, run the
//! decision engine, apply the outcome, and issue the automatic shutoff when
//! two consecutive low-current cycles have been observed.
//!
//! Every operation takes the state mutex for its full cycle, so concurrent
//! callers serialize and the log stays ordered by operation completion. No
//! cadence is imposed here - callers may invoke [`PlugMonitor::refresh_status`]
//! on demand (for example once per incoming request) or drive it periodically
//! via [`PlugMonitor::run`].

mod decision;
mod state;

pub use decision::{Decision, Verdict, evaluate};
pub use state::{LOG_CAPACITY, LogEntry, MonitorState, StatusSnapshot};

use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::MonitorConfig;
use crate::error::LinkError;
use crate::link::DeviceLink;

/// Idle-shutoff monitor for a single smart plug.
///
/// # Examples
///
/// ```no_run
/// use plugwatch::{HttpLink, MonitorConfig, PlugMonitor};
///
/// # async fn example() -> plugwatch::Result<()> {
/// let config = MonitorConfig::new("192.168.1.58").with_device_name("washer");
/// let link = HttpLink::from_config(&config)?;
/// let monitor = PlugMonitor::new(link, &config);
///
/// // One on-demand cycle.
/// let snapshot = monitor.refresh_status().await;
/// println!("{}", snapshot.status);
///
/// // Or poll forever at the configured cadence.
/// monitor.run(config.check_interval()).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PlugMonitor<L: DeviceLink> {
    link: L,
    device: String,
    threshold_ma: u32,
    state: Mutex<MonitorState>,
}

impl<L: DeviceLink> PlugMonitor<L> {
    /// Creates a monitor for the given link, taking the idle threshold and
    /// device name from the configuration.
    #[must_use]
    pub fn new(link: L, config: &MonitorConfig) -> Self {
        Self {
            link,
            device: config.device_name().to_string(),
            threshold_ma: config.low_threshold_ma(),
            state: Mutex::new(MonitorState::new()),
        }
    }

    /// Returns the idle threshold in milliamps.
    #[must_use]
    pub fn threshold_ma(&self) -> u32 {
        self.threshold_ma
    }

    /// Runs one complete status cycle and returns the resulting snapshot.
    ///
    /// On a successful fetch the decision engine runs, the state is updated,
    /// and the resulting status message is appended to the log. When the
    /// decision calls for a shutoff, `Power OFF` is issued to the device; a
    /// failure there is logged but the decision state stands - the state
    /// reflects the decision, not confirmed device compliance, until the
    /// next successful refresh.
    ///
    /// On a fetch failure the error is appended to the log and every other
    /// field keeps its previous value.
    pub async fn refresh_status(&self) -> StatusSnapshot {
        let mut state = self.state.lock().await;

        match self.link.fetch_status().await {
            Ok(reading) => {
                let decision = decision::evaluate(
                    state.low_flag(),
                    reading.current_ma,
                    reading.power_on,
                    self.threshold_ma,
                );

                state.record_reading(reading.current_ma, reading.power_on);
                state.apply_decision(&decision);

                if decision.shutoff {
                    tracing::info!(device = %self.device, "idle plug detected, shutting off");
                    if let Err(e) = self.link.set_power(false).await {
                        tracing::warn!(device = %self.device, error = %e, "automatic shutoff failed");
                        state.push_log(format!("Automatic shutoff failed: {e}"));
                    }
                }

                let message = state.status_message().to_string();
                state.push_log(message);
            }
            Err(e) => {
                tracing::warn!(device = %self.device, error = %e, "status fetch failed");
                state.push_log(format!("Error during status update: {e}"));
            }
        }

        state.snapshot()
    }

    /// Manually turns the plug on.
    ///
    /// Logs the outcome either way; decision state is untouched.
    ///
    /// # Errors
    ///
    /// Returns the link error if the command fails.
    pub async fn turn_on(&self) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        match self.link.set_power(true).await {
            Ok(()) => {
                state.push_log("Manual turn ON");
                Ok(())
            }
            Err(e) => {
                state.push_log(format!("Failed ON: {e}"));
                Err(e)
            }
        }
    }

    /// Manually turns the plug off.
    ///
    /// Logs the outcome either way; decision state is untouched.
    ///
    /// # Errors
    ///
    /// Returns the link error if the command fails.
    pub async fn turn_off(&self) -> Result<(), LinkError> {
        let mut state = self.state.lock().await;
        match self.link.set_power(false).await {
            Ok(()) => {
                state.push_log("Manual turn OFF");
                Ok(())
            }
            Err(e) => {
                state.push_log(format!("Failed OFF: {e}"));
                Err(e)
            }
        }
    }

    /// Returns a copy of the rendered activity log, oldest first.
    pub async fn log_snapshot(&self) -> Vec<String> {
        self.state.lock().await.rendered_log()
    }

    /// Returns a snapshot of the current state without polling the device.
    pub async fn state_snapshot(&self) -> StatusSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Drives the monitor periodically, one refresh cycle per tick.
    ///
    /// Never returns; spawn it or race it against a shutdown signal. A tick
    /// that falls behind (slow device, timeout) is delayed rather than
    /// bursted.
    pub async fn run(&self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh_status().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::testing::{FetchStep, ScriptedLink};

    fn monitor(link: ScriptedLink) -> PlugMonitor<ScriptedLink> {
        let config = MonitorConfig::new("test-plug").with_low_threshold_ma(30);
        PlugMonitor::new(link, &config)
    }

    fn reading(current_ma: u32, power_on: bool) -> FetchStep {
        FetchStep::Reading {
            current_ma,
            power_on,
        }
    }

    #[tokio::test]
    async fn in_use_cycle_updates_state() {
        let m = monitor(ScriptedLink::new([reading(450, true)]));

        let snap = m.refresh_status().await;

        assert_eq!(snap.current, 450);
        assert!(snap.power);
        assert_eq!(snap.status, "Machine is in use");

        let log = m.log_snapshot().await;
        assert_eq!(log.len(), 1);
        assert!(log[0].ends_with("Machine is in use"));
    }

    #[tokio::test]
    async fn two_low_cycles_shut_the_plug_off() {
        let link = ScriptedLink::new([reading(10, true), reading(10, true)]);
        let m = monitor(link);

        let first = m.refresh_status().await;
        assert_eq!(first.status, "Low current detected. Monitoring next cycle...");

        let second = m.refresh_status().await;
        assert_eq!(second.status, "Machine not in use, turned OFF");

        // Exactly one shutoff command, and it commands off.
        assert_eq!(m.link.commands(), vec![false]);

        let log = m.log_snapshot().await;
        assert_eq!(log.len(), 2);
        assert!(log[0].contains("Low current detected"));
        assert!(log[1].contains("turned OFF"));
    }

    #[tokio::test]
    async fn high_cycle_interrupts_debounce() {
        let link = ScriptedLink::new([reading(10, true), reading(200, true), reading(10, true)]);
        let m = monitor(link);

        m.refresh_status().await;
        m.refresh_status().await;
        let third = m.refresh_status().await;

        // The second low is a fresh first strike, so no shutoff was issued.
        assert_eq!(third.status, "Low current detected. Monitoring next cycle...");
        assert!(m.link.commands().is_empty());
    }

    #[tokio::test]
    async fn powered_off_cycle_resets_debounce() {
        let link = ScriptedLink::new([reading(10, true), reading(0, false), reading(10, true)]);
        let m = monitor(link);

        m.refresh_status().await;
        let off = m.refresh_status().await;
        assert_eq!(off.status, "Device is OFF");

        let third = m.refresh_status().await;
        assert_eq!(third.status, "Low current detected. Monitoring next cycle...");
        assert!(m.link.commands().is_empty());
    }

    #[tokio::test]
    async fn reading_at_threshold_counts_as_low() {
        let link = ScriptedLink::new([reading(30, true), reading(30, true)]);
        let m = monitor(link);

        m.refresh_status().await;
        let second = m.refresh_status().await;

        assert_eq!(second.status, "Machine not in use, turned OFF");
        assert_eq!(m.link.commands(), vec![false]);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_state_stale() {
        let link = ScriptedLink::new([
            reading(450, true),
            FetchStep::Fail("device unreachable".to_string()),
        ]);
        let m = monitor(link);

        let before = m.refresh_status().await;
        let after = m.refresh_status().await;

        // Stale state preserved in full.
        assert_eq!(after.current, before.current);
        assert_eq!(after.power, before.power);
        assert_eq!(after.status, before.status);
        assert_eq!(after.last_updated, before.last_updated);

        // Exactly one new log entry, carrying the error text.
        let log = m.log_snapshot().await;
        assert_eq!(log.len(), 2);
        assert!(log[1].contains("Error during status update"));
        assert!(log[1].contains("device unreachable"));
    }

    #[tokio::test]
    async fn fetch_failure_preserves_armed_debounce_flag() {
        let link = ScriptedLink::new([
            reading(10, true),
            FetchStep::Fail("device unreachable".to_string()),
            reading(10, true),
        ]);
        let m = monitor(link);

        let first = m.refresh_status().await;
        assert_eq!(first.status, "Low current detected. Monitoring next cycle...");

        // The failed cycle leaves the flag armed.
        m.refresh_status().await;
        assert!(m.state.lock().await.low_flag());

        // So the next low cycle is the second strike.
        let third = m.refresh_status().await;
        assert_eq!(third.status, "Machine not in use, turned OFF");
        assert_eq!(m.link.commands(), vec![false]);
    }

    #[tokio::test]
    async fn failed_shutoff_keeps_decision_state() {
        let link =
            ScriptedLink::new([reading(10, true), reading(10, true)]).with_failing_relay();
        let m = monitor(link);

        m.refresh_status().await;
        let snap = m.refresh_status().await;

        // Decision state is applied even though the relay command failed.
        assert_eq!(snap.status, "Machine not in use, turned OFF");

        let log = m.log_snapshot().await;
        assert_eq!(log.len(), 3);
        assert!(log[1].contains("Automatic shutoff failed"));
        assert!(log[2].contains("turned OFF"));

        // The debounce flag was reset, so the next low cycle starts over.
        assert!(!m.state.lock().await.low_flag());
    }

    #[tokio::test]
    async fn manual_turn_on_logs_and_commands() {
        let m = monitor(ScriptedLink::new([]));

        m.turn_on().await.unwrap();

        assert_eq!(m.link.commands(), vec![true]);
        let log = m.log_snapshot().await;
        assert!(log[0].ends_with("Manual turn ON"));
    }

    #[tokio::test]
    async fn manual_turn_off_failure_is_surfaced_and_logged() {
        let m = monitor(ScriptedLink::new([]).with_failing_relay());

        let result = m.turn_off().await;
        assert!(result.is_err());

        let log = m.log_snapshot().await;
        assert!(log[0].contains("Failed OFF"));
        assert!(log[0].contains("relay unreachable"));
    }

    #[tokio::test]
    async fn manual_commands_do_not_touch_decision_state() {
        let link = ScriptedLink::new([reading(10, true), reading(10, true)]);
        let m = monitor(link);

        m.refresh_status().await; // arms the debounce flag
        m.turn_on().await.unwrap();

        // Flag still armed; the next low cycle is the second strike.
        let snap = m.refresh_status().await;
        assert_eq!(snap.status, "Machine not in use, turned OFF");
    }

    #[tokio::test(start_paused = true)]
    async fn run_refreshes_once_per_tick() {
        use std::sync::Arc;

        let link = ScriptedLink::new([
            reading(100, true),
            reading(100, true),
            reading(100, true),
        ]);
        let m = Arc::new(monitor(link));

        let driver = tokio::spawn({
            let m = Arc::clone(&m);
            async move { m.run(Duration::from_secs(30)).await }
        });

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(m.log_snapshot().await.len(), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(m.log_snapshot().await.len(), 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(m.log_snapshot().await.len(), 3);

        driver.abort();
    }

    #[tokio::test]
    async fn state_snapshot_does_not_poll() {
        let m = monitor(ScriptedLink::new([]));

        let snap = m.state_snapshot().await;
        assert_eq!(snap.status, "Initializing...");
        assert_eq!(snap.current, 0);
        assert!(!snap.power);
    }
}
