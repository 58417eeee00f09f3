use crate::core::gamepad::{Gamepad, PollOutcome};
use crate::domain::model::{ControllerEvent, SessionReport, StopReason};
use crate::domain::ports::{ControllerListener, InputSource};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Runs the poll loop: one poll per tick, decoded events dispatched in order.
pub struct TeleopEngine<I: InputSource, L: ControllerListener> {
    gamepad: Gamepad<I>,
    listener: L,
    poll_rate: Duration,
    monitor: SystemMonitor,
}

impl<I: InputSource, L: ControllerListener> TeleopEngine<I, L> {
    pub fn new(gamepad: Gamepad<I>, listener: L, poll_rate: Duration) -> Self {
        Self::new_with_monitoring(gamepad, listener, poll_rate, false)
    }

    pub fn new_with_monitoring(
        gamepad: Gamepad<I>,
        listener: L,
        poll_rate: Duration,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            gamepad,
            listener,
            poll_rate,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn gamepad_mut(&mut self) -> &mut Gamepad<I> {
        &mut self.gamepad
    }

    /// Polls until `shutdown` resolves, the controller disconnects or the
    /// poller is stopped. The listener's `on_shutdown` runs on every exit path.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<SessionReport>
    where
        F: Future<Output = ()>,
    {
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut polls = 0u64;
        let mut events = 0u64;

        tracing::info!(
            "Teleop session started on '{}' at {:?} poll rate",
            self.gamepad.name(),
            self.poll_rate
        );
        self.monitor.log_stats("Session start");
        self.gamepad.start();

        let outcome = self.poll_loop(shutdown, &mut polls, &mut events).await;

        self.gamepad.stop();
        self.listener.on_shutdown().await;
        self.monitor.log_stats("Session end");

        let stop_reason = outcome?;
        let report = SessionReport {
            controller: self.gamepad.name().to_string(),
            started_at,
            elapsed_ms: clock.elapsed().as_millis() as u64,
            polls,
            events,
            stop_reason,
        };
        tracing::info!(
            "Teleop session ended ({:?}): {} polls, {} events in {} ms",
            report.stop_reason,
            report.polls,
            report.events,
            report.elapsed_ms
        );
        Ok(report)
    }

    async fn poll_loop<F>(&mut self, shutdown: F, polls: &mut u64, events: &mut u64) -> Result<StopReason>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.poll_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down...");
                    return Ok(StopReason::Shutdown);
                }
                _ = ticker.tick() => {
                    if !self.gamepad.is_running() {
                        return Ok(StopReason::Stopped);
                    }

                    let work = Instant::now();
                    let outcome = match self.gamepad.poll() {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::error!("Controller poll failed: {}", e);
                            return Err(e);
                        }
                    };
                    *polls += 1;

                    match outcome {
                        PollOutcome::Events(batch) => {
                            *events += batch.len() as u64;
                            for event in batch {
                                self.dispatch(event).await;
                            }
                        }
                        PollOutcome::Disconnected => {
                            self.listener.on_controller_disconnected().await;
                            return Ok(StopReason::Disconnected);
                        }
                    }
                    self.monitor.record_tick(work.elapsed(), self.poll_rate);
                }
            }
        }
    }

    async fn dispatch(&self, event: ControllerEvent) {
        match event {
            ControllerEvent::ButtonPressed(button) => self.listener.on_button_pressed(button).await,
            ControllerEvent::ButtonReleased(button) => {
                self.listener.on_button_released(button).await
            }
            ControllerEvent::AxisMotion(axis, value) => {
                self.listener.on_axis_motion(axis, value).await
            }
        }
    }
}
