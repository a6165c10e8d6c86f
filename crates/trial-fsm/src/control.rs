use crate::adapters::{ControlAdapter, SetupInfo, SetupStatus};
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use session_core::Timer;
use tracing::{debug, info};

/// Throttled view of the remote control status.
///
/// The first poll always reaches the adapter; afterwards it is consulted at
/// most once per interval, with a shorter interval while idling.
pub struct ControlGate {
    status: SetupStatus,
    active_poll_ms: u64,
    idle_poll_ms: u64,
    timer: Timer,
    polled: bool,
    quit: bool,
}

impl ControlGate {
    pub fn new(active_poll_ms: u64, idle_poll_ms: u64) -> Self {
        Self {
            status: SetupStatus::Ready,
            active_poll_ms,
            idle_poll_ms,
            timer: Timer::new(),
            polled: false,
            quit: false,
        }
    }

    /// Last status seen or pushed.
    pub fn status(&self) -> SetupStatus {
        self.status
    }

    pub fn is_stopped(&self) -> bool {
        self.status.is_stop()
    }

    pub fn is_quitting(&self) -> bool {
        self.quit
    }

    pub fn poll(
        &mut self,
        control: &mut dyn ControlAdapter,
        idle: bool,
    ) -> Result<SetupStatus, SessionError> {
        let interval = if idle {
            self.idle_poll_ms
        } else {
            self.active_poll_ms
        };
        if !self.polled || self.timer.elapsed_time() >= interval {
            let status = control
                .setup_status()
                .adapter(AdapterKind::Control, "setup_status")?;
            if status != self.status {
                debug!(from = %self.status, to = %status, "control status changed");
            }
            self.status = status;
            self.polled = true;
            self.timer.start();
        }
        Ok(self.status)
    }

    pub fn set_status(
        &mut self,
        control: &mut dyn ControlAdapter,
        status: SetupStatus,
    ) -> Result<(), SessionError> {
        control
            .update_setup_info(&SetupInfo::status(status))
            .adapter(AdapterKind::Control, "update_setup_info")?;
        self.status = status;
        Ok(())
    }

    /// End the session at the next state boundary.
    pub fn quit(&mut self, control: &mut dyn ControlAdapter) -> Result<(), SessionError> {
        self.quit = true;
        if !self.status.is_stop() {
            info!("session quitting, pushing stop status");
            self.set_status(control, SetupStatus::Stop)?;
        }
        Ok(())
    }
}
