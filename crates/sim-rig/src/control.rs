use crate::clock::SessionClock;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};
use trial_fsm::{ControlAdapter, SessionEvent, SetupInfo, SetupStatus, TrialRecord};
use uuid::Uuid;

const STATUSES: [SetupStatus; 7] = [
    SetupStatus::Ready,
    SetupStatus::Running,
    SetupStatus::Stop,
    SetupStatus::Sleeping,
    SetupStatus::Exit,
    SetupStatus::Offtime,
    SetupStatus::Wakeup,
];

fn encode(status: SetupStatus) -> u8 {
    STATUSES.iter().position(|s| *s == status).unwrap_or(0) as u8
}

fn decode(code: u8) -> SetupStatus {
    STATUSES
        .get(usize::from(code))
        .copied()
        .unwrap_or(SetupStatus::Ready)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub time_ms: u64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Everything the control adapter has been told, in order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Journal {
    pub session_id: String,
    pub events: Vec<LoggedEvent>,
    pub trials: Vec<TrialRecord>,
    pub setup: SetupInfo,
    pub pings: u64,
}

/// Thread-safe handle to a running session's control state.
///
/// The status is a last-value cell: writers overwrite it and the session
/// reads it at its next gate poll.
#[derive(Clone, Debug)]
pub struct RemoteControl {
    status: Arc<AtomicU8>,
    journal: Arc<Mutex<Journal>>,
}

impl RemoteControl {
    pub fn status(&self) -> SetupStatus {
        decode(self.status.load(Ordering::Acquire))
    }

    pub fn set_status(&self, status: SetupStatus) {
        info!(status = %status, "remote status update");
        self.status.store(encode(status), Ordering::Release);
    }

    pub fn trials_logged(&self) -> usize {
        self.journal().trials.len()
    }

    /// Snapshot of the journal so far.
    pub fn journal_snapshot(&self) -> Journal {
        self.journal().clone()
    }

    /// Watch the journal from another thread and push `stop` once `trials`
    /// trials have been logged. The watcher also ends when the status turns
    /// to `stop` or `exit` on its own.
    pub fn stop_after(&self, trials: usize) -> JoinHandle<()> {
        let remote = self.clone();
        thread::spawn(move || loop {
            if remote.status().is_stop() {
                return;
            }
            if remote.trials_logged() >= trials {
                remote.set_status(SetupStatus::Stop);
                return;
            }
            thread::sleep(Duration::from_millis(5));
        })
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-memory control adapter; see [`RemoteControl`] for the outside view.
pub struct MemoryControl {
    session_id: Uuid,
    clock: SessionClock,
    remote: RemoteControl,
}

impl MemoryControl {
    pub fn new(clock: SessionClock) -> (Self, RemoteControl) {
        let session_id = Uuid::new_v4();
        let journal = Journal {
            session_id: session_id.to_string(),
            ..Journal::default()
        };
        let remote = RemoteControl {
            status: Arc::new(AtomicU8::new(encode(SetupStatus::Ready))),
            journal: Arc::new(Mutex::new(journal)),
        };
        let control = Self {
            session_id,
            clock,
            remote: remote.clone(),
        };
        (control, remote)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl ControlAdapter for MemoryControl {
    fn log(&mut self, event: &SessionEvent) -> Result<u64> {
        let time_ms = self.clock.now_ms();
        self.remote.journal().events.push(LoggedEvent {
            time_ms,
            event: event.clone(),
        });
        Ok(time_ms)
    }

    fn update_setup_info(&mut self, info: &SetupInfo) -> Result<()> {
        if let Some(status) = info.status {
            self.remote.status.store(encode(status), Ordering::Release);
        }
        let mut journal = self.remote.journal();
        let setup = &mut journal.setup;
        setup.status = info.status.or(setup.status);
        setup.difficulty = info.difficulty.or(setup.difficulty);
        setup.trial_idx = info.trial_idx.or(setup.trial_idx);
        setup.total_reward = info.total_reward.or(setup.total_reward);
        Ok(())
    }

    fn setup_status(&mut self) -> Result<SetupStatus> {
        Ok(self.remote.status())
    }

    fn ping(&mut self) -> Result<()> {
        self.remote.journal().pings += 1;
        Ok(())
    }

    fn init_trial(&mut self, trial_idx: u64, condition_hash: &str) -> Result<u64> {
        debug!(session = %self.session_id, trial_idx, condition_hash, "trial opened");
        Ok(self.clock.now_ms())
    }

    fn log_trial(&mut self, record: &TrialRecord) -> Result<()> {
        let mut journal = self.remote.journal();
        journal.trials.push(record.clone());
        journal.setup.trial_idx = Some(record.trial_idx);
        Ok(())
    }
}
