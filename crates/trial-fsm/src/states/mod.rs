//! The trial states and their dispatch.

mod abort;
mod cue;
mod delay;
mod exit;
mod hydrate;
mod inter_trial;
mod offtime;
mod pre_trial;
mod prepare;
mod punish;
mod reward;
mod trial;

pub use punish::punish_period;

use crate::context::SessionContext;
use crate::error::SessionError;
use crate::machine::StateLogic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StateId {
    Prepare,
    PreTrial,
    Cue,
    Delay,
    Trial,
    Abort,
    Reward,
    Punish,
    InterTrial,
    Hydrate,
    Offtime,
    Exit,
}

impl StateId {
    pub const ALL: [StateId; 12] = [
        StateId::Prepare,
        StateId::PreTrial,
        StateId::Cue,
        StateId::Delay,
        StateId::Trial,
        StateId::Abort,
        StateId::Reward,
        StateId::Punish,
        StateId::InterTrial,
        StateId::Hydrate,
        StateId::Offtime,
        StateId::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateId::Prepare => "Prepare",
            StateId::PreTrial => "PreTrial",
            StateId::Cue => "Cue",
            StateId::Delay => "Delay",
            StateId::Trial => "Trial",
            StateId::Abort => "Abort",
            StateId::Reward => "Reward",
            StateId::Punish => "Punish",
            StateId::InterTrial => "InterTrial",
            StateId::Hydrate => "Hydrate",
            StateId::Offtime => "Offtime",
            StateId::Exit => "Exit",
        }
    }

    /// Hydrate and Offtime poll the control status on the idle interval.
    pub fn is_idle(&self) -> bool {
        matches!(self, StateId::Hydrate | StateId::Offtime)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Idle pacing; zero disables it.
fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// [`StateLogic`] over the trial states of one session.
pub struct TrialStates {
    ctx: SessionContext,
}

impl TrialStates {
    pub fn new(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.ctx
    }
}

impl StateLogic for TrialStates {
    type State = StateId;
    type Error = SessionError;

    fn is_terminal(&self, state: StateId) -> bool {
        state == StateId::Exit
    }

    fn entry(&mut self, state: StateId) -> Result<(), SessionError> {
        debug!(state = %state, trial = self.ctx.trial_idx, "state entry");
        for observer in self.ctx.observers.iter_mut() {
            observer.on_state_entry(state);
        }
        self.ctx.timer.start();
        let ctx = &mut self.ctx;
        match state {
            StateId::Prepare | StateId::Exit => Ok(()),
            StateId::PreTrial => pre_trial::entry(ctx),
            StateId::Cue => cue::entry(ctx),
            StateId::Delay => delay::entry(ctx),
            StateId::Trial => trial::entry(ctx),
            StateId::Abort => abort::entry(ctx),
            StateId::Reward => reward::entry(ctx),
            StateId::Punish => punish::entry(ctx),
            StateId::InterTrial => inter_trial::entry(ctx),
            StateId::Hydrate => hydrate::entry(ctx),
            StateId::Offtime => offtime::entry(ctx),
        }
    }

    fn run(&mut self, state: StateId) -> Result<(), SessionError> {
        let ctx = &mut self.ctx;
        match state {
            StateId::Prepare => prepare::run(ctx),
            StateId::PreTrial => pre_trial::run(ctx),
            StateId::Cue => cue::run(ctx),
            StateId::Delay => delay::run(ctx),
            StateId::Trial => trial::run(ctx),
            StateId::Abort => Ok(()),
            StateId::Reward => reward::run(ctx),
            StateId::Punish => punish::run(ctx),
            StateId::InterTrial => inter_trial::run(ctx),
            StateId::Hydrate => hydrate::run(ctx),
            StateId::Offtime => offtime::run(ctx),
            StateId::Exit => exit::run(ctx),
        }
    }

    /// The state's own transition, overridden by a `stop`/`exit` control
    /// status or a quitting session.
    fn next(&mut self, state: StateId) -> Result<StateId, SessionError> {
        let ctx = &mut self.ctx;
        let status = ctx.poll_gate(state.is_idle())?;
        if status.is_stop() || ctx.gate.is_quitting() {
            info!(state = %state, status = %status, "control requested exit");
            return Ok(StateId::Exit);
        }
        match state {
            StateId::Prepare => prepare::next(ctx),
            StateId::PreTrial => pre_trial::next(ctx),
            StateId::Cue => cue::next(ctx),
            StateId::Delay => delay::next(ctx),
            StateId::Trial => trial::next(ctx),
            StateId::Abort => abort::next(ctx),
            StateId::Reward => reward::next(ctx),
            StateId::Punish => punish::next(ctx),
            StateId::InterTrial => inter_trial::next(ctx),
            StateId::Hydrate => hydrate::next(ctx),
            StateId::Offtime => offtime::next(ctx),
            StateId::Exit => Ok(StateId::Exit),
        }
    }

    fn exit(&mut self, state: StateId) -> Result<(), SessionError> {
        let ctx = &mut self.ctx;
        match state {
            StateId::Cue | StateId::Delay => trial::stop_stimulus(ctx),
            StateId::Trial => trial::exit(ctx),
            StateId::Reward => reward::exit(ctx),
            _ => Ok(()),
        }
    }
}
