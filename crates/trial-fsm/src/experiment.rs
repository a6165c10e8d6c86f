use crate::adapters::{
    BehaviorAdapter, ControlAdapter, SessionObserver, SetupStatus, StimulusAdapter,
};
use crate::context::SessionContext;
use crate::error::SessionError;
use crate::machine::StateMachine;
use crate::states::{StateId, TrialStates};
use condition_selector::{ConditionPool, ConditionSelector};
use serde::{Deserialize, Serialize};
use session_core::{Condition, LocalClock, SessionHistory, SessionParams, WallClock};
use tracing::{error, info};

/// Summary of a finished session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionReport {
    pub trials: usize,
    /// PreTrial entries, including draws that never ran because the session
    /// went idle first.
    pub trial_attempts: u64,
    pub total_reward: f64,
    pub free_reward: f64,
    pub exhausted: bool,
    pub final_status: SetupStatus,
    pub final_difficulty: i32,
    pub history: SessionHistory,
}

/// One behavioral session: a condition pool, the rig adapters and the trial
/// state machine that drives them.
pub struct Experiment {
    machine: StateMachine<TrialStates>,
}

impl Experiment {
    pub fn setup<C, B, S>(
        control: C,
        behavior: B,
        stimulus: S,
        params: SessionParams,
        conditions: Vec<Condition>,
    ) -> Result<Self, SessionError>
    where
        C: ControlAdapter + 'static,
        B: BehaviorAdapter + 'static,
        S: StimulusAdapter + 'static,
    {
        params.validate()?;
        if conditions.is_empty() {
            return Err(SessionError::NoConditions);
        }
        let selector = ConditionSelector::new(
            ConditionPool::new(conditions),
            params.trial_selection.clone(),
            params.seed,
        );
        let ctx = SessionContext::new(
            params,
            Box::new(behavior),
            Box::new(stimulus),
            Box::new(control),
            Box::new(LocalClock),
            selector,
        );
        Ok(Self {
            machine: StateMachine::new(TrialStates::new(ctx), StateId::Prepare),
        })
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.context_mut().observers.push(Box::new(observer));
        self
    }

    pub fn with_wall_clock(mut self, clock: impl WallClock + 'static) -> Self {
        self.context_mut().clock = Box::new(clock);
        self
    }

    pub fn context(&self) -> &SessionContext {
        self.machine.logic().context()
    }

    fn context_mut(&mut self) -> &mut SessionContext {
        self.machine.logic_mut().context_mut()
    }

    /// Run until Exit. On a fatal error the status is forced to `exit` and
    /// the adapters are torn down before the error is returned.
    pub fn run(mut self) -> Result<SessionReport, SessionError> {
        {
            let ctx = self.context();
            info!(
                setup = %ctx.params().setup,
                paradigm = ?ctx.params().paradigm,
                conditions = ctx.selector().pool().len(),
                policy = %ctx.params().trial_selection,
                "session starting"
            );
        }

        if let Err(err) = self.machine.run() {
            error!(error = %err, trial = self.context().trial_idx(), "session failed");
            self.context_mut().abort_cleanup();
            return Err(err);
        }

        let ctx = self.context();
        let history = ctx.history().clone();
        Ok(SessionReport {
            trials: history.len(),
            trial_attempts: ctx.trial_idx(),
            total_reward: history.total_reward(),
            free_reward: history.free_reward(),
            exhausted: ctx.is_exhausted(),
            final_status: ctx.gate().status(),
            final_difficulty: ctx.selector().current_difficulty(),
            history,
        })
    }
}
