use super::StateId;
use crate::adapters::{SessionEvent, TrialOutcome};
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use session_core::{ConditionParams, SessionHistory};

/// Timeout for the punishment that was just appended to `history`.
///
/// With incremental punishment the base duration is multiplied by the run of
/// consecutive punished trials ending at the latest one.
pub fn punish_period(params: &ConditionParams, history: &SessionHistory) -> u64 {
    params
        .punish_duration
        .saturating_mul(punish_streak(params, history) as u64)
}

fn punish_streak(params: &ConditionParams, history: &SessionHistory) -> usize {
    if params.incremental_punishment {
        history.punish_streak().max(1)
    } else {
        1
    }
}

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.behavior
        .punish()
        .adapter(AdapterKind::Behavior, "punish")?;
    ctx.complete_trial(TrialOutcome::Punish, None)?;

    let condition = ctx.condition()?;
    let streak = punish_streak(condition.params(), &ctx.history);
    ctx.punish_period_ms = punish_period(condition.params(), &ctx.history);
    ctx.log(SessionEvent::Punishment {
        trial_idx: ctx.record.trial_idx,
        streak,
        period_ms: ctx.punish_period_ms,
    })?;
    ctx.timer.start();
    Ok(())
}

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.stimulus
        .punish_stim()
        .adapter(AdapterKind::Stimulus, "punish_stim")
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    if ctx.timer.elapsed_time() >= ctx.punish_period_ms {
        Ok(StateId::InterTrial)
    } else {
        Ok(StateId::Punish)
    }
}
