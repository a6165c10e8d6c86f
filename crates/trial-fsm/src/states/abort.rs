use super::StateId;
use crate::adapters::TrialOutcome;
use crate::context::SessionContext;
use crate::error::SessionError;

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.complete_trial(TrialOutcome::Abort, None)?;
    ctx.timer.start();
    Ok(())
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let duration = ctx.condition()?.params().abort_duration;
    if ctx.timer.elapsed_time() >= duration {
        Ok(StateId::InterTrial)
    } else {
        Ok(StateId::Abort)
    }
}
