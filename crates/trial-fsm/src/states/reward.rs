use super::StateId;
use crate::adapters::TrialOutcome;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.delivered = false;
    ctx.stimulus
        .reward_stim()
        .adapter(AdapterKind::Stimulus, "reward_stim")
}

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    if !ctx.delivered {
        let amount = ctx.condition()?.params().reward_amount;
        ctx.delivered = ctx
            .behavior
            .reward(amount)
            .adapter(AdapterKind::Behavior, "reward")?;
    }
    Ok(())
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let duration = ctx.condition()?.params().reward_duration;
    if ctx.delivered || ctx.timer.elapsed_time() >= duration {
        Ok(StateId::InterTrial)
    } else {
        Ok(StateId::Reward)
    }
}

/// An undelivered reward is still a completed trial, recorded as zero.
pub(super) fn exit(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let amount = if ctx.delivered {
        ctx.condition()?.params().reward_amount
    } else {
        0.0
    };
    ctx.complete_trial(TrialOutcome::Reward, Some(amount))
}
