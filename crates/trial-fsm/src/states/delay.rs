use super::cue::watch_hold;
use super::StateId;
use crate::adapters::Period;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let condition = ctx.condition()?;
    ctx.stimulus
        .prepare(&condition, Period::Delay)
        .adapter(AdapterKind::Stimulus, "prepare")?;
    ctx.stimulus
        .start()
        .adapter(AdapterKind::Stimulus, "start")?;
    ctx.since_ms = ctx.log_state_onset(StateId::Delay)?;
    ctx.ready = false;
    ctx.responded = false;
    Ok(())
}

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let ready_ms = ctx.condition()?.params().delay_ready;
    watch_hold(ctx, ready_ms)
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let duration = ctx.condition()?.params().delay_duration;
    Ok(if ctx.responded {
        StateId::Abort
    } else if ctx.ready && ctx.timer.elapsed_time() >= duration {
        StateId::Trial
    } else {
        StateId::Delay
    })
}
