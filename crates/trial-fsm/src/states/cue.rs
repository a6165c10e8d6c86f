use super::StateId;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.stimulus
        .start()
        .adapter(AdapterKind::Stimulus, "start")?;
    ctx.since_ms = ctx.log_state_onset(StateId::Cue)?;
    ctx.ready = false;
    ctx.responded = false;
    Ok(())
}

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let ready_ms = ctx.condition()?.params().cue_ready;
    watch_hold(ctx, ready_ms)
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let duration = ctx.condition()?.params().cue_duration;
    Ok(if ctx.responded {
        StateId::Abort
    } else if ctx.ready && ctx.timer.elapsed_time() >= duration {
        StateId::Delay
    } else {
        StateId::Cue
    })
}

/// Present the stimulus while the subject must hold; any response counts as
/// premature.
pub(super) fn watch_hold(ctx: &mut SessionContext, ready_ms: u64) -> Result<(), SessionError> {
    ctx.stimulus
        .present()
        .adapter(AdapterKind::Stimulus, "present")?;
    ctx.responded = ctx
        .behavior
        .get_response(ctx.since_ms)
        .adapter(AdapterKind::Behavior, "get_response")?;
    if ctx.responded {
        ctx.record.response = ctx.behavior.response();
        ctx.record.in_window = false;
    }
    ctx.ready = ctx
        .behavior
        .is_ready(ready_ms, ctx.since_ms)
        .adapter(AdapterKind::Behavior, "is_ready")?;
    Ok(())
}
