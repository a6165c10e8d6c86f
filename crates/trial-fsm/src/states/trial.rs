use super::StateId;
use crate::adapters::Period;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use session_core::Paradigm;

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.ready = false;
    ctx.responded = false;
    if ctx.params.paradigm == Paradigm::MatchToSample {
        let condition = ctx.condition()?;
        ctx.stimulus
            .prepare(&condition, Period::Response)
            .adapter(AdapterKind::Stimulus, "prepare")?;
    }
    ctx.stimulus
        .start()
        .adapter(AdapterKind::Stimulus, "start")?;
    ctx.since_ms = ctx.log_state_onset(StateId::Trial)?;
    Ok(())
}

/// Readiness is checked before the response so a lick on the poll that
/// opens the window still counts as in-window.
pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let ready_ms = ctx.condition()?.params().trial_ready;
    ctx.stimulus
        .present()
        .adapter(AdapterKind::Stimulus, "present")?;
    if !ctx.ready
        && ctx
            .behavior
            .is_ready(ready_ms, ctx.since_ms)
            .adapter(AdapterKind::Behavior, "is_ready")?
    {
        ctx.ready = true;
        ctx.stimulus
            .ready_stim()
            .adapter(AdapterKind::Stimulus, "ready_stim")?;
    }
    ctx.responded = ctx
        .behavior
        .get_response(ctx.since_ms)
        .adapter(AdapterKind::Behavior, "get_response")?;
    if ctx.responded {
        ctx.record.response = ctx.behavior.response();
        ctx.record.in_window = ctx.ready;
    }
    Ok(())
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let duration = ctx.condition()?.params().trial_duration;
    Ok(if ctx.responded && !ctx.ready {
        StateId::Abort
    } else if ctx.responded && !ctx.behavior.is_correct() {
        StateId::Punish
    } else if ctx.responded {
        StateId::Reward
    } else if ctx.timer.elapsed_time() > duration {
        StateId::Abort
    } else {
        StateId::Trial
    })
}

pub(super) fn exit(ctx: &mut SessionContext) -> Result<(), SessionError> {
    stop_stimulus(ctx)?;
    ctx.ping()
}

pub(super) fn stop_stimulus(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.stimulus
        .stop()
        .adapter(AdapterKind::Stimulus, "stop")
}
