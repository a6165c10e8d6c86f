use super::StateId;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.since_ms = ctx.log_state_onset(StateId::InterTrial)?;
    ctx.timer.start();
    Ok(())
}

/// With `noresponse_intertrial` the interval only ends after a quiet stretch.
pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    if !ctx.condition()?.params().noresponse_intertrial {
        return Ok(());
    }
    let responded = ctx
        .behavior
        .get_response(ctx.since_ms)
        .adapter(AdapterKind::Behavior, "get_response")?;
    if responded {
        ctx.timer.start();
        if let Some(response) = ctx.behavior.response() {
            ctx.since_ms = response.time_ms;
        }
    }
    Ok(())
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let sleep = ctx.is_sleep_time();
    if sleep && !ctx.is_hydrated(ctx.params.min_reward) {
        return Ok(StateId::Hydrate);
    }
    if sleep || ctx.is_hydrated(ctx.params.max_reward) {
        return Ok(StateId::Offtime);
    }
    let duration = ctx.condition()?.params().intertrial_duration;
    if ctx.timer.elapsed_time() >= duration {
        Ok(StateId::PreTrial)
    } else {
        Ok(StateId::InterTrial)
    }
}
