use super::{pause, StateId};
use crate::adapters::SetupStatus;
use crate::context::SessionContext;
use crate::error::SessionError;
use tracing::info;

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let status = if ctx.is_sleep_time() {
        SetupStatus::Sleeping
    } else {
        SetupStatus::Offtime
    };
    ctx.set_status(status)?;
    ctx.log_state_onset(StateId::Offtime)?;
    info!(status = %status, total_reward = ctx.history.total_reward(), "entering offtime");
    Ok(())
}

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.ping()?;
    pause(ctx.params.offtime_pause_ms);
    Ok(())
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let sleep = ctx.is_sleep_time();
    match ctx.gate.status() {
        SetupStatus::Wakeup if !sleep => resume(ctx),
        SetupStatus::Wakeup if !ctx.is_hydrated(ctx.params.min_reward) => {
            info!("wakeup requested outside active hours before hydration");
            Ok(StateId::Exit)
        }
        SetupStatus::Sleeping
            if ctx.params.auto_wake && !sleep && !ctx.is_hydrated(ctx.params.max_reward) =>
        {
            resume(ctx)
        }
        _ => Ok(StateId::Offtime),
    }
}

fn resume(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    info!("resuming trials");
    ctx.set_status(SetupStatus::Running)?;
    Ok(StateId::PreTrial)
}
