use super::StateId;
use crate::adapters::SetupStatus;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.behavior
        .setup()
        .adapter(AdapterKind::Behavior, "setup")?;
    ctx.stimulus
        .setup()
        .adapter(AdapterKind::Stimulus, "setup")?;
    if !ctx.poll_gate(false)?.is_stop() {
        ctx.set_status(SetupStatus::Running)?;
    }
    Ok(())
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    if ctx.is_sleep_time() {
        Ok(StateId::Offtime)
    } else {
        Ok(StateId::PreTrial)
    }
}
