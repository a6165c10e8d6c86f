use crate::adapters::SessionEvent;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use tracing::info;

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let trials = ctx.history.len();
    let total_reward = ctx.history.total_reward();
    ctx.log(SessionEvent::SessionEnd {
        trials,
        total_reward,
        exhausted: ctx.exhausted,
    })?;
    info!(trials, total_reward, exhausted = ctx.exhausted, "session ended");

    ctx.behavior
        .exit()
        .adapter(AdapterKind::Behavior, "exit")?;
    ctx.stimulus
        .exit()
        .adapter(AdapterKind::Stimulus, "exit")?;
    ctx.ping()
}
