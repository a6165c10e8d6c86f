use super::{pause, StateId};
use crate::adapters::SessionEvent;
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use session_core::ConditionParams;
use tracing::info;

pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.since_ms = ctx.log_state_onset(StateId::Hydrate)?;
    Ok(())
}

/// Hand out free rewards for any response until the hydration floor is met.
pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let responded = ctx
        .behavior
        .get_response(ctx.since_ms)
        .adapter(AdapterKind::Behavior, "get_response")?;
    if responded {
        if let Some(response) = ctx.behavior.response() {
            ctx.since_ms = response.time_ms;
        }
        let amount = free_reward_amount(ctx);
        let delivered = ctx
            .behavior
            .reward(amount)
            .adapter(AdapterKind::Behavior, "reward")?;
        if delivered {
            ctx.history.record_free_reward(amount);
            let hydration_total = ctx.history.hydration_total();
            ctx.log(SessionEvent::FreeReward {
                amount,
                hydration_total,
            })?;
            info!(amount, hydration_total, "free reward delivered");
        }
        pause(ctx.params.hydrate_pause_ms);
    }
    ctx.ping()
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    if ctx.is_hydrated(ctx.params.min_reward) || !ctx.is_sleep_time() {
        Ok(StateId::Offtime)
    } else {
        Ok(StateId::Hydrate)
    }
}

fn free_reward_amount(ctx: &SessionContext) -> f64 {
    ctx.params
        .hydrate_reward_amount
        .or_else(|| ctx.current_condition().map(|c| c.params().reward_amount))
        .unwrap_or_else(|| ConditionParams::default().reward_amount)
}
