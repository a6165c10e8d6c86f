use super::StateId;
use crate::adapters::{Period, SessionEvent, SetupInfo, TrialRecord};
use crate::context::SessionContext;
use crate::error::{AdapterKind, AdapterResultExt, SessionError};
use session_core::Paradigm;
use tracing::warn;

/// Draw the trial's condition and open the trial.
pub(super) fn entry(ctx: &mut SessionContext) -> Result<(), SessionError> {
    let current = ctx.condition.clone();
    let Some(draw) = ctx.selector.select(current.as_deref(), &ctx.history)? else {
        warn!(trials = ctx.history.len(), "condition pool exhausted");
        ctx.exhausted = true;
        return ctx.quit();
    };

    if let Some(transition) = draw.transition {
        ctx.update_setup_info(&SetupInfo::difficulty(transition.to))?;
        ctx.log(SessionEvent::DifficultyChange {
            from: transition.from,
            to: transition.to,
            step: transition.step,
            performance: transition.performance,
        })?;
        for observer in ctx.observers.iter_mut() {
            observer.on_difficulty_change(&transition);
        }
    }

    let condition = draw.condition;
    ctx.trial_idx += 1;
    ctx.ready = false;
    ctx.responded = false;
    ctx.delivered = false;

    ctx.behavior
        .prepare(&condition)
        .adapter(AdapterKind::Behavior, "prepare")?;
    let period = match ctx.params.paradigm {
        Paradigm::MatchPort => Period::Trial,
        Paradigm::MatchToSample => Period::Cue,
    };
    ctx.stimulus
        .prepare(&condition, period)
        .adapter(AdapterKind::Stimulus, "prepare")?;

    let start_ms = ctx
        .control
        .init_trial(ctx.trial_idx, condition.hash())
        .adapter(AdapterKind::Control, "init_trial")?;
    ctx.record = TrialRecord::new(ctx.trial_idx, &condition, start_ms);
    ctx.since_ms = start_ms;
    ctx.log(SessionEvent::TrialOnset {
        trial_idx: ctx.trial_idx,
        condition_hash: condition.hash().to_string(),
        difficulty: condition.difficulty(),
    })?;

    ctx.condition = Some(condition);
    ctx.timer.start();
    Ok(())
}

pub(super) fn run(ctx: &mut SessionContext) -> Result<(), SessionError> {
    ctx.ping()
}

pub(super) fn next(ctx: &mut SessionContext) -> Result<StateId, SessionError> {
    let sleep = ctx.is_sleep_time();
    if sleep && !ctx.is_hydrated(ctx.params.min_reward) {
        return Ok(StateId::Hydrate);
    }
    if sleep || ctx.is_hydrated(ctx.params.max_reward) {
        return Ok(StateId::Offtime);
    }

    let condition = ctx.condition()?;
    let ready = ctx
        .behavior
        .is_ready(condition.params().init_ready, ctx.since_ms)
        .adapter(AdapterKind::Behavior, "is_ready")?;
    if !ready {
        return Ok(StateId::PreTrial);
    }
    match ctx.params.paradigm {
        Paradigm::MatchPort => Ok(StateId::Trial),
        Paradigm::MatchToSample => Ok(StateId::Cue),
    }
}
