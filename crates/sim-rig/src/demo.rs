use session_core::{Condition, ConditionParams, ConfigError, PerformanceMetric, SessionParams};

pub const DEMO_MAX_DIFFICULTY: i32 = 2;

/// Two-port staircase over three difficulty levels with anti-bias sampling.
pub fn demo_conditions() -> Result<Vec<Condition>, ConfigError> {
    let mut conditions = Vec::new();
    for difficulty in 0..=DEMO_MAX_DIFFICULTY {
        for port in 1..=2 {
            conditions.push(Condition::new(ConditionParams {
                trial_selection: Some("staircase".into()),
                difficulty,
                response_port: port,
                reward_amount: 4.0,
                trial_duration: 200,
                intertrial_duration: 20,
                reward_duration: 50,
                punish_duration: 30,
                incremental_punishment: true,
                staircase_window: 10,
                stair_up: 0.7,
                stair_down: 0.55,
                next_up: (difficulty + 1).min(DEMO_MAX_DIFFICULTY),
                next_down: (difficulty - 1).max(0),
                metric: PerformanceMetric::Accuracy,
                antibias: true,
                bias_window: 5,
                ..ConditionParams::default()
            })?);
        }
    }
    Ok(conditions)
}

/// Session settings tuned for a quick simulated run.
pub fn demo_params() -> SessionParams {
    SessionParams {
        setup: "sim-rig".into(),
        trial_selection: "staircase".into(),
        status_poll_ms: 20,
        idle_poll_ms: 20,
        hydrate_pause_ms: 10,
        offtime_pause_ms: 10,
        ..SessionParams::default()
    }
}
