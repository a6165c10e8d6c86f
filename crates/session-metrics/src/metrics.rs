use prometheus::{Encoder, Gauge, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Prometheus view of one running session.
///
/// Every series carries a constant `setup` label. The handles are cheap to
/// clone and share the same underlying series, so one clone can observe the
/// session while another exports.
#[derive(Clone)]
pub struct SessionMetrics {
    registry: Registry,
    pub trials_total: IntCounterVec,
    pub state_entries_total: IntCounterVec,
    pub difficulty_changes_total: IntCounterVec,
    pub total_reward: Gauge,
    pub hydration_total: Gauge,
    pub difficulty: IntGauge,
    pub trial_index: IntGauge,
    pub punish_streak: IntGauge,
}

impl SessionMetrics {
    pub fn new(setup: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let opts = |name: &str, help: &str| Opts::new(name, help).const_label("setup", setup);

        let trials_total = IntCounterVec::new(
            opts("session_trials_total", "Completed trials by outcome"),
            &["outcome"],
        )?;
        let state_entries_total = IntCounterVec::new(
            opts("session_state_entries_total", "State machine entries by state"),
            &["state"],
        )?;
        let difficulty_changes_total = IntCounterVec::new(
            opts(
                "session_difficulty_changes_total",
                "Staircase moves by direction",
            ),
            &["direction"],
        )?;
        let total_reward = Gauge::with_opts(opts(
            "session_total_reward",
            "Reward delivered inside trials",
        ))?;
        let hydration_total = Gauge::with_opts(opts(
            "session_hydration_total",
            "Trial and free reward delivered",
        ))?;
        let difficulty = IntGauge::with_opts(opts(
            "session_difficulty",
            "Difficulty of the latest completed trial",
        ))?;
        let trial_index = IntGauge::with_opts(opts(
            "session_trial_index",
            "Index of the latest completed trial",
        ))?;
        let punish_streak = IntGauge::with_opts(opts(
            "session_punish_streak",
            "Consecutive punished trials at the end of the history",
        ))?;

        registry.register(Box::new(trials_total.clone()))?;
        registry.register(Box::new(state_entries_total.clone()))?;
        registry.register(Box::new(difficulty_changes_total.clone()))?;
        registry.register(Box::new(total_reward.clone()))?;
        registry.register(Box::new(hydration_total.clone()))?;
        registry.register(Box::new(difficulty.clone()))?;
        registry.register(Box::new(trial_index.clone()))?;
        registry.register(Box::new(punish_streak.clone()))?;

        Ok(Self {
            registry,
            trials_total,
            state_entries_total,
            difficulty_changes_total,
            total_reward,
            hydration_total,
            difficulty,
            trial_index,
            punish_streak,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition format of every registered series.
    pub fn export(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
