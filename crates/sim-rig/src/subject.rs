use crate::clock::SessionClock;
use anyhow::{ensure, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use session_core::Condition;
use tracing::trace;
use trial_fsm::{BehaviorAdapter, Response};

/// Behavioral tendencies of a simulated animal.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectProfile {
    /// Probability that an answered trial goes to the correct port.
    pub p_correct: f64,
    /// Probability of answering a trial at all.
    pub p_respond: f64,
    /// Delay between the response window opening and the lick.
    pub latency_ms: u64,
    /// Spontaneous licking outside trials, at most once per interval.
    pub idle_lick_ms: Option<u64>,
}

impl Default for SubjectProfile {
    fn default() -> Self {
        Self {
            p_correct: 0.8,
            p_respond: 0.95,
            latency_ms: 5,
            idle_lick_ms: Some(500),
        }
    }
}

/// A behavior adapter backed by a random subject instead of hardware.
pub struct SimulatedSubject {
    clock: SessionClock,
    profile: SubjectProfile,
    rng: StdRng,
    correct_port: u32,
    planned: Option<u32>,
    last: Option<Response>,
    dispensed: f64,
}

impl SimulatedSubject {
    pub fn new(clock: SessionClock, profile: SubjectProfile, seed: Option<u64>) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&profile.p_correct) && (0.0..=1.0).contains(&profile.p_respond),
            "subject probabilities must lie in [0, 1]"
        );
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            clock,
            profile,
            rng,
            correct_port: 1,
            planned: None,
            last: None,
            dispensed: 0.0,
        })
    }

    /// Total reward handed to the subject, trial and free.
    pub fn dispensed(&self) -> f64 {
        self.dispensed
    }

    fn spontaneous_lick(&self, now: u64) -> bool {
        match (self.profile.idle_lick_ms, self.last) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(interval), Some(last)) => now >= last.time_ms + interval,
        }
    }
}

impl BehaviorAdapter for SimulatedSubject {
    fn prepare(&mut self, condition: &Condition) -> Result<()> {
        self.correct_port = condition.params().response_port;
        self.planned = if self.rng.gen_bool(self.profile.p_respond) {
            if self.rng.gen_bool(self.profile.p_correct) {
                Some(self.correct_port)
            } else {
                Some(self.correct_port % 2 + 1)
            }
        } else {
            None
        };
        trace!(planned = ?self.planned, correct = self.correct_port, "subject prepared");
        Ok(())
    }

    fn is_ready(&mut self, min_duration_ms: u64, since_ms: u64) -> Result<bool> {
        Ok(self.clock.now_ms() >= since_ms + min_duration_ms)
    }

    fn get_response(&mut self, since_ms: u64) -> Result<bool> {
        let now = self.clock.now_ms();
        if now <= since_ms {
            return Ok(false);
        }
        let port = match self.planned {
            Some(port) if now >= since_ms + self.profile.latency_ms => {
                self.planned = None;
                port
            }
            Some(_) => return Ok(false),
            None if self.spontaneous_lick(now) => self.correct_port,
            None => return Ok(false),
        };
        self.last = Some(Response { port, time_ms: now });
        Ok(true)
    }

    fn response(&self) -> Option<Response> {
        self.last
    }

    fn is_correct(&self) -> bool {
        self.last
            .map_or(false, |response| response.port == self.correct_port)
    }

    fn reward(&mut self, amount: f64) -> Result<bool> {
        self.dispensed += amount;
        Ok(true)
    }

    fn punish(&mut self) -> Result<()> {
        Ok(())
    }
}
