use anyhow::Result;
use session_core::Condition;
use tracing::debug;
use trial_fsm::{Period, StimulusAdapter};

/// Stimulus adapter that only writes what it would have shown.
#[derive(Debug, Default)]
pub struct LoggingStimulus {
    condition: Option<String>,
    period: Option<Period>,
    presentations: u64,
    running: bool,
}

impl LoggingStimulus {
    pub fn presentations(&self) -> u64 {
        self.presentations
    }
}

impl StimulusAdapter for LoggingStimulus {
    fn prepare(&mut self, condition: &Condition, period: Period) -> Result<()> {
        debug!(hash = condition.hash(), ?period, "stimulus prepared");
        self.condition = Some(condition.hash().to_string());
        self.period = Some(period);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if self.running {
            self.presentations += 1;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn reward_stim(&mut self) -> Result<()> {
        debug!("reward cue");
        Ok(())
    }

    fn punish_stim(&mut self) -> Result<()> {
        debug!("punish cue");
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        debug!(
            presentations = self.presentations,
            last = ?self.condition,
            "stimulus closed"
        );
        self.running = false;
        Ok(())
    }
}
