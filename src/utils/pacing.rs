use crate::core::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Randomized pause between scripted actions so the cadence does not look
/// machine-regular. Uniform over [min, max].
#[derive(Debug, Clone)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_config(&PacingConfig::default())
    }
}

impl Pacing {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_ms),
            Duration::from_millis(config.max_ms),
        )
    }

    fn pick(&self) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        let delay_ms = rand::thread_rng().gen_range(min_ms..=max_ms);
        Duration::from_millis(delay_ms)
    }

    /// Block the calling flow for one randomly drawn delay.
    pub async fn pause(&self) {
        let delay = self.pick();
        debug!("Pausing for {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}
