//! Simulated call latency

use crate::config::{CrmConfig, RandomConfig};
use crate::{Error, Result};
use rand::Rng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::trace;

use super::random::{CRM_LATENCY_STREAM, stream_rng};

/// Blocks the calling thread for a uniformly sampled duration in `[min, max]`
#[derive(Debug)]
pub struct LatencySimulator<R = StdRng> {
    min: Duration,
    max: Duration,
    rng: R,
}

impl LatencySimulator<StdRng> {
    /// Build from CRM configuration; `None` when latency is disabled
    pub fn from_config(config: &CrmConfig, random: &RandomConfig) -> Result<Option<Self>> {
        config.validate()?;
        match config.latency_bounds() {
            Some((min, max)) => Ok(Some(Self::new(
                min,
                max,
                stream_rng(random.seed, CRM_LATENCY_STREAM),
            )?)),
            None => Ok(None),
        }
    }
}

impl<R: Rng> LatencySimulator<R> {
    /// Create a simulator with explicit bounds and random source
    pub fn new(min: Duration, max: Duration, rng: R) -> Result<Self> {
        if max < min {
            return Err(Error::configuration(format!(
                "Latency upper bound {:?} is below lower bound {:?}",
                max, min
            )));
        }
        Ok(Self { min, max, rng })
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    /// Draw the next delay without sleeping
    pub fn sample(&mut self) -> Duration {
        if self.min == self.max {
            self.min
        } else {
            self.rng.gen_range(self.min..=self.max)
        }
    }

    /// Draw the next delay and sleep for it
    pub fn wait(&mut self) -> Duration {
        let delay = self.sample();
        trace!("Simulating {:?} of call latency", delay);
        std::thread::sleep(delay);
        delay
    }
}
