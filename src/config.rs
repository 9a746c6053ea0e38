//! Tunables for a simulation session.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "force_interval_ms": 100, "seed": 42 }
//! ```

use std::{path::Path, time::Duration};

use crate::error::{Error, Result};
use crate::gravity::Gravity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Period of the force-resolution phase.
    pub force_interval_ms: u64,
    /// Period of the integration and collision phase.
    pub integrate_interval_ms: u64,
    pub gravitational_constant: f64,
    /// Initial spawn size index, clamped to `1..=10`.
    pub spawn_size_index: u8,
    /// Body count from which the pairwise pass runs on the rayon pool.
    pub parallel_threshold: usize,
    /// Frames the driver buffers for a slow consumer before dropping.
    pub frame_buffer: usize,
    /// Seed for the default color source; random when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            force_interval_ms: 200,
            integrate_interval_ms: 10,
            gravitational_constant: Gravity::G,
            spawn_size_index: 1,
            parallel_threshold: 256,
            frame_buffer: 1,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.force_interval_ms == 0 {
            return Err(Error::InvalidParameter {
                name: "force_interval_ms",
                value: 0.0,
            });
        }
        if self.integrate_interval_ms == 0 {
            return Err(Error::InvalidParameter {
                name: "integrate_interval_ms",
                value: 0.0,
            });
        }
        let g = self.gravitational_constant;
        if !(g.is_finite() && g >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "gravitational_constant",
                value: g,
            });
        }
        if self.frame_buffer == 0 {
            return Err(Error::InvalidParameter {
                name: "frame_buffer",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn force_interval(&self) -> Duration {
        Duration::from_millis(self.force_interval_ms)
    }

    pub fn integrate_interval(&self) -> Duration {
        Duration::from_millis(self.integrate_interval_ms)
    }

    pub fn gravity(&self) -> Gravity {
        Gravity::new(self.gravitational_constant)
    }
}
