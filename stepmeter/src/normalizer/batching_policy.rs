use crate::Result;
use camino::Utf8Path;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::fs;

/// Controls how many raw steps a [`StepNormalizer`](super::StepNormalizer) folds into one sink update.
///
/// The defaults aim for about one update per percentage point: a 100% phase made of
/// 1,000,000 steps reports every 10,000 steps, while a phase of 150 steps reports on
/// every step.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchingPolicy {
    /// Target number of sink updates per percentage point of a phase
    #[serde(default = "default_updates_per_percent")]
    pub updates_per_percent: f64,

    /// Batching kicks in once a phase has at least this many steps per target update
    #[serde(default = "default_min_batch_factor")]
    pub min_batch_factor: u64,
}

const fn default_updates_per_percent() -> f64 {
    1.0
}

const fn default_min_batch_factor() -> u64 {
    2
}

impl Default for BatchingPolicy {
    fn default() -> Self {
        Self {
            updates_per_percent: default_updates_per_percent(),
            min_batch_factor: default_min_batch_factor(),
        }
    }
}

impl BatchingPolicy {
    /// Parse a policy from TOML text
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML, has unknown fields, or fails validation
    pub fn from_toml(text: &str) -> Result<Self> {
        let policy: Self = toml::from_str(text).into_app_err("parsing batching policy")?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load a policy from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading batching policy file '{path}'"))?;
        let policy: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing batching policy file '{path}'"))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Validate policy values
    ///
    /// # Errors
    ///
    /// Returns an error if `updates_per_percent` is not a positive finite number or
    /// `min_batch_factor` is zero
    pub fn validate(&self) -> Result<()> {
        if !self.updates_per_percent.is_finite() || self.updates_per_percent <= 0.0 {
            return Err(app_err!(
                "updates_per_percent must be a positive number, got {}",
                self.updates_per_percent
            ));
        }

        if self.min_batch_factor == 0 {
            return Err(app_err!("min_batch_factor must be at least 1"));
        }

        Ok(())
    }

    /// Number of raw steps folded into a single notification for a phase of
    /// `total_steps` steps worth `total_percentage` percent.
    ///
    /// Always at least 1.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "target is rounded, clamped to at least 1 and bounded by u32::MAX * updates_per_percent"
    )]
    pub fn step_threshold(&self, total_steps: u64, total_percentage: u32) -> u64 {
        let target = (f64::from(total_percentage) * self.updates_per_percent).round().max(1.0) as u64;

        if total_steps >= self.min_batch_factor.saturating_mul(target) {
            total_steps.div_ceil(target)
        } else {
            1
        }
    }
}
