//! Classifier configuration.
//!
//! Options can be built in code or read from a TOML document such as:
//!
//! ```toml
//! tolerance = 0.25
//! policy = "tolerant"
//! ```
//!
//! Missing keys fall back to [`ClassifierOptions::default`].

use serde::{Deserialize, Serialize};
use soil_texture_models::{BatchPolicy, DEFAULT_SUM_TOLERANCE, PERCENT_TOTAL};
use thiserror::Error;

/// Errors produced while loading [`ClassifierOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The document is not valid TOML or has unexpected keys.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The sum tolerance is negative, not finite, or at least 100.
    #[error("Invalid tolerance {0}: must be at least 0 and below 100")]
    Tolerance(f64),
}

/// Tunables for a [`crate::Classifier`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierOptions {
    /// Absolute tolerance, in percentage points, on `sand + silt + clay`.
    pub tolerance: f64,
    /// Behaviour of batch classification on invalid rows.
    pub policy: BatchPolicy,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ClassifierOptions {
    /// Default tolerance with the strict policy.
    pub const DEFAULT: Self = Self {
        tolerance: DEFAULT_SUM_TOLERANCE,
        policy: BatchPolicy::Strict,
    };

    /// Parses options from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails to parse or the tolerance is
    /// out of range.
    pub fn from_toml_str(document: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(document)?;
        options.validate()
    }

    /// Checks that the tolerance is usable. A tolerance of 100 or more would
    /// admit samples whose components sum to zero.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Tolerance`] for NaN, negative values and
    /// values of [`PERCENT_TOTAL`] or more.
    pub fn validate(self) -> Result<Self, OptionsError> {
        if !(0.0..PERCENT_TOTAL).contains(&self.tolerance) {
            return Err(OptionsError::Tolerance(self.tolerance));
        }
        Ok(self)
    }

    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}
