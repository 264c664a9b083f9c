#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Soil texture standards, sample coordinates and classification result types.
//!
//! These are the plain data types shared by the classification engine and
//! every front end that feeds it. A sample is a [`Coordinate`] of sand, silt
//! and clay percentages; a [`Standard`] selects which set of texture classes
//! the sample is matched against.

use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sum every valid [`Coordinate`] must add up to.
pub const PERCENT_TOTAL: f64 = 100.0;

/// Default absolute tolerance (in percentage points) on the sum of a
/// coordinate's components.
///
/// Half a percentage point absorbs the rounding found in laboratory
/// reports (e.g. `33.3 / 33.3 / 33.3`) while still rejecting rows whose
/// columns were mapped incorrectly.
pub const DEFAULT_SUM_TOLERANCE: f64 = 0.5;

/// Label used for samples that fall outside every region of a standard.
pub const UNCLASSIFIED_LABEL: &str = "Unclassified";

/// A soil texture classification standard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Standard {
    /// United States Department of Agriculture texture triangle (12 classes)
    Usda,
    /// HYdraulic PRoperties of European Soils texture classes (5 classes)
    Hypres,
}

impl Standard {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Usda, Self::Hypres]
    }

    /// Returns a human-readable description of the standard.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Usda => {
                "United States Department of Agriculture (USDA) Soil Texture Classification"
            }
            Self::Hypres => {
                "HYdraulic PRoperties of European Soils (HYPRES), a European framework \
                 for classifying soils based on their hydrologic properties"
            }
        }
    }
}

impl FromStr for Standard {
    type Err = InvalidStandardError;

    /// Parses a standard selector, ignoring ASCII case and surrounding
    /// whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        Self::all()
            .iter()
            .copied()
            .find(|standard| standard.as_ref().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InvalidStandardError {
                value: s.to_owned(),
            })
    }
}

impl TryFrom<&str> for Standard {
    type Error = InvalidStandardError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error returned when a standard selector does not name a known
/// [`Standard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStandardError {
    /// The selector that was provided.
    pub value: String,
}

impl std::fmt::Display for InvalidStandardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let known: Vec<&str> = Standard::all().iter().map(Standard::as_ref).collect();
        write!(
            f,
            "unknown texture standard {:?}: expected one of {}",
            self.value,
            known.join(", ")
        )
    }
}

impl std::error::Error for InvalidStandardError {}

/// One of the three components of a [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Component {
    Sand,
    Silt,
    Clay,
}

/// A soil sample position in composition space, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Sand fraction (0.05 to 2 mm), percent.
    pub sand: f64,
    /// Silt fraction (0.002 to 0.05 mm), percent.
    pub silt: f64,
    /// Clay fraction (below 0.002 mm), percent.
    pub clay: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(sand: f64, silt: f64, clay: f64) -> Self {
        Self { sand, silt, clay }
    }

    #[must_use]
    pub fn sum(self) -> f64 {
        self.sand + self.silt + self.clay
    }

    /// Returns the value of a single component.
    #[must_use]
    pub const fn component(self, component: Component) -> f64 {
        match component {
            Component::Sand => self.sand,
            Component::Silt => self.silt,
            Component::Clay => self.clay,
        }
    }

    /// Checks that every component is finite and non-negative and that the
    /// components sum to [`PERCENT_TOTAL`] within `tolerance`. A NaN
    /// tolerance admits nothing, and a zero sum is always rejected.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidCoordinateError`] describing the first violated
    /// constraint. The coordinate is never adjusted to make it pass.
    pub fn validate(self, tolerance: f64) -> Result<Self, InvalidCoordinateError> {
        for component in [Component::Sand, Component::Silt, Component::Clay] {
            let value = self.component(component);
            if !value.is_finite() {
                return Err(InvalidCoordinateError::NonFinite { component });
            }
            if value < 0.0 {
                return Err(InvalidCoordinateError::Negative { component, value });
            }
        }

        let sum = self.sum();
        let within = (sum - PERCENT_TOTAL).abs() <= tolerance;
        if !within || sum <= 0.0 {
            return Err(InvalidCoordinateError::SumOutOfTolerance { sum, tolerance });
        }

        Ok(self)
    }

    /// Scales the components so they sum to exactly [`PERCENT_TOTAL`].
    ///
    /// Only meaningful for coordinates that already passed
    /// [`Self::validate`]; a zero sum is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            return self;
        }
        let scale = PERCENT_TOTAL / sum;
        Self {
            sand: self.sand * scale,
            silt: self.silt * scale,
            clay: self.clay * scale,
        }
    }
}

/// Error returned when a [`Coordinate`] cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidCoordinateError {
    /// A component is NaN or infinite.
    NonFinite {
        /// The offending component.
        component: Component,
    },
    /// A component is below zero.
    Negative {
        /// The offending component.
        component: Component,
        /// Its value.
        value: f64,
    },
    /// The components do not sum to 100 within the configured tolerance.
    SumOutOfTolerance {
        /// Actual sum of the components.
        sum: f64,
        /// Tolerance that was exceeded.
        tolerance: f64,
    },
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { component } => {
                write!(f, "invalid coordinate: {component} is not a finite number")
            }
            Self::Negative { component, value } => {
                write!(f, "invalid coordinate: {component} is negative ({value})")
            }
            Self::SumOutOfTolerance { sum, tolerance } => write!(
                f,
                "invalid coordinate: sand + silt + clay = {sum}, expected {PERCENT_TOTAL} \
                 (tolerance {tolerance})"
            ),
        }
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// Outcome of classifying a single [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationResult {
    /// Name of the region containing the sample.
    Class(&'static str),
    /// The sample lies outside every region of the chosen standard.
    Unclassified,
}

impl ClassificationResult {
    /// Returns the class name, or [`UNCLASSIFIED_LABEL`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Class(name) => name,
            Self::Unclassified => UNCLASSIFIED_LABEL,
        }
    }

    #[must_use]
    pub const fn class_name(self) -> Option<&'static str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Unclassified => None,
        }
    }

    #[must_use]
    pub const fn is_classified(self) -> bool {
        matches!(self, Self::Class(_))
    }
}

impl std::fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ClassificationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// What a batch classification does when a row is invalid.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BatchPolicy {
    /// Abort the whole batch on the first invalid row.
    #[default]
    Strict,
    /// Record the error for the row and keep going.
    Tolerant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_display_and_parse() {
        assert_eq!(Standard::Usda.to_string(), "USDA");
        assert_eq!(Standard::Hypres.to_string(), "HYPRES");
        assert_eq!("usda".parse::<Standard>(), Ok(Standard::Usda));
        assert_eq!(" Hypres ".parse::<Standard>(), Ok(Standard::Hypres));
        assert_eq!(Standard::try_from("HYPRES"), Ok(Standard::Hypres));
    }

    #[test]
    fn unknown_standard_is_rejected() {
        let err = "XYZ".parse::<Standard>().unwrap_err();
        assert_eq!(err.value, "XYZ");
        let message = err.to_string();
        assert!(message.contains("USDA"), "message: {message}");
        assert!(message.contains("HYPRES"), "message: {message}");
    }

    #[test]
    fn standard_serde_uses_upper_case() {
        let json = serde_json::to_string(&Standard::Usda).unwrap();
        assert_eq!(json, "\"USDA\"");
        let parsed: Standard = serde_json::from_str("\"HYPRES\"").unwrap();
        assert_eq!(parsed, Standard::Hypres);
    }

    #[test]
    fn validate_accepts_rounding_within_tolerance() {
        let c = Coordinate::new(33.3, 33.3, 33.3);
        assert!(c.validate(DEFAULT_SUM_TOLERANCE).is_ok());
        assert!(c.validate(0.01).is_err());
    }

    #[test]
    fn validate_rejects_bad_sum() {
        let err = Coordinate::new(50.0, 50.0, 50.0)
            .validate(DEFAULT_SUM_TOLERANCE)
            .unwrap_err();
        assert!(matches!(
            err,
            InvalidCoordinateError::SumOutOfTolerance { sum, .. } if (sum - 150.0).abs() < 1e-9
        ));
    }

    #[test]
    fn validate_with_nan_tolerance_admits_nothing() {
        for c in [
            Coordinate::new(50.0, 50.0, 50.0),
            Coordinate::new(40.0, 40.0, 20.0),
        ] {
            assert!(matches!(
                c.validate(f64::NAN),
                Err(InvalidCoordinateError::SumOutOfTolerance { .. })
            ));
        }
    }

    #[test]
    fn validate_rejects_zero_sum_under_any_tolerance() {
        for tolerance in [100.0, 1000.0, f64::INFINITY] {
            assert!(matches!(
                Coordinate::new(0.0, 0.0, 0.0).validate(tolerance),
                Err(InvalidCoordinateError::SumOutOfTolerance { .. })
            ));
        }
    }

    #[test]
    fn validate_rejects_negative_and_non_finite() {
        assert_eq!(
            Coordinate::new(110.0, -10.0, 0.0).validate(DEFAULT_SUM_TOLERANCE),
            Err(InvalidCoordinateError::Negative {
                component: Component::Silt,
                value: -10.0,
            })
        );
        assert_eq!(
            Coordinate::new(f64::NAN, 50.0, 50.0).validate(DEFAULT_SUM_TOLERANCE),
            Err(InvalidCoordinateError::NonFinite {
                component: Component::Sand,
            })
        );
    }

    #[test]
    fn normalized_sums_to_total() {
        let c = Coordinate::new(33.3, 33.3, 33.3).normalized();
        assert!((c.sum() - PERCENT_TOTAL).abs() < 1e-9);
        assert!((c.sand - c.clay).abs() < 1e-12);
    }

    #[test]
    fn classification_result_labels() {
        assert_eq!(ClassificationResult::Class("Loam").label(), "Loam");
        assert_eq!(ClassificationResult::Unclassified.label(), UNCLASSIFIED_LABEL);
        assert_eq!(ClassificationResult::Unclassified.class_name(), None);
        assert_eq!(
            serde_json::to_string(&ClassificationResult::Class("Silt Loam")).unwrap(),
            "\"Silt Loam\""
        );
    }

    #[test]
    fn batch_policy_parse() {
        assert_eq!("tolerant".parse::<BatchPolicy>().ok(), Some(BatchPolicy::Tolerant));
        assert_eq!("STRICT".parse::<BatchPolicy>().ok(), Some(BatchPolicy::Strict));
        assert_eq!(BatchPolicy::default(), BatchPolicy::Strict);
        assert!("lenient".parse::<BatchPolicy>().is_err());
    }
}
