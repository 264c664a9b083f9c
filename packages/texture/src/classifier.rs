//! Point-in-polygon texture classification.
//!
//! A sample is validated, scaled to sum to exactly 100, projected onto the
//! ternary plane and tested against each region of the chosen standard in
//! catalog order. Edges count as inside, so a sample on a shared edge
//! matches both neighbours; the first region in catalog order wins.

use std::collections::BTreeMap;

use soil_texture_models::{
    BatchPolicy, ClassificationResult, Coordinate, InvalidCoordinateError, Standard,
};

use crate::catalog::{Region, regions_for};
use crate::options::{ClassifierOptions, OptionsError};
use crate::{BatchError, ClassifyError};

/// Per-row outcome of a tolerant batch.
pub type RowOutcome = Result<ClassificationResult, InvalidCoordinateError>;

/// Classifies samples against one standard's region catalog.
///
/// Holds no mutable state; copies are cheap and can be shared across
/// threads. Options are validated on construction, so a classifier never
/// runs with an unusable tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    standard: Standard,
    regions: &'static [Region],
    options: ClassifierOptions,
}

impl Classifier {
    /// Builds a classifier over the built-in catalog of `standard`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Tolerance`] if the options do not pass
    /// [`ClassifierOptions::validate`].
    pub fn new(standard: Standard, options: ClassifierOptions) -> Result<Self, OptionsError> {
        Self::with_regions(standard, regions_for(standard), options)
    }

    /// Classifier with [`ClassifierOptions::default`], which always validate.
    #[must_use]
    pub const fn with_defaults(standard: Standard) -> Self {
        Self {
            standard,
            regions: regions_for(standard),
            options: ClassifierOptions::DEFAULT,
        }
    }

    /// Builds a classifier for a standard given by name.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidStandard`] if the name is unknown and
    /// [`ClassifyError::InvalidOptions`] if the options are out of range.
    pub fn from_name(name: &str, options: ClassifierOptions) -> Result<Self, ClassifyError> {
        Ok(Self::new(name.parse()?, options)?)
    }

    /// Builds a classifier over an explicit region table instead of the
    /// built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::Tolerance`] if the options are out of range.
    pub fn with_regions(
        standard: Standard,
        regions: &'static [Region],
        options: ClassifierOptions,
    ) -> Result<Self, OptionsError> {
        Ok(Self {
            standard,
            regions,
            options: options.validate()?,
        })
    }

    #[must_use]
    pub const fn standard(&self) -> Standard {
        self.standard
    }

    #[must_use]
    pub const fn regions(&self) -> &'static [Region] {
        self.regions
    }

    #[must_use]
    pub const fn options(&self) -> ClassifierOptions {
        self.options
    }

    /// Classifies a single sample.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if a component is negative or not
    /// finite, or if the components do not sum to 100 within the
    /// configured tolerance.
    pub fn classify(
        &self,
        point: Coordinate,
    ) -> Result<ClassificationResult, InvalidCoordinateError> {
        let normalized = point.validate(self.options.tolerance)?.normalized();

        let result = self
            .regions
            .iter()
            .find(|region| region.contains(normalized))
            .map_or(ClassificationResult::Unclassified, |region| {
                ClassificationResult::Class(region.name)
            });

        log::trace!(
            "{} ({}, {}, {}) -> {result}",
            self.standard,
            point.sand,
            point.silt,
            point.clay
        );

        Ok(result)
    }

    /// Classifies every sample, aborting on the first invalid one
    /// regardless of the configured policy.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] carrying the index of the first invalid
    /// sample.
    pub fn classify_many(
        &self,
        points: &[Coordinate],
    ) -> Result<Vec<ClassificationResult>, BatchError> {
        points
            .iter()
            .enumerate()
            .map(|(row, &point)| {
                self.classify(point)
                    .map_err(|source| BatchError { row, source })
            })
            .collect()
    }

    /// Classifies every sample according to the configured [`BatchPolicy`].
    ///
    /// Under [`BatchPolicy::Tolerant`] invalid samples are reported in place
    /// and the batch always succeeds.
    ///
    /// # Errors
    ///
    /// Under [`BatchPolicy::Strict`], returns a [`BatchError`] for the first
    /// invalid sample.
    pub fn classify_batch(&self, points: &[Coordinate]) -> Result<Vec<RowOutcome>, BatchError> {
        let outcomes = match self.options.policy {
            BatchPolicy::Strict => self
                .classify_many(points)?
                .into_iter()
                .map(Ok)
                .collect::<Vec<_>>(),
            BatchPolicy::Tolerant => points
                .iter()
                .enumerate()
                .map(|(row, &point)| {
                    let outcome = self.classify(point);
                    if let Err(e) = &outcome {
                        log::warn!("Skipping row {row}: {e}");
                    }
                    outcome
                })
                .collect(),
        };

        log::debug!(
            "Classified {} samples against {} ({} policy)",
            outcomes.len(),
            self.standard,
            self.options.policy
        );

        Ok(outcomes)
    }
}

/// Counts of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Samples that landed in a region.
    pub classified: usize,
    /// Valid samples outside every region.
    pub unclassified: usize,
    /// Samples rejected by validation or parsing.
    pub invalid: usize,
    /// Samples per class name.
    pub per_class: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(ClassificationResult::Class(name)) => {
                    summary.classified += 1;
                    *summary.per_class.entry(*name).or_default() += 1;
                }
                Ok(ClassificationResult::Unclassified) => summary.unclassified += 1,
                Err(_) => summary.invalid += 1,
            }
        }
        summary
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.classified + self.unclassified + self.invalid
    }
}

/// Classifies one sample with default options.
///
/// # Errors
///
/// See [`Classifier::classify`].
pub fn classify(
    point: Coordinate,
    standard: Standard,
) -> Result<ClassificationResult, InvalidCoordinateError> {
    Classifier::with_defaults(standard).classify(point)
}

/// Classifies one sample against a standard given by name.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidStandard`] for an unknown name, otherwise
/// see [`Classifier::classify`].
pub fn classify_named(
    point: Coordinate,
    standard: &str,
) -> Result<ClassificationResult, ClassifyError> {
    let standard: Standard = standard.parse()?;
    Ok(Classifier::with_defaults(standard).classify(point)?)
}

/// Classifies samples in order with default (strict) options.
///
/// # Errors
///
/// Returns the error of the first invalid sample.
pub fn classify_many(
    points: &[Coordinate],
    standard: Standard,
) -> Result<Vec<ClassificationResult>, InvalidCoordinateError> {
    Classifier::with_defaults(standard)
        .classify_many(points)
        .map_err(|e| e.source)
}
