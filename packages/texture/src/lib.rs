#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Soil texture classification.
//!
//! Holds the USDA and HYPRES texture class polygons as compile-time data
//! ([`catalog`]) and classifies sand/silt/clay samples against them with a
//! boundary-inclusive, first-match-wins point-in-polygon test
//! ([`classifier`]). Reading samples from files and drawing the ternary
//! diagram are left to callers.

pub mod catalog;
pub mod classifier;
pub mod geometry;
pub mod options;

pub use catalog::{Region, find_region, regions_for, regions_for_name};
pub use classifier::{
    BatchSummary, Classifier, RowOutcome, classify, classify_many, classify_named,
};
pub use options::{ClassifierOptions, OptionsError};
pub use soil_texture_models::{
    BatchPolicy, ClassificationResult, Coordinate, InvalidCoordinateError, InvalidStandardError,
    Standard,
};

use thiserror::Error;

/// Errors that can occur when classifying a sample.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The sample failed validation.
    #[error("{0}")]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    /// The standard selector is not recognized.
    #[error("{0}")]
    InvalidStandard(#[from] InvalidStandardError),

    /// The classifier options are out of range.
    #[error("{0}")]
    InvalidOptions(#[from] OptionsError),
}

/// A strict batch stopped at an invalid sample.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("row {row}: {source}")]
pub struct BatchError {
    /// Zero-based index of the offending sample.
    pub row: usize,
    /// Why it was rejected.
    pub source: InvalidCoordinateError,
}
