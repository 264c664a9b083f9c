//! CSV batch classification.
//!
//! Reads a CSV table, maps three of its columns onto sand/silt/clay,
//! classifies every row and writes the table back out with a
//! `texture_class` column (CSV) or as one JSON object per row.

use std::io::{Read, Write};

use csv::StringRecord;
use serde::Serialize;
use soil_texture::{
    BatchError, BatchPolicy, BatchSummary, Classifier, Coordinate, OptionsError, RowOutcome,
};
use thiserror::Error;

/// Column appended to (or overwritten in) the output table.
pub const CLASS_COLUMN: &str = "texture_class";

/// Label written for rows skipped under the tolerant policy.
pub const INVALID_LABEL: &str = "Invalid";

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The options file is invalid.
    #[error("Config error: {0}")]
    Config(#[from] OptionsError),

    /// A mapped column is absent from the header row.
    #[error("Missing column '{column}' (available: {available})")]
    MissingColumn {
        /// The configured column name.
        column: String,
        /// Comma-separated header names.
        available: String,
    },

    /// A mapped field is not a number.
    #[error("{0}")]
    Parse(#[from] FieldError),

    /// A strict batch hit an invalid sample.
    #[error("Classification error: {0}")]
    Batch(#[from] BatchError),
}

/// A mapped field that does not hold a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: cannot parse {column} value '{value}' as a number")]
pub struct FieldError {
    /// Zero-based data row.
    pub row: usize,
    /// Column name.
    pub column: String,
    /// Raw field text.
    pub value: String,
}

/// Output encoding of the classified table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Names of the input columns holding each component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub sand: String,
    pub silt: String,
    pub clay: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            sand: "sand".to_owned(),
            silt: "silt".to_owned(),
            clay: "clay".to_owned(),
        }
    }
}

/// Header positions of the mapped columns.
struct ColumnIndices<'a> {
    mapping: &'a ColumnMapping,
    sand: usize,
    silt: usize,
    clay: usize,
}

impl<'a> ColumnIndices<'a> {
    fn resolve(mapping: &'a ColumnMapping, headers: &StringRecord) -> Result<Self, CliError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| CliError::MissingColumn {
                    column: column.to_owned(),
                    available: headers.iter().collect::<Vec<_>>().join(", "),
                })
        };

        Ok(Self {
            mapping,
            sand: find(&mapping.sand)?,
            silt: find(&mapping.silt)?,
            clay: find(&mapping.clay)?,
        })
    }

    fn coordinate(&self, row: usize, record: &StringRecord) -> Result<Coordinate, FieldError> {
        let field = |index: usize, column: &str| -> Result<f64, FieldError> {
            let raw = record.get(index).unwrap_or_default();
            raw.parse::<f64>().map_err(|_| FieldError {
                row,
                column: column.to_owned(),
                value: raw.to_owned(),
            })
        };

        Ok(Coordinate::new(
            field(self.sand, &self.mapping.sand)?,
            field(self.silt, &self.mapping.silt)?,
            field(self.clay, &self.mapping.clay)?,
        ))
    }
}

/// One row of JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifiedRow {
    row: usize,
    sample: Option<Coordinate>,
    texture_class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Classifies every row of `input` and writes the result to `output`.
///
/// Rows that cannot be parsed or fail validation abort the run under
/// [`BatchPolicy::Strict`]; under [`BatchPolicy::Tolerant`] they are
/// labelled [`INVALID_LABEL`] and counted as invalid in the summary.
///
/// # Errors
///
/// Returns an error if the input cannot be read, a mapped column is
/// missing, the output cannot be written, or (strict policy only) a row is
/// invalid.
pub fn run<R: Read, W: Write>(
    input: R,
    output: W,
    mapping: &ColumnMapping,
    classifier: &Classifier,
    format: OutputFormat,
) -> Result<BatchSummary, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let columns = ColumnIndices::resolve(mapping, &headers)?;
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Read {} rows; classifying with {}",
        records.len(),
        classifier.standard()
    );

    let parsed: Vec<Result<Coordinate, FieldError>> = records
        .iter()
        .enumerate()
        .map(|(row, record)| columns.coordinate(row, record))
        .collect();

    let (rows, points) = parsable_rows(&parsed, classifier.options().policy)?;

    let outcomes = classifier
        .classify_batch(&points)
        .map_err(|e| BatchError {
            row: rows[e.row],
            source: e.source,
        })?;

    let mut summary = BatchSummary::from_outcomes(&outcomes);
    summary.invalid += records.len() - rows.len();

    let mut row_outcomes: Vec<Option<&RowOutcome>> = vec![None; records.len()];
    for (&row, outcome) in rows.iter().zip(&outcomes) {
        row_outcomes[row] = Some(outcome);
    }

    match format {
        OutputFormat::Csv => write_csv(output, &headers, &records, &row_outcomes)?,
        OutputFormat::Json => write_json(output, &parsed, &row_outcomes)?,
    }

    log::info!(
        "Classified {} of {} rows ({} unclassified, {} invalid)",
        summary.classified,
        summary.total(),
        summary.unclassified,
        summary.invalid
    );

    Ok(summary)
}

/// Splits parsed rows into the samples to classify and their row indices.
fn parsable_rows(
    parsed: &[Result<Coordinate, FieldError>],
    policy: BatchPolicy,
) -> Result<(Vec<usize>, Vec<Coordinate>), CliError> {
    let mut rows = Vec::with_capacity(parsed.len());
    let mut points = Vec::with_capacity(parsed.len());

    for (row, result) in parsed.iter().enumerate() {
        match result {
            Ok(point) => {
                rows.push(row);
                points.push(*point);
            }
            Err(e) => match policy {
                BatchPolicy::Strict => return Err(e.clone().into()),
                BatchPolicy::Tolerant => log::warn!("Skipping {e}"),
            },
        }
    }

    Ok((rows, points))
}

fn label(outcome: Option<&RowOutcome>) -> &'static str {
    match outcome {
        Some(Ok(result)) => result.label(),
        Some(Err(_)) | None => INVALID_LABEL,
    }
}

fn write_csv<W: Write>(
    output: W,
    headers: &StringRecord,
    records: &[StringRecord],
    outcomes: &[Option<&RowOutcome>],
) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(output);
    let class_index = headers.iter().position(|header| header == CLASS_COLUMN);

    let mut header_row = headers.clone();
    if class_index.is_none() {
        header_row.push_field(CLASS_COLUMN);
    }
    writer.write_record(&header_row)?;

    for (record, outcome) in records.iter().zip(outcomes) {
        let class = label(*outcome);
        let row: StringRecord = match class_index {
            Some(index) => record
                .iter()
                .enumerate()
                .map(|(i, field)| if i == index { class } else { field })
                .collect(),
            None => {
                let mut row = record.clone();
                row.push_field(class);
                row
            }
        };
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(
    output: W,
    parsed: &[Result<Coordinate, FieldError>],
    outcomes: &[Option<&RowOutcome>],
) -> Result<(), CliError> {
    let rows: Vec<ClassifiedRow> = parsed
        .iter()
        .zip(outcomes)
        .enumerate()
        .map(|(row, (sample, outcome))| ClassifiedRow {
            row,
            sample: sample.as_ref().ok().copied(),
            texture_class: label(*outcome),
            error: match (sample, outcome) {
                (Err(e), _) => Some(e.to_string()),
                (Ok(_), Some(Err(e))) => Some(e.to_string()),
                _ => None,
            },
        })
        .collect();

    serde_json::to_writer_pretty(output, &rows)?;
    Ok(())
}
