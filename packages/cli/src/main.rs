#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for soil texture classification.
//!
//! Classifies the sand/silt/clay columns of a CSV file against the USDA or
//! HYPRES texture triangle and writes the table back with a
//! `texture_class` column. Also lists the available standards and the
//! regions each one defines.
//!
//! Logging goes through `pretty_env_logger`; set `RUST_LOG=info` to see
//! batch summaries or `RUST_LOG=trace` for per-sample decisions.

mod batch;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use soil_texture::{BatchPolicy, Classifier, ClassifierOptions, Standard, regions_for};

use crate::batch::{CliError, ColumnMapping, OutputFormat};

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// Classify soil samples into texture classes.
#[derive(Parser)]
#[command(name = "soil_texture_cli")]
#[command(about = "Classify soil samples into USDA or HYPRES texture classes")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Classify every row of a CSV file.
    Classify {
        /// Input CSV file with a header row.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Texture standard ("USDA" or "HYPRES").
        #[arg(short, long, default_value = "USDA")]
        standard: Standard,

        /// Column holding the sand percentage.
        #[arg(long, default_value = "sand")]
        sand_col: String,

        /// Column holding the silt percentage.
        #[arg(long, default_value = "silt")]
        silt_col: String,

        /// Column holding the clay percentage.
        #[arg(long, default_value = "clay")]
        clay_col: String,

        /// What to do with invalid rows ("strict" or "tolerant").
        #[arg(long, value_parser = parse_policy)]
        policy: Option<BatchPolicy>,

        /// Allowed deviation of sand + silt + clay from 100, in percentage points.
        #[arg(long)]
        tolerance: Option<f64>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// TOML file with classifier options (`tolerance`, `policy`).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the available texture standards.
    Systems,

    /// List the regions of a standard in catalog order.
    Regions {
        /// Texture standard ("USDA" or "HYPRES").
        #[arg(short, long, default_value = "USDA")]
        standard: Standard,
    },
}

fn parse_policy(value: &str) -> Result<BatchPolicy, String> {
    value
        .parse()
        .map_err(|_| format!("unknown policy '{value}': expected 'strict' or 'tolerant'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            input,
            output,
            standard,
            sand_col,
            silt_col,
            clay_col,
            policy,
            tolerance,
            format,
            config,
        } => {
            let document = config
                .as_deref()
                .map(|path| {
                    log::debug!("Loading classifier options from {}", path.display());
                    std::fs::read_to_string(path)
                })
                .transpose()?;
            let options = resolve_options(document.as_deref(), policy, tolerance)?;

            let mapping = ColumnMapping {
                sand: sand_col,
                silt: silt_col,
                clay: clay_col,
            };

            cmd_classify(&input, output.as_deref(), &mapping, standard, options, format)?;
        }
        Commands::Systems => cmd_systems(&mut std::io::stdout().lock())?,
        Commands::Regions { standard } => cmd_regions(&mut std::io::stdout().lock(), standard)?,
    }

    Ok(())
}

/// Layers classifier options: defaults, then the `--config` document, then
/// the `--policy` and `--tolerance` flags.
fn resolve_options(
    document: Option<&str>,
    policy: Option<BatchPolicy>,
    tolerance: Option<f64>,
) -> Result<ClassifierOptions, CliError> {
    let mut options = match document {
        Some(document) => ClassifierOptions::from_toml_str(document)?,
        None => ClassifierOptions::default(),
    };
    if let Some(policy) = policy {
        options = options.with_policy(policy);
    }
    if let Some(tolerance) = tolerance {
        options = options.with_tolerance(tolerance);
    }
    Ok(options.validate()?)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_classify(
    input: &Path,
    output: Option<&Path>,
    mapping: &ColumnMapping,
    standard: Standard,
    options: ClassifierOptions,
    format: OutputFormat,
) -> Result<(), CliError> {
    let classifier = Classifier::new(standard, options)?;
    let reader = BufReader::new(File::open(input)?);

    let summary = match output {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            let summary = batch::run(reader, writer, mapping, &classifier, format)?;
            log::info!("Wrote {}", path.display());
            summary
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            let summary = batch::run(reader, &mut writer, mapping, &classifier, format)?;
            writer.flush()?;
            summary
        }
    };

    for (class, count) in &summary.per_class {
        log::info!("  {class}: {count}");
    }

    Ok(())
}

/// Prints every standard with its description and class count.
fn cmd_systems<W: Write>(out: &mut W) -> std::io::Result<()> {
    for &standard in Standard::all() {
        writeln!(
            out,
            "{:<8} {:>2} classes  {}",
            standard.as_ref(),
            regions_for(standard).len(),
            standard.description()
        )?;
    }
    Ok(())
}

/// Prints the regions of `standard` with vertices, area and label anchor.
fn cmd_regions<W: Write>(out: &mut W, standard: Standard) -> std::io::Result<()> {
    writeln!(out, "=== {standard} ===")?;
    writeln!(out)?;

    for (index, region) in regions_for(standard).iter().enumerate() {
        let vertices: Vec<String> = region
            .vertices
            .iter()
            .map(|v| format!("({}, {}, {})", v.sand, v.silt, v.clay))
            .collect();

        writeln!(out, "{:>2}. {}", index + 1, region.name)?;
        writeln!(out, "    vertices (sand, silt, clay): {}", vertices.join(" "))?;
        writeln!(out, "    area: {:.2}", region.area())?;
        if let Some(anchor) = region.label_anchor() {
            writeln!(out, "    label anchor: ({:.2}, {:.2})", anchor.x, anchor.y)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    fn print<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(command: F) -> String {
        let mut out = Vec::new();
        command(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn classify_flags_parse() {
        let cli = Cli::try_parse_from([
            "soil_texture_cli",
            "classify",
            "-i",
            "samples.csv",
            "--standard",
            "hypres",
            "--policy",
            "Tolerant",
            "--tolerance",
            "0.1",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Classify {
            standard,
            policy,
            tolerance,
            format,
            sand_col,
            config,
            ..
        } = cli.command
        else {
            panic!("expected classify");
        };
        assert_eq!(standard, Standard::Hypres);
        assert_eq!(policy, Some(BatchPolicy::Tolerant));
        assert_eq!(tolerance, Some(0.1));
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(sand_col, "sand");
        assert!(config.is_none());
    }

    #[test]
    fn unknown_policy_and_standard_are_rejected() {
        assert!(parse_policy("lenient").unwrap_err().contains("lenient"));
        assert_eq!(parse_policy("STRICT"), Ok(BatchPolicy::Strict));

        for args in [
            ["soil_texture_cli", "classify", "-i", "x.csv", "--policy", "lenient"],
            ["soil_texture_cli", "classify", "-i", "x.csv", "--standard", "xyz"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn options_default_without_config_or_flags() {
        assert_eq!(
            resolve_options(None, None, None).unwrap(),
            ClassifierOptions::default()
        );
    }

    #[test]
    fn flags_override_config_document() {
        let document = "tolerance = 2.0\npolicy = \"tolerant\"\n";

        let from_config = resolve_options(Some(document), None, None).unwrap();
        assert_eq!(from_config.policy, BatchPolicy::Tolerant);
        assert!((from_config.tolerance - 2.0).abs() < f64::EPSILON);

        let overridden =
            resolve_options(Some(document), Some(BatchPolicy::Strict), Some(0.25)).unwrap();
        assert_eq!(overridden.policy, BatchPolicy::Strict);
        assert!((overridden.tolerance - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_tolerance_flag_is_rejected() {
        for tolerance in [-1.0, 100.0, f64::NAN] {
            assert!(
                matches!(
                    resolve_options(None, None, Some(tolerance)),
                    Err(CliError::Config(_))
                ),
                "{tolerance}"
            );
        }
    }

    #[test]
    fn invalid_config_document_is_rejected() {
        assert!(matches!(
            resolve_options(Some("tolerance = \"wide\""), None, None),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            resolve_options(Some("tolerance = 500.0"), None, Some(1.0)),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn systems_lists_every_standard() {
        let output = print(cmd_systems);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), Standard::all().len());
        assert!(lines[0].starts_with("USDA"), "{output}");
        assert!(lines[0].contains("12 classes"), "{output}");
        assert!(lines[1].starts_with("HYPRES"), "{output}");
        assert!(lines[1].contains(" 5 classes"), "{output}");
    }

    #[test]
    fn regions_lists_catalog_in_order() {
        let output = print(|out| cmd_regions(out, Standard::Hypres));
        assert!(output.starts_with("=== HYPRES ===\n\n"), "{output}");
        assert!(output.contains(" 1. Coarse\n"), "{output}");
        assert!(output.contains(" 5. Very Fine\n"), "{output}");
        assert!(
            output.contains("    vertices (sand, silt, clay): (40, 0, 60) (0, 40, 60) (0, 0, 100)"),
            "{output}"
        );
        assert_eq!(output.matches("    area: ").count(), 5);
        assert_eq!(output.matches("    label anchor: ").count(), 5);
    }
}
