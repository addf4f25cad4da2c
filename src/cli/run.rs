use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args};
use serde::Serialize;
use tracing::{error, info};

use crate::cli::{parse_tolerance, OutputFormat};
use crate::core::types::{MhcClass, ReleaseKind, TableKind};
use crate::diff::cells::DEFAULT_TOLERANCE;
use crate::diff::engine::{run_tabular_comparison, ComparisonConfig, ComparisonError};
use crate::diff::structural::{run_json_comparison, run_yaml_comparison};
use crate::report::writer::{write_header, BannerColumns};
use crate::utils::discovery::{
    find_file, AGGREGATED_TSV, INPUT_YML, METRICS_JSON, REFERENCE_MATCHES, UNAGGREGATED_TSV,
};
use crate::utils::validation::{parse_column_list, validate_columns, ValidationError};

#[derive(Args)]
#[command(group(
    ArgGroup::new("release")
        .required(true)
        .args(["immuno_release", "pvactools_release"])
))]
pub struct RunArgs {
    /// First results folder
    #[arg(required = true)]
    pub results_folder1: PathBuf,

    /// Second results folder
    #[arg(required = true)]
    pub results_folder2: PathBuf,

    /// Prefix of the generated reports; one report is written per MHC class
    #[arg(required = true)]
    pub output_prefix: String,

    /// Only compare one MHC class (default: both)
    #[arg(long, value_enum)]
    pub mhc_class: Option<MhcClass>,

    /// Comma-separated columns to include in the aggregated TSV comparison
    #[arg(long)]
    pub aggregated_columns: Option<String>,

    /// Comma-separated columns to include in the unaggregated TSV comparison
    #[arg(long)]
    pub unaggregated_columns: Option<String>,

    /// Comma-separated columns to include in the reference match TSV comparison
    #[arg(long)]
    pub reference_match_columns: Option<String>,

    /// The results folders come from immuno pipeline releases
    #[arg(long)]
    pub immuno_release: bool,

    /// The results folders come from pvactools releases
    #[arg(long)]
    pub pvactools_release: bool,

    /// Maximum absolute difference for numeric values to be considered equal
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, value_parser = parse_tolerance)]
    pub tolerance: f64,
}

/// Everything a full results-folder comparison needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub results_folder1: PathBuf,
    pub results_folder2: PathBuf,
    pub output_prefix: String,
    pub release: ReleaseKind,
    pub classes: Vec<MhcClass>,
    pub aggregated_columns: Vec<String>,
    pub unaggregated_columns: Vec<String>,
    pub reference_match_columns: Vec<String>,
    pub comparison: ComparisonConfig,
}

fn column_list(kind: TableKind, given: Option<&str>) -> Result<Vec<String>, ValidationError> {
    let settings = kind.settings();
    let columns = given.map_or_else(|| settings.default_column_list(), parse_column_list);
    validate_columns(&settings, &columns)?;
    Ok(columns)
}

impl RunConfig {
    /// Build the configuration, validating every column list before any
    /// file is touched.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for an empty or unrecognized column list.
    pub fn from_args(args: RunArgs) -> Result<Self, ValidationError> {
        let release = if args.pvactools_release {
            ReleaseKind::Pvactools
        } else {
            ReleaseKind::Immuno
        };

        Ok(Self {
            aggregated_columns: column_list(TableKind::Aggregated, args.aggregated_columns.as_deref())?,
            unaggregated_columns: column_list(
                TableKind::Unaggregated,
                args.unaggregated_columns.as_deref(),
            )?,
            reference_match_columns: column_list(
                TableKind::ReferenceMatch,
                args.reference_match_columns.as_deref(),
            )?,
            results_folder1: args.results_folder1,
            results_folder2: args.results_folder2,
            output_prefix: args.output_prefix,
            release,
            classes: args
                .mhc_class
                .map_or_else(|| vec![MhcClass::One, MhcClass::Two], |c| vec![c]),
            comparison: ComparisonConfig {
                tolerance: args.tolerance,
                parallel: true,
            },
        })
    }

    /// Report path for a class folder prefix, e.g. `out_MHC_Class_I.tsv`
    #[must_use]
    pub fn output_path(&self, class_prefix: &str) -> PathBuf {
        PathBuf::from(format!(
            "{}_{}.tsv",
            self.output_prefix,
            class_prefix.replace('/', "_")
        ))
    }
}

/// How one comparison of a class ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    /// The input was not found in the named folder(s)
    Missing { folder: String },
    /// The release layout has no such input
    NotApplicable,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub comparison: &'static str,
    #[serde(flatten)]
    pub status: StepStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    pub prefix: &'static str,
    pub report: PathBuf,
    pub steps: Vec<StepReport>,
}

/// Locate one input in both folders and run `compare` when both exist.
///
/// A missing input or a failing comparison is logged and recorded; it
/// never stops the remaining comparisons.
fn run_step(
    config: &RunConfig,
    prefix: &str,
    (name, subdir, pattern): (&'static str, &str, &str),
    compare: impl FnOnce(&Path, &Path) -> Result<(), ComparisonError>,
) -> StepReport {
    let path1 = find_file(&config.results_folder1, subdir, pattern);
    let path2 = find_file(&config.results_folder2, subdir, pattern);

    let status = match (path1, path2) {
        (Some(p1), Some(p2)) => {
            info!("Running the {name} comparison tool...");
            match compare(&p1, &p2) {
                Ok(()) => StepStatus::Completed,
                Err(e) => {
                    error!("ERROR: {name} comparison failed for {prefix}: {e}");
                    StepStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        }
        (found1, found2) => {
            let folder = match (found1, found2) {
                (Some(_), None) => "folder 2",
                (None, Some(_)) => "folder 1",
                _ => "either folder",
            };
            let location = if folder == "either folder" {
                "either results folder".to_string()
            } else {
                format!("results {folder}")
            };
            error!("ERROR: Could not locate the {name} file in {location} for {prefix}.");
            StepStatus::Missing {
                folder: folder.to_string(),
            }
        }
    };

    if status == StepStatus::Completed {
        info!("\u{2713} Comparison completed successfully.");
    } else {
        info!("\u{2716} Comparison skipped.");
    }

    StepReport {
        comparison: name,
        status,
    }
}

/// Run every comparison of one MHC class into its own report.
///
/// # Errors
///
/// Returns an error only if the report file cannot be started.
pub fn run_class(config: &RunConfig, class: MhcClass) -> anyhow::Result<ClassReport> {
    let prefix = config.release.prefix(class);
    let output = config.output_path(prefix);
    write_header(
        &output,
        &BannerColumns {
            aggregated: &config.aggregated_columns,
            unaggregated: &config.unaggregated_columns,
            reference_match: &config.reference_match_columns,
        },
    )?;
    info!("Comparing {prefix} results into {}", output.display());

    let mut steps = Vec::new();
    let class_dir = format!("{prefix}/");
    let log_dir = format!("{prefix}/log");

    if config.release.has_input_yml() {
        steps.push(run_step(config, prefix, ("input YML", &log_dir, INPUT_YML), |p1, p2| {
            run_yaml_comparison(p1, p2, &output).map(|_| ())
        }));
    } else {
        info!("Input YML files are not included in immuno pipeline results");
        info!("\u{2716} Comparison skipped.");
        steps.push(StepReport {
            comparison: "input YML",
            status: StepStatus::NotApplicable,
        });
    }

    steps.push(run_step(
        config,
        prefix,
        ("metrics JSON", &class_dir, METRICS_JSON),
        |p1, p2| run_json_comparison(p1, p2, &output).map(|_| ()),
    ));

    for (name, kind, pattern, columns) in [
        ("aggregated TSV", TableKind::Aggregated, AGGREGATED_TSV, &config.aggregated_columns),
        ("unaggregated TSV", TableKind::Unaggregated, UNAGGREGATED_TSV, &config.unaggregated_columns),
        (
            "reference match TSV",
            TableKind::ReferenceMatch,
            REFERENCE_MATCHES,
            &config.reference_match_columns,
        ),
    ] {
        steps.push(run_step(config, prefix, (name, &class_dir, pattern), |p1, p2| {
            run_tabular_comparison(kind, p1, p2, &output, columns, &config.comparison).map(|_| ())
        }));
    }

    let rule = "\u{2500}".repeat(55);
    info!("{rule}");
    info!("Successfully generated {prefix} comparison report.");
    info!("{rule}");

    Ok(ClassReport {
        prefix,
        report: output,
        steps,
    })
}

pub fn run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = RunConfig::from_args(args)?;

    let mut reports = Vec::new();
    for class in &config.classes {
        reports.push(run_class(&config, *class)?);
    }

    match format {
        OutputFormat::Text => {
            for report in &reports {
                let completed = report
                    .steps
                    .iter()
                    .filter(|s| s.status == StepStatus::Completed)
                    .count();
                println!(
                    "{}: {completed}/{} comparisons completed, report written to {}",
                    report.prefix,
                    report.steps.len(),
                    report.report.display()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }
    Ok(())
}
