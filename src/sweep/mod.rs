pub mod report;

pub use report::{SkipReason, SweepReport, ThresholdOutcome, REPORT_FILE};

use crate::colorfile;
use crate::config::ThresholdParams;
use crate::error::{PmResult, ProbMapError};
use crate::pattern::{self, FilenameTemplate};
use crate::regions::RegionColorTable;
use crate::thresholds::Threshold;
use crate::toolchain::{self, MapParams, Stage, StageRunner, Toolchain};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Fully validated inputs of one sweep.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub thresholds: ThresholdParams,
    pub probability_dir: PathBuf,
    pub output_dir: PathBuf,
    pub colorfile: PathBuf,
    pub filename: String,
    pub skip_map_maker: bool,
    pub min_surf_area: u32,
    pub min_vol_area: u32,
    pub left_surface: PathBuf,
    pub right_surface: PathBuf,
    pub toolchain: Toolchain,
    pub region_colors: RegionColorTable,
}

impl SweepSettings {
    pub fn threshold_dir(&self, threshold: Threshold) -> PathBuf {
        self.output_dir.join(threshold.dir_name())
    }

    fn map_params(&self) -> MapParams<'_> {
        MapParams {
            wb_command: &self.toolchain.wb_command,
            min_surf_area: self.min_surf_area,
            min_vol_area: self.min_vol_area,
            left_surface: &self.left_surface,
            right_surface: &self.right_surface,
        }
    }
}

/// Where each threshold's color file comes from. Decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSource {
    Copy(PathBuf),
    Synthesize(FilenameTemplate),
}

impl ColorSource {
    pub fn resolve(colorfile: &Path, probability_dir: &Path) -> PmResult<Self> {
        if colorfile.exists() {
            info!("Using existing color file {:?}", colorfile);
            return Ok(Self::Copy(colorfile.to_path_buf()));
        }
        let template = pattern::infer(probability_dir)?;
        info!("Inferred probability file pattern '{}'", template);
        Ok(Self::Synthesize(template))
    }
}

fn color_file_name(settings: &SweepSettings) -> PmResult<String> {
    settings
        .colorfile
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ProbMapError::Config(format!(
                "Color file path {:?} has no file name",
                settings.colorfile
            ))
        })
}

/// Map, color and label one threshold. `Err` only for run-fatal problems.
pub fn process_threshold<R: StageRunner>(
    settings: &SweepSettings,
    source: &ColorSource,
    runner: &R,
    threshold: Threshold,
) -> PmResult<ThresholdOutcome> {
    let out_dir = settings.threshold_dir(threshold);
    if let Err(e) = fs::create_dir_all(&out_dir) {
        return Ok(ThresholdOutcome::Failed {
            stage: Stage::Setup,
            reason: e.to_string(),
        });
    }

    if !settings.skip_map_maker {
        let args = toolchain::map_builder_args(
            threshold,
            &settings.probability_dir,
            &out_dir,
            &settings.map_params(),
        );
        if let Err(e) = runner.run(
            Stage::MapBuilder,
            &settings.toolchain.map_builder,
            &args,
            &out_dir,
        ) {
            return Ok(ThresholdOutcome::Failed {
                stage: Stage::MapBuilder,
                reason: e.to_string(),
            });
        }
        if let Err(e) = toolchain::normalize_permissions(&out_dir) {
            warn!("Could not set permissions in {:?}: {}", out_dir, e);
        }
    }

    if !settings.thresholds.labels(threshold) {
        return Ok(ThresholdOutcome::Skipped {
            reason: SkipReason::BelowOverlapRange,
        });
    }

    let color_file = match source {
        ColorSource::Copy(path) => colorfile::copy_color_file(path, &out_dir)?,
        ColorSource::Synthesize(template) => colorfile::write_synthesized(
            template,
            &settings.region_colors,
            &settings.probability_dir,
            threshold,
            &out_dir,
            &color_file_name(settings)?,
        )?,
    };

    let args = toolchain::label_builder_args(
        &settings.filename,
        &out_dir,
        &color_file,
        &settings.toolchain.wb_command,
    );
    match runner.run(
        Stage::LabelBuilder,
        &settings.toolchain.label_builder,
        &args,
        &out_dir,
    ) {
        Ok(()) => Ok(ThresholdOutcome::Labeled { color_file }),
        Err(e) => Ok(ThresholdOutcome::Skipped {
            reason: SkipReason::LabelBuilderFailed(e.to_string()),
        }),
    }
}

/// Runs every threshold, highest first, and writes `sweep_report.csv` into
/// the output directory. Per-threshold failures are recorded, not returned.
pub fn run<R: StageRunner>(settings: &SweepSettings, runner: &R) -> PmResult<SweepReport> {
    let all_thresholds = settings.thresholds.sequence()?;
    info!(
        "Sweeping {} thresholds from {} to {}",
        all_thresholds.len(),
        all_thresholds.first().map(|t| t.to_string()).unwrap_or_default(),
        all_thresholds.last().map(|t| t.to_string()).unwrap_or_default()
    );

    let source = ColorSource::resolve(&settings.colorfile, &settings.probability_dir)?;

    let mut report = SweepReport::default();
    for threshold in all_thresholds {
        info!("Threshold {}", threshold);
        let outcome = process_threshold(settings, &source, runner, threshold)?;
        match &outcome {
            ThresholdOutcome::Labeled { .. } => info!("Labeled threshold {}", threshold),
            ThresholdOutcome::Skipped {
                reason: SkipReason::BelowOverlapRange,
            } => info!("Threshold {} is below the overlap range, maps only", threshold),
            ThresholdOutcome::Skipped { reason } => {
                warn!("Skipped labeling at threshold {}: {}", threshold, reason)
            }
            ThresholdOutcome::Failed { stage, reason } => {
                error!("Threshold {} failed in {}: {}", threshold, stage, reason)
            }
        }
        report.push(threshold, outcome);
    }

    report.write_csv(settings.output_dir.join(REPORT_FILE))?;
    Ok(report)
}
