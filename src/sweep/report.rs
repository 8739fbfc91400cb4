use crate::error::PmResult;
use crate::thresholds::Threshold;
use crate::toolchain::Stage;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "sweep_report.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Below the overlap range; maps only.
    BelowOverlapRange,
    LabelBuilderFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowOverlapRange => f.write_str("below overlap range"),
            Self::LabelBuilderFailed(reason) => write!(f, "label-builder failed: {}", reason),
        }
    }
}

/// Terminal state of one threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdOutcome {
    Labeled { color_file: PathBuf },
    Skipped { reason: SkipReason },
    Failed { stage: Stage, reason: String },
}

impl ThresholdOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Labeled { .. } => "labeled",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Labeled { color_file } => color_file.display().to_string(),
            Self::Skipped { reason } => reason.to_string(),
            Self::Failed { stage, reason } => format!("{}: {}", stage, reason),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    threshold: Threshold,
    directory: String,
    outcome: &'static str,
    detail: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub entries: Vec<(Threshold, ThresholdOutcome)>,
}

impl SweepReport {
    pub fn push(&mut self, threshold: Threshold, outcome: ThresholdOutcome) {
        self.entries.push((threshold, outcome));
    }

    pub fn outcome(&self, threshold: Threshold) -> Option<&ThresholdOutcome> {
        self.entries
            .iter()
            .find(|(t, _)| *t == threshold)
            .map(|(_, o)| o)
    }

    fn count(&self, kind: &str) -> usize {
        self.entries.iter().filter(|(_, o)| o.kind() == kind).count()
    }

    pub fn labeled(&self) -> usize {
        self.count("labeled")
    }

    pub fn skipped(&self) -> usize {
        self.count("skipped")
    }

    pub fn failed(&self) -> usize {
        self.count("failed")
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> PmResult<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for (threshold, outcome) in &self.entries {
            let detail = outcome.detail();
            wtr.serialize(ReportRow {
                threshold: *threshold,
                directory: threshold.dir_name(),
                outcome: outcome.kind(),
                detail: &detail,
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
