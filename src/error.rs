use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbMapError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Expected at least two files in {dir:?} to infer a filename pattern, found {found}")]
    EmptyDirectory { dir: PathBuf, found: usize },

    #[error("Inferred filename pattern '{template}' has {placeholders} placeholders, expected one")]
    AmbiguousTemplate {
        template: String,
        placeholders: usize,
    },

    #[error("Probability file for region '{region}' not found at {path:?}")]
    MissingProbabilityFile { region: String, path: PathBuf },

    #[error("Invalid RGBA color '{0}' (expected four 0-255 integers joined by commas)")]
    InvalidColor(String),

    #[error("Unknown region short-name '{0}'")]
    UnknownRegion(String),

    #[error("{stage} exited with {status}")]
    Stage { stage: String, status: ExitStatus },

    #[error("Could not start {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PmResult<T> = Result<T, ProbMapError>;
