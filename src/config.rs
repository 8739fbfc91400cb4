use crate::error::{PmResult, ProbMapError};
use crate::regions::RegionColorTable;
use crate::sweep::SweepSettings;
use crate::thresholds::{self, Threshold};
use crate::toolchain::{self, Toolchain, WB_COMMAND};
use clap::Args;
use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const DEFAULT_COLORFILE: &str = "colorfile.csv";
pub const DEFAULT_FILENAME: &str = "combined_clusters";
pub const DEFAULT_PROB_DIR: &str = "GRP1_singlenet_copy";
pub const DEFAULT_MIN_AREA: u32 = 200;
pub const MIDTHICKNESS_PATH: &str =
    "/mnt/rose/shared/projects/ABCD/average_surfaces/data/{}.midthickness.surf.gii";

pub fn default_midthickness(hemisphere: &str) -> PathBuf {
    PathBuf::from(MIDTHICKNESS_PATH.replace("{}", hemisphere))
}

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub thresholds: ThresholdParams,
    #[command(flatten)]
    pub paths: PathParams,
    #[command(flatten)]
    pub tools: ToolParams,
}

#[derive(Args, Debug, Clone)]
pub struct ThresholdParams {
    /// Increment between thresholds at which to create label files
    #[arg(long, visible_alias = "increment", default_value_t = 0.05)]
    pub step: f64,
    /// Threshold at which to start making label files
    #[arg(long, default_value_t = 1.0)]
    pub upper_threshold: f64,
    /// Threshold at which to stop making label files
    #[arg(long, visible_alias = "lo", default_value_t = 0.75)]
    pub low_threshold: f64,
    /// Keep making maps (without labels) down to this threshold
    #[arg(long)]
    pub map_floor: Option<f64>,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            step: 0.05,
            upper_threshold: 1.0,
            low_threshold: 0.75,
            map_floor: None,
        }
    }
}

impl ThresholdParams {
    pub fn validate(&self) -> PmResult<()> {
        if let Some(floor) = self.map_floor {
            if !floor.is_finite() || floor > self.low_threshold {
                return Err(ProbMapError::Config(format!(
                    "--map-floor {} must be a number no higher than --low-threshold {}",
                    floor, self.low_threshold
                )));
            }
        }
        // generate() carries the step/order/finiteness checks.
        self.sequence().map(|_| ())
    }

    /// Lowest bound of the sweep: the map floor when it lies below the
    /// labeling range.
    pub fn stop(&self) -> f64 {
        match self.map_floor {
            Some(floor) => floor.min(self.low_threshold),
            None => self.low_threshold,
        }
    }

    pub fn sequence(&self) -> PmResult<Vec<Threshold>> {
        thresholds::generate(self.upper_threshold, self.stop(), self.step)
    }

    /// Labeling is limited to the overlap range `[low, upper]`.
    pub fn labels(&self, threshold: Threshold) -> bool {
        let digits = thresholds::precision_for(self.upper_threshold, self.stop(), self.step);
        threshold.value() >= thresholds::round_to(self.low_threshold, digits)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PathParams {
    /// Directory holding make_maps.sh and label_map.sh; relative paths resolve against it
    #[arg(long)]
    pub code_dir: Option<PathBuf>,
    /// CSV mapping label files to colors; synthesized per threshold if it does not exist
    #[arg(short = 'c', long, default_value = DEFAULT_COLORFILE)]
    pub colorfile: PathBuf,
    /// Base name (without extension) of the label list passed to label_map.sh
    #[arg(short = 'f', long, default_value = DEFAULT_FILENAME)]
    pub filename: String,
    /// Left hemisphere midthickness .surf.gii
    #[arg(short = 'l', long = "left-midthickness")]
    pub left: Option<PathBuf>,
    /// Right hemisphere midthickness .surf.gii
    #[arg(short = 'r', long = "right-midthickness")]
    pub right: Option<PathBuf>,
    /// Output folder, created if missing [default: <code-dir>/<YYYY-MM-DD_HH-MM>]
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Folder of probability map .dscalar.nii files [default: <code-dir>/GRP1_singlenet_copy]
    #[arg(short = 'p', long = "probability-folder")]
    pub probability_folder: Option<PathBuf>,
    /// JSON object of region short-name -> "R,G,B,A" overriding the built-in colors
    #[arg(long)]
    pub region_colors: Option<PathBuf>,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            code_dir: None,
            colorfile: PathBuf::from(DEFAULT_COLORFILE),
            filename: DEFAULT_FILENAME.to_string(),
            left: None,
            right: None,
            output: None,
            probability_folder: None,
            region_colors: None,
        }
    }
}

impl PathParams {
    pub fn code_dir(&self) -> PmResult<PathBuf> {
        let cwd = env::current_dir()?;
        match &self.code_dir {
            Some(dir) => valid_readable_dir(&cwd.join(dir)),
            None => Ok(cwd),
        }
    }

    pub fn probability_dir(&self, code_dir: &Path) -> PmResult<PathBuf> {
        let dir = match &self.probability_folder {
            Some(dir) => code_dir.join(dir),
            None => code_dir.join(DEFAULT_PROB_DIR),
        };
        valid_readable_dir(&dir)
    }

    pub fn output_dir(&self, code_dir: &Path) -> PmResult<PathBuf> {
        let dir = match &self.output {
            Some(dir) => code_dir.join(dir),
            None => {
                let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M").to_string();
                code_dir.join(stamp)
            }
        };
        valid_output_dir(&dir)
    }

    pub fn colorfile(&self, code_dir: &Path) -> PathBuf {
        code_dir.join(&self.colorfile)
    }

    pub fn region_colors(&self, code_dir: &Path) -> PmResult<RegionColorTable> {
        match &self.region_colors {
            Some(path) => RegionColorTable::load_from_file(valid_readable_file(&code_dir.join(path))?),
            None => Ok(RegionColorTable::standard()),
        }
    }

    pub fn surfaces(&self, code_dir: &Path) -> PmResult<(PathBuf, PathBuf)> {
        let left = match &self.left {
            Some(p) => code_dir.join(p),
            None => default_midthickness("L"),
        };
        let right = match &self.right {
            Some(p) => code_dir.join(p),
            None => default_midthickness("R"),
        };
        Ok((valid_readable_file(&left)?, valid_readable_file(&right)?))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ToolParams {
    /// Skip make_maps.sh and only build label files
    #[arg(short = 's', long, default_value_t = false)]
    pub skip_map_maker: bool,
    /// Minimum surface area
    #[arg(long, default_value_t = DEFAULT_MIN_AREA, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_surf_area: u32,
    /// Minimum volume
    #[arg(long, default_value_t = DEFAULT_MIN_AREA, value_parser = clap::value_parser!(u32).range(1..))]
    pub min_vol_area: u32,
    /// Workbench Command binary [default: wb_command found on PATH]
    #[arg(long)]
    pub wb_command: Option<PathBuf>,
}

impl Default for ToolParams {
    fn default() -> Self {
        Self {
            skip_map_maker: false,
            min_surf_area: DEFAULT_MIN_AREA,
            min_vol_area: DEFAULT_MIN_AREA,
            wb_command: None,
        }
    }
}

impl ToolParams {
    pub fn wb_command(&self) -> PmResult<PathBuf> {
        if let Some(path) = &self.wb_command {
            return Ok(path.clone());
        }
        toolchain::discover_wb_command().ok_or_else(|| {
            ProbMapError::Config(format!(
                "No {} found on PATH, pass --wb-command",
                WB_COMMAND
            ))
        })
    }
}

impl Config {
    /// Validates everything a sweep needs, creating the output folder.
    pub fn resolve(&self) -> PmResult<SweepSettings> {
        self.thresholds.validate()?;

        let code_dir = self.paths.code_dir()?;
        let probability_dir = self.paths.probability_dir(&code_dir)?;
        let (left_surface, right_surface) = self.paths.surfaces(&code_dir)?;
        let region_colors = self.paths.region_colors(&code_dir)?;
        let toolchain = Toolchain::from_code_dir(&code_dir, self.tools.wb_command()?);
        let output_dir = self.paths.output_dir(&code_dir)?;

        Ok(SweepSettings {
            thresholds: self.thresholds.clone(),
            probability_dir,
            output_dir,
            colorfile: self.paths.colorfile(&code_dir),
            filename: self.paths.filename.clone(),
            skip_map_maker: self.tools.skip_map_maker,
            min_surf_area: self.tools.min_surf_area,
            min_vol_area: self.tools.min_vol_area,
            left_surface,
            right_surface,
            toolchain,
            region_colors,
        })
    }
}

pub fn valid_readable_file(path: &Path) -> PmResult<PathBuf> {
    File::open(path)
        .map(|_| path.to_path_buf())
        .map_err(|e| ProbMapError::Config(format!("Cannot read file at {:?}: {}", path, e)))
}

pub fn valid_readable_dir(path: &Path) -> PmResult<PathBuf> {
    if !path.is_dir() {
        return Err(ProbMapError::Config(format!(
            "{:?} is not a valid readable directory path",
            path
        )));
    }
    fs::read_dir(path)
        .map(|_| path.to_path_buf())
        .map_err(|e| ProbMapError::Config(format!("Cannot read directory {:?}: {}", path, e)))
}

/// Creates `path` if needed and checks that the current user can create
/// files in it.
pub fn valid_output_dir(path: &Path) -> PmResult<PathBuf> {
    fs::create_dir_all(path).map_err(|e| {
        ProbMapError::Config(format!("Cannot create directory at {:?}: {}", path, e))
    })?;
    // Removed again on drop.
    tempfile::NamedTempFile::new_in(path).map_err(|e| {
        ProbMapError::Config(format!("Output directory {:?} is not writable: {}", path, e))
    })?;
    Ok(path.to_path_buf())
}
