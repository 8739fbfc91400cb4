use crate::error::{PmResult, ProbMapError};
use crate::thresholds::Threshold;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use std::process::Command;
use strum_macros::Display;
use tracing::info;

pub const MAP_BUILDER_SCRIPT: &str = "make_maps.sh";
pub const LABEL_BUILDER_SCRIPT: &str = "label_map.sh";
pub const WB_COMMAND: &str = "wb_command";

/// Mode given to everything the map-builder leaves in a threshold directory.
pub const ARTIFACT_MODE: u32 = 0o775;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Setup,
    MapBuilder,
    LabelBuilder,
}

/// Paths of the two external stages and the Workbench binary they drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub map_builder: PathBuf,
    pub label_builder: PathBuf,
    pub wb_command: PathBuf,
}

impl Toolchain {
    pub fn from_code_dir(code_dir: &Path, wb_command: PathBuf) -> Self {
        Self {
            map_builder: code_dir.join(MAP_BUILDER_SCRIPT),
            label_builder: code_dir.join(LABEL_BUILDER_SCRIPT),
            wb_command,
        }
    }
}

/// Runs one external stage to completion in `cwd`.
pub trait StageRunner {
    fn run(&self, stage: Stage, program: &Path, args: &[OsString], cwd: &Path) -> PmResult<()>;
}

/// Blocking subprocess runner. No timeout: a hung stage hangs the sweep.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl StageRunner for ProcessRunner {
    fn run(&self, stage: Stage, program: &Path, args: &[OsString], cwd: &Path) -> PmResult<()> {
        info!("Running {} {:?} {:?}", stage, program, args);
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|source| ProbMapError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProbMapError::Stage {
                stage: stage.to_string(),
                status,
            })
        }
    }
}

/// Output directory argument with a trailing separator; the stage scripts
/// append file names to it directly.
pub fn dir_arg(path: &Path) -> OsString {
    let mut arg = path.as_os_str().to_os_string();
    if !arg.to_string_lossy().ends_with(MAIN_SEPARATOR) {
        arg.push(MAIN_SEPARATOR_STR);
    }
    arg
}

/// Inputs of one map-builder call besides the threshold and directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapParams<'a> {
    pub wb_command: &'a Path,
    pub min_surf_area: u32,
    pub min_vol_area: u32,
    pub left_surface: &'a Path,
    pub right_surface: &'a Path,
}

/// `threshold prob_dir out_dir out_dir wb_command min_surf min_vol left right`
pub fn map_builder_args(
    threshold: Threshold,
    probability_dir: &Path,
    out_dir: &Path,
    params: &MapParams<'_>,
) -> Vec<OsString> {
    vec![
        OsString::from(threshold.to_string()),
        probability_dir.as_os_str().to_os_string(),
        dir_arg(out_dir),
        dir_arg(out_dir),
        params.wb_command.as_os_str().to_os_string(),
        OsString::from(params.min_surf_area.to_string()),
        OsString::from(params.min_vol_area.to_string()),
        params.left_surface.as_os_str().to_os_string(),
        params.right_surface.as_os_str().to_os_string(),
    ]
}

/// `base_filename out_dir color_file wb_command`
pub fn label_builder_args(
    base_filename: &str,
    out_dir: &Path,
    color_file: &Path,
    wb_command: &Path,
) -> Vec<OsString> {
    vec![
        OsString::from(base_filename),
        dir_arg(out_dir),
        color_file.as_os_str().to_os_string(),
        wb_command.as_os_str().to_os_string(),
    ]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// First executable called `name` in the directories of `path_var`.
pub fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// `wb_command` from `$PATH`, if installed there.
pub fn discover_wb_command() -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    find_in_path(WB_COMMAND, &path_var)
}

/// Applies `ARTIFACT_MODE` to every entry directly inside `dir`.
#[cfg(unix)]
pub fn normalize_permissions(dir: &Path) -> PmResult<()> {
    use std::os::unix::fs::PermissionsExt;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        fs::set_permissions(&path, fs::Permissions::from_mode(ARTIFACT_MODE))?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn normalize_permissions(_dir: &Path) -> PmResult<()> {
    Ok(())
}
