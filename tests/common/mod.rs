#![allow(dead_code)]

use probmap::config::ThresholdParams;
use probmap::regions::{Region, RegionColorTable};
use probmap::sweep::SweepSettings;
use probmap::toolchain::Toolchain;
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tempfile::TempDir;

pub const TEMPLATE: &str = "sub01_{}_prob.dscalar.nii";

pub fn prob_name(region: Region) -> String {
    TEMPLATE.replace("{}", region.short_name())
}

/// Temp tree with one probability file per region and empty surface files.
pub struct Workspace {
    pub dir: TempDir,
    pub prob_dir: PathBuf,
    pub out_dir: PathBuf,
    pub left: PathBuf,
    pub right: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let prob_dir = dir.path().join("probabilities");
        let out_dir = dir.path().join("out");
        fs::create_dir_all(&prob_dir).unwrap();
        fs::create_dir_all(&out_dir).unwrap();
        for region in Region::iter() {
            fs::write(prob_dir.join(prob_name(region)), b"scalar").unwrap();
        }
        let left = dir.path().join("L.midthickness.surf.gii");
        let right = dir.path().join("R.midthickness.surf.gii");
        fs::write(&left, b"surf").unwrap();
        fs::write(&right, b"surf").unwrap();

        Self {
            dir,
            prob_dir,
            out_dir,
            left,
            right,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn settings(&self) -> SweepSettings {
        SweepSettings {
            thresholds: ThresholdParams::default(),
            probability_dir: self.prob_dir.clone(),
            output_dir: self.out_dir.clone(),
            colorfile: self.path().join("colorfile.csv"),
            filename: "combined_clusters".to_string(),
            skip_map_maker: false,
            min_surf_area: 200,
            min_vol_area: 200,
            left_surface: self.left.clone(),
            right_surface: self.right.clone(),
            toolchain: Toolchain::from_code_dir(self.path(), PathBuf::from("wb_command")),
            region_colors: RegionColorTable::standard(),
        }
    }
}

/// Writes an executable shell script.
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, format!("#!/bin/sh\n{}", body)).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}
