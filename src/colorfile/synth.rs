use super::{ColorFile, ColorFileRecord};
use crate::error::{PmResult, ProbMapError};
use crate::pattern::FilenameTemplate;
use crate::regions::RegionColorTable;
use crate::thresholds::Threshold;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `os.path.splitext`-style split: the extension starts at the last dot that
/// is not part of a leading run of dots.
fn split_extension(name: &str) -> (&str, &str) {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(idx) => name.split_at(stem_start + idx),
        None => (name, ""),
    }
}

/// `base.dscalar.nii` -> (`base`, `.dscalar.nii`)
pub fn split_two_extensions(name: &str) -> (&str, String) {
    let (base_plus_ext1, ext2) = split_extension(name);
    let (base, ext1) = split_extension(base_plus_ext1);
    (base, format!("{}{}", ext1, ext2))
}

/// Label filename the label-builder writes for one region at one threshold:
/// `base_at_<threshold>.ext1.ext2`.
pub fn labeled_filename(probability_file: &str, threshold: Threshold) -> String {
    let (base, exts) = split_two_extensions(probability_file);
    format!("{}_at_{}{}", base, threshold, exts)
}

/// One record per region of `table`, in table order. Fails on the first
/// region whose probability file cannot be opened for reading.
pub fn synthesize(
    template: &FilenameTemplate,
    table: &RegionColorTable,
    probability_dir: &Path,
    threshold: Threshold,
) -> PmResult<ColorFile> {
    let mut records = Vec::with_capacity(table.len());
    for (region, color) in table.entries() {
        let prob_name = template.render(region.short_name());
        let prob_path = probability_dir.join(&prob_name);
        if File::open(&prob_path).is_err() {
            return Err(ProbMapError::MissingProbabilityFile {
                region: region.to_string(),
                path: prob_path,
            });
        }

        records.push(ColorFileRecord {
            filename: labeled_filename(&prob_name, threshold),
            region,
            color,
        });
    }
    Ok(ColorFile { records })
}

/// Synthesizes the color file and writes it as `out_dir/<file_name>`.
pub fn write_synthesized(
    template: &FilenameTemplate,
    table: &RegionColorTable,
    probability_dir: &Path,
    threshold: Threshold,
    out_dir: &Path,
    file_name: &str,
) -> PmResult<PathBuf> {
    let color_file = synthesize(template, table, probability_dir, threshold)?;
    let path = out_dir.join(file_name);
    color_file.write_to(&path)?;
    debug!("Wrote {} color records to {:?}", color_file.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_like_splitext() {
        assert_eq!(split_extension("a.dscalar.nii"), ("a.dscalar", ".nii"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("..x.nii"), ("..x", ".nii"));
    }

    #[test]
    fn two_extensions() {
        assert_eq!(
            split_two_extensions("sub01_Aud_prob.dscalar.nii"),
            ("sub01_Aud_prob", ".dscalar.nii".to_string())
        );
        assert_eq!(split_two_extensions("single.nii"), ("single", ".nii".to_string()));
    }

    #[test]
    fn threshold_goes_before_extensions() {
        assert_eq!(
            labeled_filename("sub01_DMN_prob.dscalar.nii", Threshold::new(0.95)),
            "sub01_DMN_prob_at_0.95.dscalar.nii"
        );
    }
}
