use crate::error::{PmResult, ProbMapError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Last component of a `/`-separated path; empty when the path ends in `/`.
fn base_name(path: &str) -> &str {
    path.rsplit(['/', std::path::MAIN_SEPARATOR]).next().unwrap_or(path)
}

/// Replaces the first comma-separated field with its bare filename. Other
/// fields pass through untouched, however many there are.
pub fn rewrite_line(line: &str) -> String {
    let mut fields: Vec<&str> = line.split(',').collect();
    if let Some(first) = fields.first_mut() {
        *first = base_name(first);
    }
    fields.join(",")
}

/// Copies `source` into `dest_dir` under the same name, stripping directory
/// components from the path column. Returns the new file's path.
pub fn copy_color_file(source: &Path, dest_dir: &Path) -> PmResult<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        ProbMapError::Config(format!("Color file path {:?} has no file name", source))
    })?;
    let content = fs::read_to_string(source)?;
    let rewritten: Vec<String> = content.lines().map(rewrite_line).collect();

    let dest = dest_dir.join(name);
    fs::write(&dest, rewritten.join("\n"))?;
    debug!("Copied {} color rows to {:?}", rewritten.len(), dest);
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_from_first_field_only() {
        assert_eq!(
            rewrite_line("/data/maps/a_at_0.9.dscalar.nii,DMN,255,0,0,255"),
            "a_at_0.9.dscalar.nii,DMN,255,0,0,255"
        );
        assert_eq!(rewrite_line("dir/x,dir/y"), "x,dir/y");
    }

    #[test]
    fn malformed_lines_pass_through() {
        assert_eq!(rewrite_line("only/one"), "one");
        assert_eq!(rewrite_line(""), "");
        assert_eq!(rewrite_line("trailing/,x"), ",x");
    }
}
