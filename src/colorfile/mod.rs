pub mod copy;
pub mod synth;

pub use copy::copy_color_file;
pub use synth::{synthesize, write_synthesized};

use crate::error::{PmResult, ProbMapError};
use crate::regions::{Region, Rgba};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// One row of a color-mapping file: `filename,region,R,G,B,A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorFileRecord {
    pub filename: String,
    pub region: Region,
    pub color: Rgba,
}

impl fmt::Display for ColorFileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.filename, self.region, self.color)
    }
}

/// Rows in file order. Serialized newline-joined with no header and no
/// trailing newline, which is what the label-builder reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorFile {
    pub records: Vec<ColorFileRecord>,
}

impl ColorFile {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> PmResult<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Strict parse: every row needs a known region and a valid color.
    pub fn from_reader<R: Read>(reader: R) -> PmResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (row_idx, result) in rdr.records().enumerate() {
            let rec = result?;
            if rec.len() != 6 {
                return Err(ProbMapError::Config(format!(
                    "Color file row {} has {} fields, expected 6",
                    row_idx + 1,
                    rec.len()
                )));
            }
            let region = Region::from_str(&rec[1])
                .map_err(|_| ProbMapError::UnknownRegion(rec[1].to_string()))?;
            let color: Rgba = format!("{},{},{},{}", &rec[2], &rec[3], &rec[4], &rec[5]).parse()?;
            records.push(ColorFileRecord {
                filename: rec[0].to_string(),
                region,
                color,
            });
        }
        Ok(Self { records })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PmResult<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }
}

impl fmt::Display for ColorFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rec) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", rec)?;
        }
        Ok(())
    }
}
