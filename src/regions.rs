use crate::error::{PmResult, ProbMapError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Brain networks with a probability map per subject group.
///
/// Declaration order is the row order of every synthesized color file.
#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, AsRefStr, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Region {
    Aud,
    CO,
    DAN,
    DMN,
    FP,
    MTL,
    PMN,
    PON,
    Sal,
    SMd,
    SMl,
    Tpole,
    VAN,
    Vis,
}

impl Region {
    pub fn short_name(&self) -> &str {
        self.as_ref()
    }

    // Network atlas colors.
    pub fn default_color(&self) -> Rgba {
        match self {
            Self::Aud => Rgba::new(255, 0, 255, 255),
            Self::CO => Rgba::new(128, 0, 128, 255),
            Self::DAN => Rgba::new(0, 110, 255, 255),
            Self::DMN => Rgba::new(255, 0, 0, 255),
            Self::FP => Rgba::new(0, 192, 0, 255),
            Self::MTL => Rgba::new(192, 160, 0, 255),
            Self::PMN => Rgba::new(192, 192, 192, 255),
            Self::PON => Rgba::new(0, 255, 255, 255),
            Self::Sal => Rgba::new(0, 0, 0, 255),
            Self::SMd => Rgba::new(0, 0, 0, 255),
            Self::SMl => Rgba::new(255, 0, 128, 255),
            Self::Tpole => Rgba::new(128, 0, 128, 255),
            Self::VAN => Rgba::new(0, 0, 128, 255),
            Self::Vis => Rgba::new(0, 0, 255, 255),
        }
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.short_name())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Region::from_str(&s).map_err(|_| de::Error::custom(ProbMapError::UnknownRegion(s)))
    }
}

/// Display color of a label, written as `R,G,B,A` in color files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ProbMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u8> = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| ProbMapError::InvalidColor(s.to_string()))?;

        match parts.as_slice() {
            [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
            _ => Err(ProbMapError::InvalidColor(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Region -> color mapping, one entry for every `Region`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionColorTable {
    colors: HashMap<Region, Rgba>,
}

impl Default for RegionColorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RegionColorTable {
    pub fn standard() -> Self {
        let colors = Region::iter().map(|r| (r, r.default_color())).collect();
        Self { colors }
    }

    pub fn color(&self, region: Region) -> Rgba {
        self.colors
            .get(&region)
            .copied()
            .unwrap_or_else(|| region.default_color())
    }

    /// Entries in `Region` declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (Region, Rgba)> + '_ {
        Region::iter().map(move |r| (r, self.color(r)))
    }

    pub fn len(&self) -> usize {
        Region::iter().count()
    }

    pub fn with_overrides(mut self, overrides: BTreeMap<Region, Rgba>) -> Self {
        self.colors.extend(overrides);
        self
    }

    /// Parses a JSON object such as `{"DMN": "255,0,0,255"}` and applies it
    /// on top of the standard table. Unknown regions and malformed colors are
    /// rejected here rather than when the color file is written.
    pub fn from_json_str(content: &str) -> PmResult<Self> {
        let overrides: BTreeMap<Region, Rgba> = serde_json::from_str(content)?;
        Ok(Self::standard().with_overrides(overrides))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PmResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
