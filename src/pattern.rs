use crate::error::{PmResult, ProbMapError};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const PLACEHOLDER: &str = "{}";

/// A maximal run `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// Longest common block inside `a[alo..ahi]` x `b[blo..bhi]`.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a_start: alo,
        b_start: blo,
        len: 0,
    };
    // run[j - blo + 1] = length of the match ending at (i, j)
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = if a[i] == b[j] { prev[j - blo] + 1 } else { 0 };
            cur[j - blo + 1] = k;
            if k > best.len {
                best = MatchBlock {
                    a_start: i + 1 - k,
                    b_start: j + 1 - k,
                    len: k,
                };
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Non-overlapping matching blocks of `a` and `b`, in increasing order, found
/// by recursively taking the longest common block and aligning what lies on
/// either side of it. Adjacent blocks are merged. No sentinel block.
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchBlock> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut found = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let m = longest_match(&a, &b, alo, ahi, blo, bhi);
        if m.len == 0 {
            continue;
        }
        if alo < m.a_start && blo < m.b_start {
            queue.push((alo, m.a_start, blo, m.b_start));
        }
        if m.a_start + m.len < ahi && m.b_start + m.len < bhi {
            queue.push((m.a_start + m.len, ahi, m.b_start + m.len, bhi));
        }
        found.push(m);
    }
    found.sort_by_key(|m| (m.a_start, m.b_start));

    let mut merged: Vec<MatchBlock> = Vec::with_capacity(found.len());
    for m in found {
        match merged.last_mut() {
            Some(last)
                if last.a_start + last.len == m.a_start && last.b_start + last.len == m.b_start =>
            {
                last.len += m.len;
            }
            _ => merged.push(m),
        }
    }
    merged
}

/// Shared naming scheme of a directory of probability files, with one
/// placeholder where the region short-name goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    segments: Vec<String>,
}

impl FilenameTemplate {
    pub fn parse(template: &str) -> Self {
        Self {
            segments: template.split(PLACEHOLDER).map(str::to_string).collect(),
        }
    }

    pub fn placeholders(&self) -> usize {
        self.segments.len() - 1
    }

    /// Fills every placeholder with `name`.
    pub fn render(&self, name: &str) -> String {
        self.segments.join(name)
    }

    /// Inverse of `render` for a one-placeholder template.
    pub fn extract<'a>(&self, filename: &'a str) -> Option<&'a str> {
        match self.segments.as_slice() {
            [literal] => (literal == filename).then_some(""),
            [prefix, suffix] => {
                if filename.len() < prefix.len() + suffix.len() {
                    return None;
                }
                filename.strip_prefix(prefix.as_str())?.strip_suffix(suffix.as_str())
            }
            _ => None,
        }
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(PLACEHOLDER))
    }
}

/// Template shared by two sample filenames: their common blocks, taken from
/// `first`, joined by placeholders. A divergence at the very end leaves no
/// trailing placeholder.
pub fn infer_from_names(first: &str, second: &str) -> PmResult<FilenameTemplate> {
    let chars: Vec<char> = first.chars().collect();
    let mut segments: Vec<String> = matching_blocks(first, second)
        .iter()
        .map(|m| chars[m.a_start..m.a_start + m.len].iter().collect())
        .collect();
    if segments.is_empty() {
        segments.push(String::new());
    }

    let template = FilenameTemplate { segments };
    debug!("Aligned '{}' with '{}' -> '{}'", first, second, template);

    match template.placeholders() {
        0 => {
            warn!(
                "Pattern '{}' has no placeholder, every region maps to the same file",
                template
            );
            Ok(template)
        }
        1 => Ok(template),
        n => Err(ProbMapError::AmbiguousTemplate {
            template: template.to_string(),
            placeholders: n,
        }),
    }
}

/// Samples the first two files of `dir` (by name) and infers their template.
pub fn infer<P: AsRef<Path>>(dir: P) -> PmResult<FilenameTemplate> {
    let dir = dir.as_ref();
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("Skipping non UTF-8 file name {:?}", raw),
        }
    }
    names.sort();

    match names.as_slice() {
        [first, second, ..] => infer_from_names(first, second),
        _ => Err(ProbMapError::EmptyDirectory {
            dir: dir.to_path_buf(),
            found: names.len(),
        }),
    }
}
