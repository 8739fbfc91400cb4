use crate::error::{PmResult, ProbMapError};
use serde::{Serialize, Serializer};
use std::fmt;

/// One probability cutoff of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Name of the per-threshold output directory, e.g. `thresh0.95`.
    pub fn dir_name(&self) -> String {
        format!("thresh{}", self)
    }
}

// Shortest round-trip decimal with a mandatory fractional part: 1.0, 0.95, 0.9
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.to_string();
        if s.contains('.') || !self.0.is_finite() {
            f.write_str(&s)
        } else {
            write!(f, "{}.0", s)
        }
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Order-of-magnitude digit count: `|trunc(log10 |x|)|`, and 1 for zero.
///
/// Values below one count their leading fractional zeros, so a step of
/// `0.005` asks for more decimals than a step of `0.05`.
pub fn decimal_digit_count(x: f64) -> u32 {
    if x == 0.0 {
        return 1;
    }
    x.abs().log10().trunc().abs() as u32
}

/// Most decimal places a threshold can be rounded to without `f64` noise.
pub const MAX_PRECISION: u32 = 15;

/// Decimal places every generated threshold is rounded to.
pub fn precision_for(upper: f64, lower: f64, step: f64) -> u32 {
    [upper, lower, step]
        .into_iter()
        .map(decimal_digit_count)
        .max()
        .unwrap_or(0)
        + 1
}

pub fn round_to(x: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (x * scale).round() / scale
}

/// Thresholds from `upper` down to, but excluding, `lower`.
///
/// Each value is computed as `upper - i * step` and rounded, so rounding
/// error never accumulates; the stop condition is checked on the rounded
/// value. `upper == lower` gives the single threshold `[upper]`.
pub fn generate(upper: f64, lower: f64, step: f64) -> PmResult<Vec<Threshold>> {
    if !(upper.is_finite() && lower.is_finite() && step.is_finite()) {
        return Err(ProbMapError::Config(format!(
            "Thresholds must be finite (upper {}, lower {}, step {})",
            upper, lower, step
        )));
    }
    if step <= 0.0 {
        return Err(ProbMapError::Config(format!(
            "Threshold step must be positive, got {}",
            step
        )));
    }
    if upper < lower {
        return Err(ProbMapError::Config(format!(
            "Upper threshold {} is below lower threshold {}",
            upper, lower
        )));
    }

    let digits = precision_for(upper, lower, step);
    if digits > MAX_PRECISION {
        return Err(ProbMapError::Config(format!(
            "Thresholds {} to {} by {} need {} decimal places, at most {} are supported",
            upper, lower, step, digits, MAX_PRECISION
        )));
    }
    let stop = round_to(lower, digits);

    if round_to(upper, digits) <= stop {
        return Ok(vec![Threshold(round_to(upper, digits))]);
    }

    // round_to is monotonic, so the stop bound is crossed by this index.
    let last = (((upper - lower) / step).ceil() as u64).saturating_add(1);
    let mut out: Vec<Threshold> = Vec::new();
    for i in 0..=last {
        let value = round_to(upper - i as f64 * step, digits);
        if value <= stop {
            break;
        }
        if let Some(prev) = out.last() {
            if value >= prev.0 {
                return Err(ProbMapError::Config(format!(
                    "Step {} is too small to separate thresholds near {}",
                    step, prev
                )));
            }
        }
        out.push(Threshold(value));
    }
    Ok(out)
}
