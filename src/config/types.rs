//! Small value types shared across the crate

use serde::{Deserialize, Serialize};

/// Progress through a run, clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ProgressPct(f64);

impl ProgressPct {
    pub const ZERO: Self = Self(0.0);
    pub const COMPLETE: Self = Self(100.0);

    pub const fn new(val: f64) -> Self {
        // NaN fails both comparisons and would slip through, so catch it first.
        let v = if val.is_nan() || val < 0.0 {
            0.0
        } else if val > 100.0 {
            100.0
        } else {
            val
        };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 >= 100.0
    }
}

impl std::fmt::Display for ProgressPct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_and_nan() {
        assert_eq!(ProgressPct::new(-3.0), ProgressPct::ZERO);
        assert_eq!(ProgressPct::new(140.0), ProgressPct::COMPLETE);
        assert_eq!(ProgressPct::new(f64::NAN), ProgressPct::ZERO);
        assert_eq!(ProgressPct::new(42.5).value(), 42.5);
    }

    #[test]
    fn display_has_one_decimal() {
        assert_eq!(ProgressPct::new(37.26).to_string(), "37.3%");
    }
}
