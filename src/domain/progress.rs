//! Course progress as a whole percentage.
//!
//! Every value that enters the shelf goes through [`normalize`], so a
//! [`Progress`] always holds an integer in `0..=100`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Clamp to `[0, 100]`, then round to the nearest integer (halves round up).
/// Non-finite input maps to 0.
pub fn normalize(p: f64) -> u8 {
    if !p.is_finite() {
        return 0;
    }
    p.clamp(0.0, 100.0).round() as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const NONE: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    pub fn new(raw: f64) -> Self {
        Progress(normalize(raw))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_completed(self) -> bool {
        self.0 == 100
    }

    /// Started but not finished.
    pub fn is_ongoing(self) -> bool {
        self.0 > 0 && self.0 < 100
    }
}

impl From<f64> for Progress {
    fn from(raw: f64) -> Self {
        Progress::new(raw)
    }
}

impl From<Progress> for u8 {
    fn from(p: Progress) -> Self {
        p.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Snapshots written by older builds may hold fractional, out-of-range,
/// stringly or null progress. All of them normalize on the way in.
impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum NumOrStr {
            Num(f64),
            Str(String),
        }

        let val: Option<NumOrStr> = Option::deserialize(deserializer)?;
        Ok(match val {
            None => Progress::NONE,
            Some(NumOrStr::Num(n)) => Progress::new(n),
            Some(NumOrStr::Str(s)) => s
                .trim()
                .parse::<f64>()
                .map(Progress::new)
                .unwrap_or_default(),
        })
    }
}
