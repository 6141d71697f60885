use std::time::Duration;

use serde::{Deserialize, Serialize};

const UNLIMITED: &str = "unlimited";

/// On-disk shape of a limit: a number or the word `"unlimited"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Count(i64),
    Word(String),
}

/// How many blank lines may separate two lines of one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLimit", into = "RawLimit")]
pub enum BlankLimit {
    Lines(usize),
    Unlimited,
}

impl BlankLimit {
    /// Whether a blank run of `n` lines breaks the block
    pub fn exceeded_by(self, n: usize) -> bool {
        match self {
            BlankLimit::Lines(max) => n > max,
            BlankLimit::Unlimited => false,
        }
    }
}

impl TryFrom<RawLimit> for BlankLimit {
    type Error = String;

    fn try_from(raw: RawLimit) -> Result<Self, Self::Error> {
        match raw {
            RawLimit::Count(n) => usize::try_from(n)
                .map(BlankLimit::Lines)
                .map_err(|_| format!("max_blank_lines must not be negative, got {n}")),
            RawLimit::Word(w) if w == UNLIMITED => Ok(BlankLimit::Unlimited),
            RawLimit::Word(w) => Err(format!("expected a number or \"{UNLIMITED}\", got \"{w}\"")),
        }
    }
}

impl From<BlankLimit> for RawLimit {
    fn from(limit: BlankLimit) -> Self {
        match limit {
            BlankLimit::Lines(n) => RawLimit::Count(n as i64),
            BlankLimit::Unlimited => RawLimit::Word(UNLIMITED.to_string()),
        }
    }
}

/// How many blank lines may precede an exact-indentation sibling statement
/// that still joins the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLimit", into = "RawLimit")]
pub enum SiblingBlankLimit {
    /// Written as `-1`: siblings never join, even with no blank lines between
    ExcludeSiblings,
    Lines(usize),
    Unlimited,
}

impl SiblingBlankLimit {
    /// Map a signed count onto a limit; anything below -1 counts as -1.
    pub fn from_count(n: i64) -> Self {
        match usize::try_from(n) {
            Ok(n) => SiblingBlankLimit::Lines(n),
            Err(_) => SiblingBlankLimit::ExcludeSiblings,
        }
    }

    /// Whether a blank run of `n` lines keeps a sibling out of the block
    pub fn exceeded_by(self, n: usize) -> bool {
        match self {
            SiblingBlankLimit::ExcludeSiblings => true,
            SiblingBlankLimit::Lines(max) => n > max,
            SiblingBlankLimit::Unlimited => false,
        }
    }
}

impl TryFrom<RawLimit> for SiblingBlankLimit {
    type Error = String;

    fn try_from(raw: RawLimit) -> Result<Self, Self::Error> {
        match raw {
            RawLimit::Count(n) => Ok(SiblingBlankLimit::from_count(n)),
            RawLimit::Word(w) if w == UNLIMITED => Ok(SiblingBlankLimit::Unlimited),
            RawLimit::Word(w) => Err(format!("expected a number or \"{UNLIMITED}\", got \"{w}\"")),
        }
    }
}

impl From<SiblingBlankLimit> for RawLimit {
    fn from(limit: SiblingBlankLimit) -> Self {
        match limit {
            SiblingBlankLimit::ExcludeSiblings => RawLimit::Count(-1),
            SiblingBlankLimit::Lines(n) => RawLimit::Count(n as i64),
            SiblingBlankLimit::Unlimited => RawLimit::Word(UNLIMITED.to_string()),
        }
    }
}

fn default_max_blank_lines() -> BlankLimit {
    BlankLimit::Lines(1)
}
fn default_max_sibling_blank_lines() -> SiblingBlankLimit {
    SiblingBlankLimit::Lines(0)
}
fn default_highlight_seconds() -> f64 {
    0.5
}

/// Block detection thresholds, read-only for the duration of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReindentConfig {
    /// Longest blank run a block may span (default: 1)
    #[serde(default = "default_max_blank_lines")]
    pub max_blank_lines: BlankLimit,

    /// Longest blank run before an exact sibling that still joins (default: 0)
    #[serde(default = "default_max_sibling_blank_lines")]
    pub max_sibling_blank_lines: SiblingBlankLimit,

    /// How long the presenter should highlight the affected lines
    #[serde(default = "default_highlight_seconds")]
    pub highlight_seconds: f64,
}

impl Default for ReindentConfig {
    fn default() -> Self {
        Self {
            max_blank_lines: default_max_blank_lines(),
            max_sibling_blank_lines: default_max_sibling_blank_lines(),
            highlight_seconds: default_highlight_seconds(),
        }
    }
}

impl ReindentConfig {
    /// A copy with both thresholds lifted; the receiver is left as is
    #[must_use]
    pub fn unbounded(&self) -> Self {
        Self {
            max_blank_lines: BlankLimit::Unlimited,
            max_sibling_blank_lines: SiblingBlankLimit::Unlimited,
            ..*self
        }
    }

    pub fn highlight_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.highlight_seconds).unwrap_or_default()
    }
}
