use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of agent turns the simulation service runs before ending the
/// conversation. The service accepts 1 through 5; the UI only offers that set,
/// and the constructor rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IterationCount(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("iteration count must be between {} and {}", IterationCount::MIN, IterationCount::MAX)]
pub struct InvalidIterationCount;

impl IterationCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(count: u8) -> Result<Self, InvalidIterationCount> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(InvalidIterationCount)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The full valid set, in order. The UI builds its selector from this so
    /// an out-of-range count cannot be entered in the first place.
    pub fn choices() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl Default for IterationCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for IterationCount {
    type Error = InvalidIterationCount;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<IterationCount> for u8 {
    fn from(count: IterationCount) -> Self {
        count.0
    }
}

impl fmt::Display for IterationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything the simulation service needs for one run. Built from UI state at
/// submit time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub product_description: String,
    pub iterations: IterationCount,
}

/// The narrative returned by the simulation service: a formatted markup
/// fragment, held verbatim. Rendering interprets it; nothing here escapes or
/// rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationNarrative {
    pub markup: String,
}
