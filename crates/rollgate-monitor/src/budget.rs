//! Update-budget resolution.
//!
//! A budget is an absolute pod count or a percentage of the desired
//! replica count, written the platform's int-or-percent way (`1` or
//! `"25%"`). Percentages round in the safer direction: up when used as
//! a surge allowance, down when used as an unavailability allowance.
//! Resolution happens once per monitor run and is never recomputed
//! mid-run, even if the desired count is observed to change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An update budget: absolute count or percentage of desired replicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Count(u32),
    Percent(u32),
}

impl Budget {
    /// Resolve as a surge allowance. Percentages round up so the
    /// ceiling is never under-permissive.
    pub fn resolve_surge(&self, desired: u32) -> u32 {
        match *self {
            Budget::Count(n) => n,
            Budget::Percent(p) => ((desired as u64 * p as u64).div_ceil(100)) as u32,
        }
    }

    /// Resolve as an unavailability allowance. Percentages round down
    /// so the ceiling is never over-permissive.
    pub fn resolve_unavailable(&self, desired: u32) -> u32 {
        match *self {
            Budget::Count(n) => n,
            Budget::Percent(p) => (desired as u64 * p as u64 / 100) as u32,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Budget::Count(n) => write!(f, "{n}"),
            Budget::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Error parsing a budget value from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid budget value: {0:?}")]
pub struct ParseBudgetError(pub String);

impl FromStr for Budget {
    type Err = ParseBudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(pct) = trimmed.strip_suffix('%') {
            pct.parse::<u32>()
                .map(Budget::Percent)
                .map_err(|_| ParseBudgetError(s.to_string()))
        } else {
            trimmed
                .parse::<u32>()
                .map(Budget::Count)
                .map_err(|_| ParseBudgetError(s.to_string()))
        }
    }
}

impl Serialize for Budget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Budget::Count(n) => serializer.serialize_u32(n),
            Budget::Percent(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for Budget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u32),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(Budget::Count(n)),
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Declared update budget for a rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPolicy {
    pub max_surge: Budget,
    pub max_unavailable: Budget,
}

impl BudgetPolicy {
    /// Resolve both limits against the desired replica count.
    pub fn resolve(&self, desired: u32) -> ResolvedBudgets {
        ResolvedBudgets {
            max_surge: self.max_surge.resolve_surge(desired),
            max_unavailable: self.max_unavailable.resolve_unavailable(desired),
        }
    }
}

/// Concrete integer ceilings for one monitor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBudgets {
    pub max_surge: u32,
    pub max_unavailable: u32,
}

impl ResolvedBudgets {
    /// True when neither limit permits any movement; no rollout can
    /// ever make progress under such a policy.
    pub fn is_zero(&self) -> bool {
        self.max_surge == 0 && self.max_unavailable == 0
    }
}
