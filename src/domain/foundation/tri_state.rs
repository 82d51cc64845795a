//! Three-valued answer logic.
//!
//! Every question in an assessment is answered Yes, No, or not yet
//! (Unknown). The combinators here are the only places where tri-state
//! values are merged, so Unknown propagation is defined once.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// A Yes / No / Unknown answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    /// Returns true for Yes or No.
    pub fn is_known(&self) -> bool {
        !matches!(self, TriState::Unknown)
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, TriState::Yes)
    }

    pub fn is_no(&self) -> bool {
        matches!(self, TriState::No)
    }

    /// Logical negation; Unknown stays Unknown.
    pub fn negate(&self) -> TriState {
        match self {
            TriState::Yes => TriState::No,
            TriState::No => TriState::Yes,
            TriState::Unknown => TriState::Unknown,
        }
    }

    /// Returns `self` when known, otherwise `fallback`.
    pub fn or(self, fallback: TriState) -> TriState {
        if self.is_known() {
            self
        } else {
            fallback
        }
    }

    /// Converts a definite boolean.
    pub fn from_bool(value: bool) -> TriState {
        if value {
            TriState::Yes
        } else {
            TriState::No
        }
    }

    /// Returns the definite value, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TriState::Yes => Some(true),
            TriState::No => Some(false),
            TriState::Unknown => None,
        }
    }

    /// Family aggregate: Yes if any member is Yes, No only if every
    /// member is No, Unknown otherwise. An empty family is Unknown.
    pub fn any_of<I>(members: I) -> TriState
    where
        I: IntoIterator<Item = TriState>,
    {
        let mut saw_member = false;
        let mut all_no = true;
        for member in members {
            saw_member = true;
            match member {
                TriState::Yes => return TriState::Yes,
                TriState::No => {}
                TriState::Unknown => all_no = false,
            }
        }
        if saw_member && all_no {
            TriState::No
        } else {
            TriState::Unknown
        }
    }

    /// OR with a definite No over exactly two sources.
    pub fn either(a: TriState, b: TriState) -> TriState {
        match (a, b) {
            (TriState::Yes, _) | (_, TriState::Yes) => TriState::Yes,
            (TriState::No, TriState::No) => TriState::No,
            _ => TriState::Unknown,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(v) => TriState::from_bool(v),
            None => TriState::Unknown,
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriState::Yes => "yes",
            TriState::No => "no",
            TriState::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TriState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(TriState::Yes),
            "no" | "n" | "false" => Ok(TriState::No),
            "unknown" | "" => Ok(TriState::Unknown),
            other => Err(ValidationError::invalid_format(
                "answer",
                format!("'{}' is not yes, no or unknown", other),
            )),
        }
    }
}
