//! Raw answers as held by the answer store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Timestamp, TriState};

/// The value stored for a single question code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AnswerValue {
    /// A Yes / No / Unknown answer.
    Tri(TriState),
    /// A free-text choice, e.g. a harm severity label.
    Choice(String),
}

impl AnswerValue {
    /// Reads the value as a tri-state; choices read as Unknown.
    pub fn as_tri(&self) -> TriState {
        match self {
            AnswerValue::Tri(t) => *t,
            AnswerValue::Choice(_) => TriState::Unknown,
        }
    }

    /// Reads the value as a choice label.
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(s) => Some(s.as_str()),
            AnswerValue::Tri(_) => None,
        }
    }

    /// Returns true if the value carries an actual answer.
    pub fn is_answered(&self) -> bool {
        match self {
            AnswerValue::Tri(t) => t.is_known(),
            AnswerValue::Choice(s) => !s.trim().is_empty(),
        }
    }
}

impl From<TriState> for AnswerValue {
    fn from(value: TriState) -> Self {
        AnswerValue::Tri(value)
    }
}

/// One persisted answer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub code: String,
    pub value: AnswerValue,
    pub answered_at: Timestamp,
}

/// A `(code, value)` pair submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub code: String,
    pub value: AnswerValue,
}

impl AnswerEntry {
    pub fn new(code: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }

    /// Convenience constructor for a free-text choice.
    pub fn choice(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: AnswerValue::Choice(label.into()),
        }
    }
}

/// Read-only view over a module's raw answers, keyed by code.
///
/// Built from store rows; when the same code appears more than once the
/// row that comes last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from store rows.
    pub fn from_stored(rows: impl IntoIterator<Item = StoredAnswer>) -> Self {
        let mut set = Self::new();
        for row in rows {
            set.values.insert(row.code, row.value);
        }
        set
    }

    /// Builds a set from caller entries.
    pub fn from_entries(entries: impl IntoIterator<Item = AnswerEntry>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            set.values.insert(entry.code, entry.value);
        }
        set
    }

    /// Sets a single value.
    pub fn insert(&mut self, code: impl Into<String>, value: impl Into<AnswerValue>) {
        self.values.insert(code.into(), value.into());
    }

    /// Tri-state answer for a code; missing codes are Unknown.
    pub fn tri(&self, code: &str) -> TriState {
        self.values
            .get(code)
            .map(AnswerValue::as_tri)
            .unwrap_or(TriState::Unknown)
    }

    /// Choice answer for a code, ignoring blank text.
    pub fn choice(&self, code: &str) -> Option<&str> {
        self.values
            .get(code)
            .and_then(AnswerValue::as_choice)
            .filter(|s| !s.trim().is_empty())
    }

    /// Applies entries whose code passes `accepts`, returning the codes
    /// that were ignored. Later entries for the same code win.
    pub fn apply_entries<F>(&mut self, entries: &[AnswerEntry], accepts: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut ignored = Vec::new();
        for entry in entries {
            if accepts(&entry.code) {
                self.values.insert(entry.code.clone(), entry.value.clone());
            } else {
                ignored.push(entry.code.clone());
            }
        }
        ignored
    }

    pub fn get(&self, code: &str) -> Option<&AnswerValue> {
        self.values.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| !v.is_answered())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
