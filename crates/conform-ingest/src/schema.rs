//! Event log schema declaration.
//!
//! The schema names the structural columns the engine reads. It is checked
//! once per run against the actual frame; everything downstream works with
//! the resolved column names and never checks the frame for presence again.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

pub const DEFAULT_CASE_ID_COLUMN: &str = "case:concept:name";
pub const DEFAULT_ACTIVITY_COLUMN: &str = "concept:name";
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "time:timestamp";

/// Column names of the event log, defaulting to the XES attribute keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLogSchema {
    pub case_id: String,
    pub activity: String,
    /// Only read when a timestamp-based rule is evaluated.
    pub timestamp: Option<String>,
}

impl Default for EventLogSchema {
    fn default() -> Self {
        Self {
            case_id: DEFAULT_CASE_ID_COLUMN.to_string(),
            activity: DEFAULT_ACTIVITY_COLUMN.to_string(),
            timestamp: Some(DEFAULT_TIMESTAMP_COLUMN.to_string()),
        }
    }
}

/// Column names as they actually appear in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub case_id: String,
    pub activity: String,
    /// Present only when timestamps were requested.
    pub timestamp: Option<String>,
}

impl EventLogSchema {
    pub fn new(case_id: impl Into<String>, activity: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            activity: activity.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, column: impl Into<String>) -> Self {
        self.timestamp = Some(column.into());
        self
    }

    /// Check the frame against the schema and resolve actual column names.
    ///
    /// # Errors
    ///
    /// Fails when the case id or activity column is absent, or when
    /// `needs_timestamps` is set and the timestamp column is unconfigured or
    /// absent.
    pub fn resolve(&self, df: &DataFrame, needs_timestamps: bool) -> Result<ResolvedSchema> {
        let lookup = ColumnLookup::from_frame(df);
        let case_id = lookup.require(&self.case_id, "case id")?;
        let activity = lookup.require(&self.activity, "activity")?;
        let timestamp = if needs_timestamps {
            let column = self
                .timestamp
                .as_deref()
                .ok_or(IngestError::TimestampColumnNotConfigured)?;
            Some(lookup.require(column, "timestamp")?)
        } else {
            None
        };
        Ok(ResolvedSchema {
            case_id,
            activity,
            timestamp,
        })
    }
}

/// Column name lookup that prefers exact matches and falls back to a
/// case-insensitive match.
#[derive(Debug, Clone, Default)]
pub struct ColumnLookup {
    exact: Vec<String>,
    /// Maps uppercase name -> original name
    folded: HashMap<String, String>,
}

impl ColumnLookup {
    pub fn from_frame(df: &DataFrame) -> Self {
        Self::from_names(df.get_column_names().iter().map(|name| name.as_str()))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lookup = Self::default();
        for name in names {
            let name = name.as_ref();
            lookup.exact.push(name.to_string());
            lookup
                .folded
                .entry(name.to_uppercase())
                .or_insert_with(|| name.to_string());
        }
        lookup
    }

    /// Get the original column name (exact match first, then case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(exact) = self.exact.iter().find(|column| column.as_str() == name) {
            return Some(exact.as_str());
        }
        self.folded.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn require(&self, name: &str, role: &'static str) -> Result<String> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| IngestError::MissingColumn {
                role,
                column: name.to_string(),
            })
    }
}
