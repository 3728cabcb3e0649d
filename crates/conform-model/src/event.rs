//! Events and cases as seen by the rule scanners.

use chrono::{Datelike, NaiveDateTime};

/// A single recorded event of a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub case_id: String,
    pub activity: String,
    /// 0-based index of the event within its case.
    pub position: usize,
    /// Wall-clock time of the event, offset-free.
    pub timestamp: Option<NaiveDateTime>,
}

impl Event {
    pub fn year(&self) -> Option<i32> {
        self.timestamp.map(|ts| ts.year())
    }
}

/// The ordered events sharing one case identifier.
///
/// A case is never empty: it only exists because at least one row carried
/// its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub events: Vec<Event>,
}

impl Case {
    /// Build a case from activity names, positions assigned in order.
    pub fn from_activities<I, S>(id: impl Into<String>, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        let events = activities
            .into_iter()
            .enumerate()
            .map(|(position, activity)| Event {
                case_id: id.clone(),
                activity: activity.into(),
                position,
                timestamp: None,
            })
            .collect();
        Self { id, events }
    }

    /// Build a case from `(activity, timestamp)` pairs.
    pub fn from_timed_activities<I, S>(id: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<NaiveDateTime>)>,
        S: Into<String>,
    {
        let id = id.into();
        let events = entries
            .into_iter()
            .enumerate()
            .map(|(position, (activity, timestamp))| Event {
                case_id: id.clone(),
                activity: activity.into(),
                position,
                timestamp,
            })
            .collect();
        Self { id, events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn activities(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.events.iter().map(|event| event.activity.as_str())
    }

    pub fn contains(&self, activity: &str) -> bool {
        self.activities().any(|name| name == activity)
    }

    /// Index of the first occurrence of `activity`.
    pub fn first_index_of(&self, activity: &str) -> Option<usize> {
        self.activities().position(|name| name == activity)
    }

    /// Index of the last occurrence of `activity`.
    pub fn last_index_of(&self, activity: &str) -> Option<usize> {
        self.activities().rposition(|name| name == activity)
    }
}
