//! Declarative behavioral rules.
//!
//! A [`Rule`] is pure configuration. It doubles as the structured key under
//! which outcomes and labels are stored; human-readable names (column names,
//! summary text) are rendered from it only at the reporting boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Rule families supported by the scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Cardinality,
    Order,
    Response,
    Precedence,
    Exclusive,
    TimeElapse,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Cardinality,
        RuleKind::Order,
        RuleKind::Response,
        RuleKind::Precedence,
        RuleKind::Exclusive,
        RuleKind::TimeElapse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Cardinality => "cardinality",
            RuleKind::Order => "order",
            RuleKind::Response => "response",
            RuleKind::Precedence => "precedence",
            RuleKind::Exclusive => "exclusive",
            RuleKind::TimeElapse => "time_elapse",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleKind::Cardinality => "activity occurs between `lower` and `upper` times",
            RuleKind::Order => "`second` never occurs before any `first`",
            RuleKind::Response => "every `request` is eventually followed by a `response`",
            RuleKind::Precedence => "every `request` is preceded by a `preceding`",
            RuleKind::Exclusive => "`a` and `b` never occur in the same case",
            RuleKind::TimeElapse => "the case ends with `end_activity` in its starting year",
        }
    }

    /// Whether evaluating this rule needs event timestamps.
    pub fn requires_timestamps(self) -> bool {
        matches!(self, RuleKind::TimeElapse)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    Cardinality {
        activity: String,
        #[serde(default)]
        lower: usize,
        /// `None` means unbounded.
        #[serde(default)]
        upper: Option<usize>,
    },
    Order {
        first: String,
        second: String,
    },
    Response {
        request: String,
        response: String,
        #[serde(default)]
        single_occurrence: bool,
    },
    Precedence {
        preceding: String,
        request: String,
        #[serde(default)]
        single_occurrence: bool,
    },
    Exclusive {
        a: String,
        b: String,
    },
    TimeElapse {
        end_activity: String,
    },
}

impl Rule {
    pub fn cardinality(activity: impl Into<String>, lower: usize, upper: Option<usize>) -> Self {
        Rule::Cardinality {
            activity: activity.into(),
            lower,
            upper,
        }
    }

    pub fn order(first: impl Into<String>, second: impl Into<String>) -> Self {
        Rule::Order {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn response(
        request: impl Into<String>,
        response: impl Into<String>,
        single_occurrence: bool,
    ) -> Self {
        Rule::Response {
            request: request.into(),
            response: response.into(),
            single_occurrence,
        }
    }

    pub fn precedence(
        preceding: impl Into<String>,
        request: impl Into<String>,
        single_occurrence: bool,
    ) -> Self {
        Rule::Precedence {
            preceding: preceding.into(),
            request: request.into(),
            single_occurrence,
        }
    }

    pub fn exclusive(a: impl Into<String>, b: impl Into<String>) -> Self {
        Rule::Exclusive {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn time_elapse(end_activity: impl Into<String>) -> Self {
        Rule::TimeElapse {
            end_activity: end_activity.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Cardinality { .. } => RuleKind::Cardinality,
            Rule::Order { .. } => RuleKind::Order,
            Rule::Response { .. } => RuleKind::Response,
            Rule::Precedence { .. } => RuleKind::Precedence,
            Rule::Exclusive { .. } => RuleKind::Exclusive,
            Rule::TimeElapse { .. } => RuleKind::TimeElapse,
        }
    }

    /// Activities named by the rule, in declaration order.
    pub fn activities(&self) -> Vec<&str> {
        match self {
            Rule::Cardinality { activity, .. } => vec![activity.as_str()],
            Rule::Order { first, second } => vec![first.as_str(), second.as_str()],
            Rule::Response {
                request, response, ..
            } => vec![request.as_str(), response.as_str()],
            Rule::Precedence {
                preceding, request, ..
            } => vec![preceding.as_str(), request.as_str()],
            Rule::Exclusive { a, b } => vec![a.as_str(), b.as_str()],
            Rule::TimeElapse { end_activity } => vec![end_activity.as_str()],
        }
    }

    /// Reject parameter combinations no trace could ever satisfy or violate
    /// meaningfully.
    ///
    /// Activities that never occur in the log are not an error; absence is a
    /// valid conformance outcome.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind().as_str();
        if self.activities().iter().any(|name| name.trim().is_empty()) {
            return Err(ModelError::EmptyActivity { kind });
        }
        if let Rule::Cardinality {
            lower,
            upper: Some(upper),
            ..
        } = self
            && lower > upper
        {
            return Err(ModelError::InvalidRule {
                kind,
                reason: format!("lower bound {lower} exceeds upper bound {upper}"),
            });
        }
        Ok(())
    }

    /// Stem shared by the flag and position column names.
    pub fn column_stem(&self) -> String {
        let mut parts = vec![self.kind().as_str().to_string()];
        match self {
            Rule::Cardinality {
                activity,
                lower,
                upper,
            } => {
                parts.push(activity.clone());
                parts.push(upper.map_or_else(|| "inf".to_string(), |value| value.to_string()));
                parts.push(lower.to_string());
            }
            Rule::Response {
                single_occurrence: true,
                ..
            }
            | Rule::Precedence {
                single_occurrence: true,
                ..
            } => {
                parts.extend(self.activities().into_iter().map(str::to_string));
                parts.push("single".to_string());
            }
            _ => parts.extend(self.activities().into_iter().map(str::to_string)),
        }
        parts.join("_")
    }

    /// Name of the per-case binary violation flag column.
    pub fn flag_column(&self) -> String {
        self.column_stem()
    }

    /// Name of the per-case first-violation position column.
    pub fn position_column(&self) -> String {
        format!("Pos_{}", self.column_stem())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Cardinality {
                activity,
                lower,
                upper,
            } => match upper {
                Some(upper) => write!(f, "cardinality rule of '{activity}' in [{lower}, {upper}]"),
                None => write!(f, "cardinality rule of '{activity}' of at least {lower}"),
            },
            Rule::Order { first, second } => {
                write!(f, "order rule of first '{first}' followed by '{second}'")
            }
            Rule::Response {
                request,
                response,
                single_occurrence,
            } => {
                write!(f, "response rule of '{request}' requiring '{response}'")?;
                if *single_occurrence {
                    f.write_str(" (single occurrence)")?;
                }
                Ok(())
            }
            Rule::Precedence {
                preceding,
                request,
                single_occurrence,
            } => {
                write!(f, "precedence rule of '{request}' requiring '{preceding}'")?;
                if *single_occurrence {
                    f.write_str(" (single occurrence)")?;
                }
                Ok(())
            }
            Rule::Exclusive { a, b } => write!(f, "exclusiveness rule of '{a}' and '{b}'"),
            Rule::TimeElapse { end_activity } => {
                write!(f, "time elapse rule ending with '{end_activity}'")
            }
        }
    }
}
