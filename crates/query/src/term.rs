//! Structured filter conditions produced by the filter parser.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Field that holds the category outline of an indexed document.
pub const OUTLINE_FIELD: &str = "__outline";

/// A single filter condition. Clauses in a list are ANDed together.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TermClause {
    pub field: String,
    pub condition: Condition,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Condition {
    /// Field equals any of the values
    AnyOf(Vec<String>),
    Range(RangeCondition),
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeCondition {
    pub lower: Option<RangeBound>,
    pub upper: Option<RangeBound>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeBound {
    pub value: String,
    pub inclusive: bool,
}

impl TermClause {
    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            condition: Condition::AnyOf(values.into_iter().map(Into::into).collect()),
            negated: false,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::any_of(field, [value.into()])
    }

    pub fn range(field: impl Into<String>, range: RangeCondition) -> Self {
        Self {
            field: field.into(),
            condition: Condition::Range(range),
            negated: false,
        }
    }

    /// Restricts results to documents under the given catalog (or category) outline.
    pub fn outline(catalog: impl Into<String>) -> Self {
        Self::equals(OUTLINE_FIELD, catalog)
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl RangeBound {
    pub fn inclusive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inclusive: false,
        }
    }
}

impl RangeCondition {
    pub fn at_least(min: impl Into<String>) -> Self {
        Self {
            lower: Some(RangeBound::inclusive(min)),
            upper: None,
        }
    }

    pub fn at_most(max: impl Into<String>) -> Self {
        Self {
            lower: None,
            upper: Some(RangeBound::inclusive(max)),
        }
    }

    pub fn between(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            lower: Some(RangeBound::inclusive(min)),
            upper: Some(RangeBound::inclusive(max)),
        }
    }
}

impl fmt::Display for TermClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "NOT ")?;
        }
        match &self.condition {
            Condition::AnyOf(values) => write!(f, "{}:{}", self.field, values.join(",")),
            Condition::Range(range) => {
                let (open, lower) = match &range.lower {
                    Some(b) => (if b.inclusive { '[' } else { '(' }, b.value.as_str()),
                    None => ('(', ""),
                };
                let (close, upper) = match &range.upper {
                    Some(b) => (if b.inclusive { ']' } else { ')' }, b.value.as_str()),
                    None => (')', ""),
                };
                write!(f, "{}:{}{} TO {}{}", self.field, open, lower, upper, close)
            }
        }
    }
}
