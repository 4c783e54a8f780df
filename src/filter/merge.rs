use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[default]
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
}

impl LogicalOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "&" => Some(LogicalOperator::And),
            "|" => Some(LogicalOperator::Or),
            _ => None,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("&"),
            LogicalOperator::Or => f.write_str("|"),
        }
    }
}

/// AND together filter fragments from independent sources, e.g. a fixed
/// status clause and the user's search filter.
pub fn merge_filter_values<I, S>(fragments: I) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    merge_filter_values_with(fragments, LogicalOperator::And)
}

/// Wrap each non-empty fragment in parentheses and join them with
/// `operator`. `None` when nothing is left.
pub fn merge_filter_values_with<I, S>(fragments: I, operator: LogicalOperator) -> Option<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let parts: Vec<String> = fragments
        .into_iter()
        .flatten()
        .filter(|f| !f.as_ref().trim().is_empty())
        .map(|f| format!("({})", f.as_ref()))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&format!(" {} ", operator)))
    }
}
