use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What "mark as done" does to the matched row.
///
/// Archive = keep the row, set status to done.
/// Delete  = remove the row from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    #[default]
    Archive,
    Delete,
}

impl FromStr for CompletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "archive" => Ok(CompletionPolicy::Archive),
            "delete" => Ok(CompletionPolicy::Delete),
            other => Err(format!("unknown completion policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_policies() {
        assert_eq!("archive".parse::<CompletionPolicy>(), Ok(CompletionPolicy::Archive));
        assert_eq!(" DELETE ".parse::<CompletionPolicy>(), Ok(CompletionPolicy::Delete));
        assert!("purge".parse::<CompletionPolicy>().is_err());
    }
}
