//! The spreadsheet action vocabulary
//!
//! These are the only actions the classifier may emit. Anything else coming
//! back from the model is treated as "not an actionable command".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spreadsheet operations understood by the front end
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Not a spreadsheet command
    None,
    Sum,
    Average,
    Sort,
    Filter,
    Select,
    /// Write a value into a cell or range
    Write,
    Scroll,
    Undo,
    Redo,
    /// Clear a cell, range or column
    Delete,
    /// Merge a range into a single cell
    Merge,
    Zoom,
    Copy,
    Paste,
    Autofill,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::None,
        Action::Sum,
        Action::Average,
        Action::Sort,
        Action::Filter,
        Action::Select,
        Action::Write,
        Action::Scroll,
        Action::Undo,
        Action::Redo,
        Action::Delete,
        Action::Merge,
        Action::Zoom,
        Action::Copy,
        Action::Paste,
        Action::Autofill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Sum => "sum",
            Action::Average => "average",
            Action::Sort => "sort",
            Action::Filter => "filter",
            Action::Select => "select",
            Action::Write => "write",
            Action::Scroll => "scroll",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::Delete => "delete",
            Action::Merge => "merge",
            Action::Zoom => "zoom",
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::Autofill => "autofill",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == name)
            .ok_or(UnknownAction(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("SUM".parse::<Action>(), Ok(Action::Sum));
        assert_eq!(" Delete ".parse::<Action>(), Ok(Action::Delete));
        assert_eq!("autofill".parse::<Action>(), Ok(Action::Autofill));
    }

    #[test]
    fn test_unknown_action() {
        let err = "teleport".parse::<Action>().unwrap_err();
        assert_eq!(err, UnknownAction("teleport".into()));
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn test_vocabulary_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action));
        }
    }
}
