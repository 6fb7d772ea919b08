//! The fixed set of remote actions.
//!
//! Every request targets exactly one of these; the action name becomes the
//! first path segment after the API base.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// A whitelisted remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Projects,
    Contexts,
    NewProject,
    Actions,
    NewAction,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Projects,
        Action::Contexts,
        Action::NewProject,
        Action::Actions,
        Action::NewAction,
    ];

    /// The URL path segment for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Projects => "projects",
            Action::Contexts => "contexts",
            Action::NewProject => "newproject",
            Action::Actions => "actions",
            Action::NewAction => "newaction",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ApiError::UnsupportedAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_parses_from_its_segment() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_and_miscased_names_are_rejected() {
        for name in ["tasks", "Projects", "", "projects/"] {
            let err = name.parse::<Action>().unwrap_err();
            assert!(matches!(err, ApiError::UnsupportedAction(ref s) if s == name));
        }
    }
}
