use crate::domain::process::ProcessField;

/// A single `field OPERATOR pattern` condition. Criteria are ANDed together
/// in input order when the SELECT is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriterion {
    pub field: ProcessField,
    pub pattern: String,
}

impl MatchCriterion {
    pub fn new(field: ProcessField, pattern: impl Into<String>) -> Self {
        Self {
            field,
            pattern: pattern.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOperator {
    Like,
    Regexp,
}

impl MatchOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchOperator::Like => "LIKE",
            MatchOperator::Regexp => "REGEXP",
        }
    }
}

/// What to kill for a matching process: only its running statement, or the
/// whole client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillMode {
    Query,
    Connection,
}

/// The actions requested for matching processes. A single tagged kill mode
/// keeps "kill query" and "kill connection" mutually exclusive in the core;
/// the flag-level precedence lives in [`ActionSet::from_flags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSet {
    pub kill: Option<KillMode>,
    pub list: bool,
}

impl ActionSet {
    pub fn list_only() -> Self {
        Self {
            kill: None,
            list: true,
        }
    }

    /// Resolve command-line flags into an action set. When both kill flags
    /// are requested, the connection kill wins. Listing is implied when no
    /// action flag is given at all.
    pub fn from_flags(kill_query: bool, kill_connection: bool, list: bool) -> Self {
        let kill = if kill_connection {
            Some(KillMode::Connection)
        } else if kill_query {
            Some(KillMode::Query)
        } else {
            None
        };
        Self {
            kill,
            list: list || kill.is_none(),
        }
    }

    pub fn wants_kill(&self) -> bool {
        self.kill.is_some()
    }
}
