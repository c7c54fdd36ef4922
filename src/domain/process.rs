use std::fmt::{self, Display};

/// The columns of `INFORMATION_SCHEMA.PROCESSLIST` that can be matched
/// against and that appear in every report row. `ALL` fixes the column
/// order used both in the generated SELECT and in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessField {
    Id,
    User,
    Host,
    Db,
    Command,
    Time,
    State,
    Info,
}

impl ProcessField {
    pub const ALL: [ProcessField; 8] = [
        ProcessField::Id,
        ProcessField::User,
        ProcessField::Host,
        ProcessField::Db,
        ProcessField::Command,
        ProcessField::Time,
        ProcessField::State,
        ProcessField::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessField::Id => "Id",
            ProcessField::User => "User",
            ProcessField::Host => "Host",
            ProcessField::Db => "Db",
            ProcessField::Command => "Command",
            ProcessField::Time => "Time",
            ProcessField::State => "State",
            ProcessField::Info => "Info",
        }
    }
}

impl Display for ProcessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the server process list. `id` is the identifier accepted by
/// `KILL`; `db`, `state` and `info` are nullable on the server side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRow {
    pub id: u64,
    pub user: String,
    pub host: String,
    pub db: Option<String>,
    pub command: String,
    pub time: i64,
    pub state: Option<String>,
    pub info: Option<String>,
}

impl ProcessRow {
    /// Cell values in `ProcessField::ALL` order, with NULL columns rendered
    /// the way the mysql client prints them.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.user.clone(),
            self.host.clone(),
            null_cell(&self.db),
            self.command.clone(),
            self.time.to_string(),
            null_cell(&self.state),
            null_cell(&self.info),
        ]
    }
}

fn null_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "NULL".to_string())
}

/// A process row tagged with the label of the server it was read from.
/// Accumulated in insertion order across all scanned targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub connection: String,
    pub row: ProcessRow,
}
