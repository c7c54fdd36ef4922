use crate::domain::match_spec::{ActionSet, MatchCriterion, MatchOperator};
use crate::domain::output_format::OutputFormat;
use crate::domain::process::ProcessEntry;

/// Print the generated statement instead of executing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDisplay {
    Statement,
    BodyOnly,
}

#[derive(Debug)]
pub struct GrepProcessesCommand {
    pub criteria: Vec<MatchCriterion>,
    pub operator: MatchOperator,
    pub actions: ActionSet,
    pub servers: Vec<String>,
    pub format: OutputFormat,
    pub sql_display: Option<SqlDisplay>,
}

#[derive(Debug)]
pub struct GrepProcessesReport {
    /// Listed processes in insertion order across all targets. Empty when
    /// listing was not requested.
    pub entries: Vec<ProcessEntry>,
    pub kills_issued: usize,
}
