use std::io::Write;

use anyhow::Result;

use crate::application::commands::{GrepProcessesCommand, GrepProcessesReport};
use crate::domain::error::ProcessGrepError;
use crate::domain::match_spec::KillMode;
use crate::domain::process::ProcessEntry;
use crate::infrastructure::connection_target::ConnectionTarget;
use crate::infrastructure::mysql_session::SessionFactory;
use crate::infrastructure::process_select::ProcessMatcher;
use crate::infrastructure::render;

/// Scans the process list of every requested server, kills and/or collects
/// the matching rows, and renders the accumulated report.
#[derive(Debug)]
pub struct GrepProcessesUseCase<F: SessionFactory> {
    factory: F,
}

impl<F: SessionFactory> GrepProcessesUseCase<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// The statement the command would run, for display purposes.
    pub fn sql(&self, command: &GrepProcessesCommand, only_body: bool) -> String {
        ProcessMatcher::new(&command.criteria, command.actions, command.operator).sql(only_body)
    }

    /// Kill actions are destructive and irreversible; there is no dry-run
    /// at this layer beyond running a list-only command first.
    ///
    /// Targets are processed strictly sequentially, in input order, one
    /// connection at a time. All server specifiers are validated before the
    /// first connection is opened, so a typo in a later target cannot leave
    /// the run half-applied. Any connection or statement failure aborts the
    /// whole run. Passing `None` as the output sink suppresses rendering
    /// while still returning the collected entries.
    pub async fn execute(
        &self,
        command: &GrepProcessesCommand,
        output: Option<&mut dyn Write>,
    ) -> Result<GrepProcessesReport> {
        let targets = command
            .servers
            .iter()
            .map(|specifier| ConnectionTarget::parse(specifier))
            .collect::<Result<Vec<_>, _>>()?;

        let matcher = ProcessMatcher::new(&command.criteria, command.actions, command.operator);

        let mut entries = Vec::new();
        let mut kills_issued = 0;
        for target in &targets {
            let mut session = self.factory.open(target).await?;
            let rows = session.fetch_processes(matcher.select_sql()).await?;
            for row in rows {
                match command.actions.kill {
                    Some(KillMode::Query) => {
                        session.execute_kill(&format!("KILL QUERY {}", row.id)).await?;
                        kills_issued += 1;
                    }
                    Some(KillMode::Connection) => {
                        session.execute_kill(&format!("KILL {}", row.id)).await?;
                        kills_issued += 1;
                    }
                    None => {}
                }
                if command.actions.list {
                    entries.push(ProcessEntry {
                        connection: target.label(),
                        row,
                    });
                }
            }
        }

        if !entries.is_empty() {
            if let Some(sink) = output {
                render::render_report(sink, command.format, &entries)?;
            }
        } else if command.actions.list {
            return Err(ProcessGrepError::EmptyResult.into());
        }

        Ok(GrepProcessesReport {
            entries,
            kills_issued,
        })
    }
}
