mod application;
mod domain;
mod infrastructure;
mod interfaces;

use std::io::{self, Write};

use anyhow::Result;
use console::style;

use crate::application::commands::SqlDisplay;
use crate::application::use_cases::grep_processes::GrepProcessesUseCase;
use crate::infrastructure::mysql_session::MySqlSessionFactory;
use crate::interfaces::cli::collect_grep_command;

#[tokio::main]
async fn main() -> Result<()> {
    let command = collect_grep_command()?;
    let use_case = GrepProcessesUseCase::new(MySqlSessionFactory);

    if let Some(display) = command.sql_display {
        println!("{}", use_case.sql(&command, display == SqlDisplay::BodyOnly));
        return Ok(());
    }

    println!("{}", style("Scanning server process lists...").cyan());
    let mut stdout = io::stdout();
    let report = use_case
        .execute(&command, Some(&mut stdout as &mut dyn Write))
        .await?;

    println!(
        "{} {} ({} listed, {} killed)",
        style("Scanned").green(),
        style(format!("{} server(s)", command.servers.len())).bold(),
        report.entries.len(),
        report.kills_issued,
    );
    Ok(())
}
