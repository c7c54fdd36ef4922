use std::env;

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::application::commands::{GrepProcessesCommand, SqlDisplay};
use crate::domain::match_spec::{ActionSet, KillMode, MatchCriterion, MatchOperator};
use crate::domain::output_format::OutputFormat;
use crate::domain::process::ProcessField;

#[derive(Debug, Parser)]
#[command(
    name = "mysql-procgrep",
    version,
    about = "Search the process list of one or more MySQL servers and print or kill the matches"
)]
struct CliArgs {
    #[arg(long, value_name = "PATTERN", help = "Match the process Id")]
    match_id: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the user that owns the process")]
    match_user: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the client host")]
    match_host: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the default database")]
    match_db: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the command in progress")]
    match_command: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the seconds spent in the current state")]
    match_time: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the process state")]
    match_state: Option<String>,
    #[arg(long, value_name = "PATTERN", help = "Match the statement being executed")]
    match_info: Option<String>,
    #[arg(long, short = 'G', help = "Match patterns with REGEXP instead of LIKE")]
    regexp: bool,
    #[arg(long, help = "Kill the running statement of every matching process")]
    kill_query: bool,
    #[arg(long, help = "Kill the whole connection of every matching process")]
    kill_connection: bool,
    #[arg(
        long,
        help = "Print every matching process (implied when no kill action is selected)"
    )]
    print: bool,
    #[arg(
        long,
        short = 'S',
        value_name = "user[:password]@host[:port][:socket]",
        help = "Server to scan; repeat for multiple servers"
    )]
    server: Vec<String>,
    #[arg(long, short = 'f', value_enum, default_value_t = CliFormat::Grid)]
    format: CliFormat,
    #[arg(long, help = "Print the generated statement instead of executing it")]
    sql: bool,
    #[arg(
        long,
        help = "Print only the statement body, without the CREATE PROCEDURE wrapper"
    )]
    sql_body: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Grid,
    Csv,
    Tab,
    Vertical,
}

impl From<CliFormat> for OutputFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Grid => OutputFormat::Grid,
            CliFormat::Csv => OutputFormat::Csv,
            CliFormat::Tab => OutputFormat::Tab,
            CliFormat::Vertical => OutputFormat::Vertical,
        }
    }
}

pub fn collect_grep_command() -> Result<GrepProcessesCommand> {
    if env::args_os().len() == 1 {
        return collect_interactive_command();
    }
    collect_command_from_args(CliArgs::parse())
}

fn collect_command_from_args(args: CliArgs) -> Result<GrepProcessesCommand> {
    let criteria = collect_criteria(&args);
    let actions = ActionSet::from_flags(args.kill_query, args.kill_connection, args.print);
    let operator = if args.regexp {
        MatchOperator::Regexp
    } else {
        MatchOperator::Like
    };
    let sql_display = if args.sql_body {
        Some(SqlDisplay::BodyOnly)
    } else if args.sql {
        Some(SqlDisplay::Statement)
    } else {
        None
    };

    if sql_display.is_none() && args.server.is_empty() {
        return Err(anyhow!(
            "At least one --server is required when executing (use --sql to only print the statement)"
        ));
    }

    Ok(GrepProcessesCommand {
        criteria,
        operator,
        actions,
        servers: args.server,
        format: args.format.into(),
        sql_display,
    })
}

fn collect_criteria(args: &CliArgs) -> Vec<MatchCriterion> {
    let patterns = [
        (ProcessField::Id, &args.match_id),
        (ProcessField::User, &args.match_user),
        (ProcessField::Host, &args.match_host),
        (ProcessField::Db, &args.match_db),
        (ProcessField::Command, &args.match_command),
        (ProcessField::Time, &args.match_time),
        (ProcessField::State, &args.match_state),
        (ProcessField::Info, &args.match_info),
    ];
    patterns
        .into_iter()
        .filter_map(|(field, pattern)| {
            pattern
                .as_ref()
                .map(|pattern| MatchCriterion::new(field, pattern.clone()))
        })
        .collect()
}

fn collect_interactive_command() -> Result<GrepProcessesCommand> {
    let theme = ColorfulTheme::default();

    println!();
    println!(
        "{}",
        style(" MYSQL PROCESS GREP ")
            .black()
            .on_cyan()
            .bold()
            .underlined()
    );
    println!(
        "{}",
        style("Match server processes by field patterns, then print or kill them").dim()
    );
    println!();

    let field_items = ProcessField::ALL.map(ProcessField::as_str);
    let mut criteria = Vec::new();
    loop {
        let prompt = if criteria.is_empty() {
            "Add a match criterion? (no criteria matches every process)"
        } else {
            "Add another match criterion?"
        };
        let add = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(criteria.is_empty())
            .interact()?;
        if !add {
            break;
        }

        let field_index = Select::with_theme(&theme)
            .with_prompt("Field")
            .default(0)
            .items(&field_items)
            .interact()?;
        let pattern: String = Input::with_theme(&theme)
            .with_prompt("Pattern")
            .validate_with(|value: &String| {
                if value.trim().is_empty() {
                    Err("Pattern must not be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        criteria.push(MatchCriterion::new(ProcessField::ALL[field_index], pattern));
    }

    let operator_items = ["LIKE", "REGEXP"];
    let operator_index = Select::with_theme(&theme)
        .with_prompt("Match operator")
        .default(0)
        .items(&operator_items)
        .interact()?;
    let operator = if operator_index == 1 {
        MatchOperator::Regexp
    } else {
        MatchOperator::Like
    };

    let action_items = [
        "Print matching processes",
        "Kill the query of every match",
        "Kill the connection of every match",
    ];
    let action_index = Select::with_theme(&theme)
        .with_prompt("Action")
        .default(0)
        .items(&action_items)
        .interact()?;
    let actions = match action_index {
        1 => ActionSet {
            kill: Some(KillMode::Query),
            list: false,
        },
        2 => ActionSet {
            kill: Some(KillMode::Connection),
            list: false,
        },
        _ => ActionSet::list_only(),
    };

    if actions.wants_kill() {
        let confirmed = Confirm::with_theme(&theme)
            .with_prompt("Matching processes will be killed immediately and irreversibly. Continue?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(anyhow!("Kill action cancelled"));
        }
    }

    let servers_input: String = Input::with_theme(&theme)
        .with_prompt("Servers (user[:password]@host[:port][:socket], comma separated)")
        .validate_with(|value: &String| {
            if value.trim().is_empty() {
                Err("At least one server is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    let servers = servers_input
        .split(',')
        .map(str::trim)
        .filter(|specifier| !specifier.is_empty())
        .map(String::from)
        .collect::<Vec<_>>();

    let format_items = OutputFormat::ALL.map(OutputFormat::as_str);
    let format_index = Select::with_theme(&theme)
        .with_prompt("Output format")
        .default(0)
        .items(&format_items)
        .interact()?;

    Ok(GrepProcessesCommand {
        criteria,
        operator,
        actions,
        servers,
        format: OutputFormat::ALL[format_index],
        sql_display: None,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::application::commands::SqlDisplay;
    use crate::domain::match_spec::{KillMode, MatchOperator};
    use crate::domain::output_format::OutputFormat;
    use crate::domain::process::ProcessField;

    use super::{CliArgs, collect_command_from_args};

    #[test]
    fn criteria_follow_the_fixed_field_order() {
        let args = CliArgs::try_parse_from([
            "mysql-procgrep",
            "--match-info",
            "%SLEEP%",
            "--match-user",
            "app_%",
            "--server",
            "root@localhost",
        ])
        .expect("cli args should parse");

        let command = collect_command_from_args(args).expect("command should be created");
        let fields = command
            .criteria
            .iter()
            .map(|criterion| criterion.field)
            .collect::<Vec<_>>();
        assert_eq!(fields, vec![ProcessField::User, ProcessField::Info]);
        assert_eq!(command.criteria[0].pattern, "app_%");
        assert_eq!(command.operator, MatchOperator::Like);
    }

    #[test]
    fn listing_is_implied_without_action_flags() {
        let args = CliArgs::try_parse_from([
            "mysql-procgrep",
            "--match-user",
            "root",
            "--server",
            "root@localhost",
        ])
        .expect("cli args should parse");

        let command = collect_command_from_args(args).expect("command should be created");
        assert!(command.actions.list);
        assert_eq!(command.actions.kill, None);
        assert_eq!(command.format, OutputFormat::Grid);
    }

    #[test]
    fn connection_kill_wins_over_query_kill() {
        let args = CliArgs::try_parse_from([
            "mysql-procgrep",
            "--kill-query",
            "--kill-connection",
            "--server",
            "root@localhost",
        ])
        .expect("cli args should parse");

        let command = collect_command_from_args(args).expect("command should be created");
        assert_eq!(command.actions.kill, Some(KillMode::Connection));
        assert!(!command.actions.list);
    }

    #[test]
    fn regexp_flag_switches_the_operator() {
        let args = CliArgs::try_parse_from([
            "mysql-procgrep",
            "--regexp",
            "--match-info",
            "^SELECT",
            "--server",
            "root@localhost",
        ])
        .expect("cli args should parse");

        let command = collect_command_from_args(args).expect("command should be created");
        assert_eq!(command.operator, MatchOperator::Regexp);
    }

    #[test]
    fn execution_without_servers_is_rejected() {
        let args = CliArgs::try_parse_from(["mysql-procgrep", "--match-user", "root"])
            .expect("cli args should parse");

        let error = collect_command_from_args(args).expect_err("missing servers should fail");
        assert!(error.to_string().contains("At least one --server is required"));
    }

    #[test]
    fn sql_display_does_not_require_servers() {
        let args = CliArgs::try_parse_from(["mysql-procgrep", "--match-user", "root", "--sql"])
            .expect("cli args should parse");
        let command = collect_command_from_args(args).expect("command should be created");
        assert_eq!(command.sql_display, Some(SqlDisplay::Statement));

        let args =
            CliArgs::try_parse_from(["mysql-procgrep", "--kill-query", "--sql-body"])
                .expect("cli args should parse");
        let command = collect_command_from_args(args).expect("command should be created");
        assert_eq!(command.sql_display, Some(SqlDisplay::BodyOnly));
    }

    #[test]
    fn servers_and_format_are_carried_through() {
        let args = CliArgs::try_parse_from([
            "mysql-procgrep",
            "--server",
            "root@db1",
            "--server",
            "root:secret@db2:3307",
            "--format",
            "vertical",
        ])
        .expect("cli args should parse");

        let command = collect_command_from_args(args).expect("command should be created");
        assert_eq!(command.servers, vec!["root@db1", "root:secret@db2:3307"]);
        assert_eq!(command.format, OutputFormat::Vertical);
    }
}
