use crate::domain::match_spec::{ActionSet, KillMode, MatchCriterion, MatchOperator};
use crate::domain::process::ProcessField;
use crate::infrastructure::sql_literal;

pub const KILL_PROCEDURE_NAME: &str = "kill_processes";

/// Generates the statements for one grep run.
///
/// The read-only SELECT over `INFORMATION_SCHEMA.PROCESSLIST` is built once
/// at construction and reused for every target. When a kill action is
/// requested, [`ProcessMatcher::sql`] can additionally synthesize a
/// cursor-iteration procedure that issues one KILL per matching row.
#[derive(Debug, Clone)]
pub struct ProcessMatcher {
    select: String,
    actions: ActionSet,
}

impl ProcessMatcher {
    /// An empty criteria list is valid and produces a SELECT with no WHERE
    /// clause, matching every process on the server.
    pub fn new(criteria: &[MatchCriterion], actions: ActionSet, operator: MatchOperator) -> Self {
        Self {
            select: build_select(criteria, operator),
            actions,
        }
    }

    /// The read-only SELECT form. This is what gets executed against each
    /// target; the procedure form is only ever emitted as text.
    pub fn select_sql(&self) -> &str {
        &self.select
    }

    /// The statement for the requested actions: a cursor-iteration kill
    /// body when a kill mode is set (wrapped in a `CREATE PROCEDURE`
    /// declaration unless `only_body`), the bare SELECT otherwise.
    pub fn sql(&self, only_body: bool) -> String {
        match self.actions.kill {
            Some(mode) => {
                let body = build_kill_body(&self.select, mode);
                if only_body {
                    body
                } else {
                    wrap_kill_procedure(KILL_PROCEDURE_NAME, &body)
                }
            }
            None => self.select.clone(),
        }
    }
}

fn build_select(criteria: &[MatchCriterion], operator: MatchOperator) -> String {
    let columns = ProcessField::ALL.map(ProcessField::as_str).join(", ");
    let mut select = format!("SELECT\n  {columns}\nFROM\n  INFORMATION_SCHEMA.PROCESSLIST");
    if !criteria.is_empty() {
        let conditions = criteria
            .iter()
            .map(|criterion| {
                format!(
                    "    {} {} {}",
                    criterion.field.as_str(),
                    operator.as_str(),
                    sql_literal::quote(&criterion.pattern),
                )
            })
            .collect::<Vec<_>>()
            .join("\n  AND\n");
        select.push_str("\nWHERE\n");
        select.push_str(&conditions);
    }
    select
}

fn build_kill_body(select: &str, mode: KillMode) -> String {
    let verb = match mode {
        KillMode::Connection => "CONNECTION",
        KillMode::Query => "QUERY",
    };
    let indented_select = select.lines().collect::<Vec<_>>().join("\n      ");
    format!(
        "DECLARE kill_done INT;
DECLARE kill_cursor CURSOR FOR
  {indented_select}
OPEN kill_cursor;
BEGIN
   DECLARE id BIGINT;
   DECLARE EXIT HANDLER FOR NOT FOUND SET kill_done = 1;
   kill_loop: LOOP
      FETCH kill_cursor INTO id;
      KILL {verb} id;
   END LOOP kill_loop;
END;
CLOSE kill_cursor;"
    )
}

fn wrap_kill_procedure(name: &str, body: &str) -> String {
    let indented_body = body.lines().collect::<Vec<_>>().join("\n   ");
    format!("CREATE PROCEDURE {name} ()\nBEGIN\n   {indented_body}\nEND")
}
