pub mod connection_target;
pub mod mysql_session;
pub mod process_select;
pub mod render;
pub mod sql_literal;
