pub mod grep_processes;
