pub mod error;
pub mod match_spec;
pub mod output_format;
pub mod process;
