//! Batch input and output formats used by the command-line front end.

pub mod csv;
pub mod response_writer;
