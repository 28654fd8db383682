//! Shared utilities: Arrow column helpers, table file IO and logging

pub mod arrow;
pub mod io;
pub mod logging;

pub use io::{TableFormat, read_table, write_table};
