//! Log lines shared by the table readers and writers

use std::path::Path;
use std::time::Duration;

/// Announce that `path` is about to be processed, e.g. `"Reading table"`
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Report a finished file operation
///
/// `operation` is a past-tense verb and `preposition` ties it to the path,
/// e.g. `"Read"`/`"from"` gives `Read 120 rows from catalog.csv in 4ms`.
pub fn log_operation_complete(
    operation: &str,
    preposition: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<Duration>,
) {
    log::info!("{}", completion_message(operation, preposition, path, rows, elapsed));
}

fn completion_message(
    operation: &str,
    preposition: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<Duration>,
) -> String {
    let line = format!("{operation} {rows} rows {preposition} {}", path.display());
    match elapsed {
        Some(duration) => format!("{line} in {duration:?}"),
        None => line,
    }
}

pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
