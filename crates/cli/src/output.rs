//! Writing command results.

use std::io::{self, Write};

use serde::Serialize;

use vitrina_storefront::AppError;

/// Write `value` to stdout as pretty JSON.
pub fn emit<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out).map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write the user-facing message of `err` to stderr.
pub fn error(err: &AppError) {
    let mut out = io::stderr().lock();
    // Nothing left to report to if stderr is gone
    let _ = writeln!(out, "error: {}", err.user_message());
}
