//! JSON output on stdout.

use std::io::Write;

use courtside_core::AvailabilityResult;
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Writes `value` as one JSON document followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, value, pretty)
}

/// Prints a result and turns a reported failure into an error exit.
pub fn print_result(result: &AvailabilityResult, pretty: bool) -> CliResult<()> {
    print_json(result, pretty)?;
    if result.success {
        Ok(())
    } else {
        Err(CliError::Lookup(result.error.clone().unwrap_or_default()))
    }
}
