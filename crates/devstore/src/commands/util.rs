//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Read the whole input: the file at `path`, or stdin for `None` / "-".
pub fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(p) if p != Path::new("-") => Ok(std::fs::read_to_string(p)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Render `data` as JSON, pretty unless `--compact`.
pub fn render_json<T: Serialize + ?Sized>(data: &T, global: &GlobalOpts) -> Result<String, CliError> {
    let text = if global.compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(text)
}
