//! `devstore encode`: device JSON -> stored document.

use devstore_core::{Device, DeviceRecordMapper, DocumentConverter};

use crate::cli::{GlobalOpts, InputArgs};
use crate::error::CliError;

use super::util;

pub fn handle(args: &InputArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let input = util::read_input(args.file.as_deref())?;
    let device: Device = serde_json::from_str(&input)?;

    let doc = DeviceRecordMapper::new().to_document(&device);
    tracing::debug!(keys = doc.len(), "encoded device");

    println!("{}", util::render_json(&doc, global)?);
    Ok(())
}
