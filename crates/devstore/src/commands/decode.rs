//! `devstore decode`: stored document -> device JSON.

use devstore_core::{DeviceRecordMapper, Document, DocumentConverter};

use crate::cli::{GlobalOpts, InputArgs};
use crate::error::CliError;

use super::util;

pub fn handle(args: &InputArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let input = util::read_input(args.file.as_deref())?;
    let doc: Document = serde_json::from_str(&input)?;

    let device = DeviceRecordMapper::new().from_document(&doc)?;

    println!("{}", util::render_json(&device, global)?);
    Ok(())
}
