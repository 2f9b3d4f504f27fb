//! Process-wide endpoint table, installed once at start-up.

use std::sync::OnceLock;

use anyhow::{Result, bail};
use log::debug;

use crate::endpoint::EndpointTable;

static TABLE: OnceLock<EndpointTable> = OnceLock::new();

/// Install the table for the rest of the process. Fails if a table is already installed.
pub fn init(table: EndpointTable) -> Result<&'static EndpointTable> {
    let overridden = table.overridden().len();
    if TABLE.set(table).is_err() {
        bail!("endpoint table already initialized");
    }
    debug!("endpoint table initialized with {overridden} override(s)");
    Ok(global())
}

/// The installed table, falling back to the built-in defaults if `init` was never called.
pub fn global() -> &'static EndpointTable {
    TABLE.get_or_init(EndpointTable::defaults)
}
