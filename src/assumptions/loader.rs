//! JSON-based assumption loader
//!
//! Reads an `Assumptions` record from a JSON object keyed by parameter name,
//! e.g. `{"IssueAge": 65, "NPaths": 2000}`. Absent keys keep the default
//! pricing basis.

use super::Assumptions;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default path to the assumptions file
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions.json";

/// Parse assumptions from any JSON reader (no validation)
pub fn from_reader<R: Read>(reader: R) -> Result<Assumptions> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load assumptions from a JSON file (no validation)
pub fn load_json(path: &Path) -> Result<Assumptions> {
    let file = File::open(path)?;
    let assumptions = from_reader(BufReader::new(file))?;
    log::info!("Loaded assumptions from {}", path.display());
    Ok(assumptions)
}
