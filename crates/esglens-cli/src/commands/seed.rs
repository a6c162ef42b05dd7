use std::sync::Arc;

use serde_json::{json, Value};

use esglens_core::Company;
use esglens_store::{EntityStore, Seeder};

use crate::error::CliError;

pub fn run(store: Arc<dyn EntityStore<Company>>) -> Result<Value, CliError> {
    let report = Seeder::run(store)?;
    Ok(json!({
        "companiesSeeded": report.companies_seeded,
        "skipped": report.skipped,
    }))
}
