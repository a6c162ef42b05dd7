mod call;
mod capabilities;
mod companies;
mod seed;

use std::sync::Arc;

use serde_json::Value;

use esglens_core::Company;
use esglens_store::{CompanyStore, EntityStore, StoreConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<Value, CliError> {
    match &cli.command {
        // Capabilities are a pure read of the registry; no store is opened.
        Command::Capabilities => capabilities::run(),
        Command::Call(args) => call::run(open_store(cli)?, args),
        Command::Seed => seed::run(open_store(cli)?),
        Command::Companies(command) => companies::run(open_store(cli)?, command),
    }
}

fn open_store(cli: &Cli) -> Result<Arc<dyn EntityStore<Company>>, CliError> {
    let config = match &cli.db {
        Some(path) => StoreConfig::at(path),
        None => StoreConfig::default(),
    };
    Ok(Arc::new(CompanyStore::open(config)?))
}
