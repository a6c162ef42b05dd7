use serde_json::Value;

use esglens_agent::Capabilities;

use crate::error::CliError;

pub fn run() -> Result<Value, CliError> {
    Ok(serde_json::to_value(Capabilities::current())?)
}
