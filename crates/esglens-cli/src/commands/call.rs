use std::sync::Arc;

use serde_json::Value;

use esglens_agent::{Dispatcher, ParamBag};
use esglens_core::Company;
use esglens_store::EntityStore;

use crate::cli::CallArgs;
use crate::error::CliError;

pub fn run(store: Arc<dyn EntityStore<Company>>, args: &CallArgs) -> Result<Value, CliError> {
    // The transport rejects an empty tool name; the dispatcher does not
    // re-validate it.
    let tool = args.tool.trim();
    if tool.is_empty() {
        return Err(CliError::EmptyToolName);
    }

    let params = parse_params(&args.params)?;
    let dispatcher = Dispatcher::new(store);
    let envelope = dispatcher.execute_tool(tool, &params);
    Ok(serde_json::to_value(envelope)?)
}

fn parse_params(raw: &[String]) -> Result<ParamBag, CliError> {
    let mut bag = ParamBag::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(CliError::MalformedParam { raw: entry.clone() });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::MalformedParam { raw: entry.clone() });
        }
        bag.insert(key.to_owned(), coerce_value(value.trim()));
    }
    Ok(bag)
}

fn coerce_value(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(number) = raw.parse::<f64>() {
        if number.is_finite() {
            return Value::from(number);
        }
    }
    Value::String(raw.to_owned())
}
