//! Endpoint wrappers over [`Dispatcher`](crate::dispatch::Dispatcher).
//!
//! Each wrapper shapes its parameters and performs exactly one dispatch. Wrappers that take a
//! JSON object merge it over their defaults, so caller-supplied keys win. Business failures
//! are not raised; inspect the returned body (e.g. `errorCode`) as the card API documents.

pub mod cards;
pub mod partners;
pub mod users;

pub use cards::TransactionPage;
pub use partners::DEFAULT_CURRENCY;

// crates.io
use serde_json::Map;
// self
use crate::_prelude::*;

/// Merges caller parameters over wrapper defaults.
pub(crate) fn merge_params(mut defaults: Map<String, Value>, params: Value) -> Result<Value> {
	match params {
		Value::Object(overrides) => {
			defaults.extend(overrides);

			Ok(Value::Object(defaults))
		},
		Value::Null => Ok(Value::Object(defaults)),
		other => Err(Error::InvalidPayload {
			reason: format!("expected a JSON object of parameters, found {}", json_kind(&other)),
		}),
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
