//! Card lifecycle, funding, and inquiry endpoints.

// crates.io
use serde_json::Map;
use time::macros::format_description;
// self
use crate::{
	_prelude::*,
	api,
	dispatch::{Dispatcher, Method},
	error::DecodeError,
	http::ApiTransport,
};

/// Paging window for [`Dispatcher::transactions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionPage {
	/// Maximum number of transactions to return.
	pub count: u32,
	/// Number of transactions to skip.
	pub offset: u32,
}
impl Default for TransactionPage {
	fn default() -> Self {
		Self { count: 100, offset: 0 }
	}
}

impl<T> Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Issues a new card for the business partner.
	///
	/// Defaults: `cardProgramId = "0"`, `Businesspartnerid = <partner id>`, `channelType = "1"`,
	/// and `localeTime` set to the current instant.
	pub async fn request_card(&self, params: Value) -> Result<Value> {
		let stamped = locale_time(OffsetDateTime::now_utc())?;
		let mut defaults = Map::new();

		defaults.insert("cardProgramId".into(), json!("0"));
		defaults.insert("Businesspartnerid".into(), json!(self.config.partner_id));
		defaults.insert("channelType".into(), json!("1"));
		defaults.insert("localeTime".into(), json!(stamped));

		let payload = api::merge_params(defaults, params)?;

		self.dispatch(Method::Post, "/cards", Some(payload)).await
	}

	/// Loads money onto a card with `channelType = "1"` and `agentId = <partner id>` defaults.
	pub async fn load_money(&self, user_id: &str, proxy: &str, params: Value) -> Result<Value> {
		let mut defaults = Map::new();

		defaults.insert("channelType".into(), json!("1"));
		defaults.insert("agentId".into(), json!(self.config.partner_id));

		let payload = api::merge_params(defaults, params)?;

		self.dispatch(Method::Post, &card_path(user_id, proxy, "/load"), Some(payload)).await
	}

	/// Returns the card's available balance as an integer.
	///
	/// `avlBal` is read the way the card API reports it: numbers are truncated, strings are read
	/// up to the first non-digit, and anything else counts as zero.
	pub async fn balance(&self, user_id: &str, proxy: &str) -> Result<i64> {
		let body = self.dispatch(Method::Get, &card_path(user_id, proxy, "/balance"), None).await?;

		match body.get("avlBal") {
			Some(value) => Ok(integer_value(value)),
			None => Err(DecodeError::MissingField { field: "avlBal", body }.into()),
		}
	}

	/// Returns the card details.
	pub async fn card_details(&self, user_id: &str, proxy: &str) -> Result<Value> {
		self.dispatch(Method::Get, &card_path(user_id, proxy, "/carddetails"), None).await
	}

	/// Lists card transactions.
	pub async fn transactions(
		&self,
		user_id: &str,
		proxy: &str,
		page: TransactionPage,
	) -> Result<Value> {
		let payload = json!({ "txnCount": page.count, "offset": page.offset });

		self.dispatch(Method::Post, &card_path(user_id, proxy, "/transactions"), Some(payload))
			.await
	}

	/// Activates a card.
	pub async fn activate(&self, user_id: &str, proxy: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &card_path(user_id, proxy, "/activate"), Some(payload)).await
	}

	/// Returns the cardholder information attached to a card.
	pub async fn cardholder(&self, user_id: &str, proxy: &str) -> Result<Value> {
		self.dispatch(Method::Get, &card_path(user_id, proxy, "/cardholderinfo"), None).await
	}

	/// Changes a card's status; see [`CardStatus`](crate::reference::CardStatus) for the codes.
	pub async fn update_status(&self, user_id: &str, proxy: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &card_path(user_id, proxy, "/status"), Some(payload)).await
	}

	/// Replaces a card.
	pub async fn replace(&self, user_id: &str, proxy: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &card_path(user_id, proxy, "/replace"), Some(payload)).await
	}

	/// Transfers funds from a card.
	pub async fn transfer(&self, proxy: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &format!("/cards/{proxy}/transfers"), Some(payload)).await
	}

	/// Updates card attributes.
	pub async fn update_card(&self, user_id: &str, proxy: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &card_path(user_id, proxy, "/"), Some(payload)).await
	}

	/// Unloads money from a card.
	pub async fn card_unload(&self, user_id: &str, proxy: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &card_path(user_id, proxy, "/purchase"), Some(payload)).await
	}
}

fn card_path(user_id: &str, proxy: &str, suffix: &str) -> String {
	format!("/users/{user_id}/cards/{proxy}{suffix}")
}

fn locale_time(instant: OffsetDateTime) -> Result<String> {
	instant
		.format(format_description!(
			"[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
		))
		.map_err(|e| Error::InvalidPayload { reason: e.to_string() })
}

fn integer_value(value: &Value) -> i64 {
	match value {
		Value::Number(number) => number
			.as_i64()
			.or_else(|| number.as_f64().map(|float| float.trunc() as i64))
			.unwrap_or_default(),
		Value::String(raw) => leading_integer(raw),
		_ => 0,
	}
}

fn leading_integer(raw: &str) -> i64 {
	let trimmed = raw.trim_start();
	let (sign, digits) = match trimmed.strip_prefix('-') {
		Some(rest) => (-1, rest),
		None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
	};
	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());

	digits[..end].parse::<i64>().map(|value| sign * value).unwrap_or_default()
}
