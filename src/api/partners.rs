//! Business-partner prefunding endpoints, scoped by the configured partner id.

// self
use crate::{
	_prelude::*,
	dispatch::{Dispatcher, Method},
	error::DecodeError,
	http::ApiTransport,
};

/// Currency of the prefunding account queried when none is given.
pub const DEFAULT_CURRENCY: &str = "EUR";

impl<T> Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Returns the prefunding balance in `currency`, or in [`DEFAULT_CURRENCY`] when `None`.
	pub async fn prefunding_account(&self, currency: Option<&str>) -> Result<Value> {
		let path = format!("/businesspartners/{}/balance", self.config.partner_id);
		let payload = json!({ "currency": currency.unwrap_or(DEFAULT_CURRENCY) });

		self.dispatch(Method::Post, &path, Some(payload)).await
	}

	/// Returns the partner's transaction accounts (`txnAccountList`).
	pub async fn prefunding_accounts(&self) -> Result<Value> {
		let path = format!("/businesspartners/{}/txnaccounts", self.config.partner_id);
		let mut body = self.dispatch(Method::Get, &path, None).await?;

		match body.get_mut("txnAccountList").map(Value::take) {
			Some(accounts) => Ok(accounts),
			None => Err(DecodeError::MissingField { field: "txnAccountList", body }.into()),
		}
	}

	/// Lists transfers on one of the partner's transaction accounts.
	pub async fn prefunding_transactions(&self, account_id: &str) -> Result<Value> {
		let path = format!(
			"/businesspartners/{}/transactionaccounts/{account_id}/transfers",
			self.config.partner_id
		);

		self.dispatch(Method::Get, &path, None).await
	}
}
