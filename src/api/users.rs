//! Cardholder account endpoints.

// self
use crate::{
	_prelude::*,
	dispatch::{Dispatcher, Method},
	http::ApiTransport,
};

impl<T> Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Returns the user's profile.
	pub async fn user_details(&self, user_id: &str) -> Result<Value> {
		self.dispatch(Method::Get, &format!("/users/{user_id}"), None).await
	}

	/// Uploads KYC documents for a user.
	pub async fn upload_docs(&self, user_id: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &format!("/users/{user_id}/kyc"), Some(payload)).await
	}

	/// Sets a new password for a user.
	pub async fn change_user_password(&self, user_id: &str, payload: Value) -> Result<Value> {
		self.dispatch(Method::Post, &format!("/users/{user_id}/createPassword"), Some(payload))
			.await
	}
}
