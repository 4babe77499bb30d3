//! Developer-credential exchange against the authentication service.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Secret},
	config::AUTHENTICATOR_PATH,
	dispatch::{self, Dispatcher},
	error::{AuthError, DecodeError, TransportError},
	http::ApiTransport,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

#[derive(Deserialize)]
struct AuthenticatorResponse {
	token: String,
}

impl<T> Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Exchanges the configured developer credentials for a fresh bearer token.
	///
	/// Sends one bodiless POST to the authenticator and stamps the returned token with the
	/// current time. The credential store is left untouched; [`Dispatcher::bearer_token`]
	/// records the result. Transport failures, non-success statuses, and bodies without a
	/// `token` field all surface as [`AuthError`].
	pub async fn authenticate(&self) -> Result<Credentials> {
		const KIND: CallKind = CallKind::Authenticate;

		let span = CallSpan::new(KIND, "authenticate", "POST", AUTHENTICATOR_PATH);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.auth_metrics.record_attempt();

		let result = span
			.instrument(async move {
				let request = dispatch::build_authenticator_request(&self.config)?;
				let response = self
					.transport
					.execute(request)
					.await
					.map_err(|failure| AuthError::Transport(TransportError::boxed(failure.source)))?;
				let status = response.status();

				if !status.is_success() {
					return Err(AuthError::Rejected {
						status: status.as_u16(),
						body: serde_json::from_slice(response.body()).ok(),
					}
					.into());
				}

				let token = parse_token(response.body(), status.as_u16())?;

				Ok(Credentials::new(token, OffsetDateTime::now_utc()))
			})
			.await;

		match &result {
			Ok(_) => {
				self.auth_metrics.record_success();
				obs::record_call_outcome(KIND, CallOutcome::Success);
			},
			Err(_) => {
				self.auth_metrics.record_failure();
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}
}

fn parse_token(body: &[u8], status: u16) -> Result<Secret, AuthError> {
	let value = serde_json::from_slice::<Value>(body).map_err(|source| {
		AuthError::Decode(DecodeError::InvalidJson { status: Some(status), source })
	})?;
	let response: AuthenticatorResponse = serde_path_to_error::deserialize(value)
		.map_err(|source| AuthError::MissingToken { source })?;

	Ok(Secret::new(response.token))
}
