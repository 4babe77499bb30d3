//! Request dispatch with a shared, lazily refreshed bearer token.
//!
//! [`Dispatcher::send`] is the single path every card API call takes: it makes sure the
//! [`CredentialStore`] holds a fresh token (authenticating at most once across concurrent
//! callers), builds the request under `<endpoint>/v3/services<path>`, attaches the fixed JSON
//! and developer headers, and normalizes the outcome. A response body is always parsed as JSON
//! whatever its status; a transport failure that still carries a JSON body is returned as a
//! recovered [`ApiResponse`] instead of an error.

mod authenticate;
mod metrics;
mod request;

pub use metrics::AuthMetrics;
pub use request::*;

// crates.io
use http::header::{
	ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue,
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialStore, Secret},
	config::Config,
	error::{AuthError, ConfigError, DecodeError, TransportError},
	http::{ApiTransport, HttpRequest, HttpResponse, TransportFailure},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Header carrying the developer identifier.
pub const DEVELOPER_ID: &str = "developerid";
/// Header carrying the developer password.
pub const DEVELOPER_PASSWORD: &str = "developerpassword";
/// Header carrying the bearer token on every non-authentication call.
pub const AUTHENTICATION_TOKEN: &str = "authenticationtoken";
/// Header marking the authentication call as a login.
pub const METHOD_OVERRIDE: &str = "x-method-override";

const JSON: &str = "application/json";

#[cfg(feature = "reqwest")]
/// Dispatcher specialized for the crate's default reqwest transport.
pub type ReqwestDispatcher = Dispatcher<ReqwestTransport>;

/// Executes card API calls end to end, guaranteeing a valid token is attached.
///
/// Clones share the configuration, transport, credential store, and metrics, so one
/// dispatcher can be handed to many tasks while a single token serves all of them.
pub struct Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Immutable client settings.
	pub config: Arc<Config>,
	/// HTTP transport used for every outbound request.
	pub transport: Arc<T>,
	/// Store holding the shared bearer token.
	pub credentials: Arc<CredentialStore>,
	/// Counters for authentication traffic.
	pub auth_metrics: Arc<AuthMetrics>,
}
impl<T> Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a dispatcher over a caller-provided transport with an empty credential store.
	pub fn with_transport(config: impl Into<Arc<Config>>, transport: impl Into<Arc<T>>) -> Self {
		Self {
			config: config.into(),
			transport: transport.into(),
			credentials: Default::default(),
			auth_metrics: Default::default(),
		}
	}

	/// Replaces the credential store, e.g. with one seeded from another process.
	pub fn with_credentials(mut self, credentials: impl Into<Arc<CredentialStore>>) -> Self {
		self.credentials = credentials.into();

		self
	}

	/// Dispatches one call and returns the parsed response body.
	pub async fn dispatch(&self, method: Method, path: &str, payload: Option<Value>) -> Result<Value> {
		self.send(ApiRequest::new(method, path, payload)).await.map(ApiResponse::into_body)
	}

	/// Dispatches one call named by a verb string.
	///
	/// Verbs outside GET, POST, PUT, and DELETE fail with [`Error::UnsupportedMethod`] before
	/// any network traffic, authentication included.
	pub async fn dispatch_verb(
		&self,
		verb: &str,
		path: &str,
		payload: Option<Value>,
	) -> Result<Value> {
		let method = verb.parse::<Method>()?;

		self.dispatch(method, path, payload).await
	}

	/// Dispatches one call and decodes the body into `R`.
	pub async fn dispatch_as<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.send(request).await?;
		let status = response.status;

		serde_path_to_error::deserialize(response.body)
			.map_err(|source| DecodeError::Shape { status, source }.into())
	}

	/// Dispatches one call and returns the normalized response.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Dispatch;

		let span = CallSpan::new(KIND, "send", request.method().as_str(), request.path());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.bearer_token().await?;
				let http_request = build_service_request(&self.config, &request, &token)?;

				match self.transport.execute(http_request).await {
					Ok(response) => decode_response(response).map_err(Error::from),
					Err(failure) => recover_failure(failure),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Returns a fresh bearer token, authenticating first if the store needs a refresh.
	///
	/// Concurrent callers that find the store stale queue on the store's refresh guard; the
	/// first one authenticates and the rest reuse its outcome, the token on success or the
	/// failure as [`AuthError::Shared`]. The store is written right after the authenticator
	/// answers with no suspension point in between, so dropping this future never leaves a
	/// token issued but unrecorded.
	pub async fn bearer_token(&self) -> Result<Secret> {
		if let Some(token) = self.credentials.fresh_token_at(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let observed = self.credentials.completed_logins();
		let refresh = self.credentials.refresh_guard().await;

		if let Some(token) = self.credentials.fresh_token_at(OffsetDateTime::now_utc()) {
			self.auth_metrics.record_coalesced();

			return Ok(token);
		}
		if let Some(failure) = refresh.failure_since(observed) {
			self.auth_metrics.record_coalesced();

			return Err(AuthError::Shared(failure).into());
		}

		match self.authenticate().await {
			Ok(credentials) => {
				let token = credentials.token.clone();

				obs::trace_token_refreshed(credentials.issued_at);
				refresh.succeed(credentials);

				Ok(token)
			},
			Err(Error::Auth(failure)) => {
				let failure = Arc::new(failure);

				refresh.fail(failure.clone());

				Err(AuthError::Shared(failure).into())
			},
			Err(e) => Err(e),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Dispatcher<ReqwestTransport> {
	/// Creates a dispatcher with a reqwest transport built from `config`.
	pub fn new(config: Config) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Ok(Self::with_transport(config, transport))
	}
}
impl<T> Clone for Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			credentials: self.credentials.clone(),
			auth_metrics: self.auth_metrics.clone(),
		}
	}
}
impl<T> Debug for Dispatcher<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.field("auth_metrics", &self.auth_metrics)
			.finish()
	}
}

/// Builds an authenticated service request.
pub(crate) fn build_service_request(
	config: &Config,
	request: &ApiRequest,
	token: &Secret,
) -> Result<HttpRequest> {
	let mut http_request = http::Request::builder()
		.method(request.method().as_http())
		.uri(config.service_url(request.path()))
		.body(request.encode_body()?)
		.map_err(ConfigError::from)?;
	let headers = http_request.headers_mut();

	insert_developer_headers(headers, config)?;
	insert_header(headers, AUTHENTICATION_TOKEN, "AuthenticationToken", token.header_value())?;

	Ok(http_request)
}

/// Builds the bodiless login request sent to the authenticator.
pub(crate) fn build_authenticator_request(config: &Config) -> Result<HttpRequest> {
	let mut http_request = http::Request::builder()
		.method(http::Method::POST)
		.uri(config.authenticator_url())
		.body(Vec::new())
		.map_err(ConfigError::from)?;
	let headers = http_request.headers_mut();

	insert_developer_headers(headers, config)?;
	headers.insert(HeaderName::from_static(METHOD_OVERRIDE), HeaderValue::from_static("login"));

	Ok(http_request)
}

fn insert_developer_headers(headers: &mut HeaderMap, config: &Config) -> Result<(), ConfigError> {
	headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
	headers.insert(ACCEPT, HeaderValue::from_static(JSON));
	insert_header(headers, DEVELOPER_ID, "DeveloperId", HeaderValue::from_str(&config.user))?;
	insert_header(
		headers,
		DEVELOPER_PASSWORD,
		"DeveloperPassword",
		config.password.header_value(),
	)
}

fn insert_header(
	headers: &mut HeaderMap,
	name: &'static str,
	label: &'static str,
	value: Result<HeaderValue, InvalidHeaderValue>,
) -> Result<(), ConfigError> {
	let value = value.map_err(|source| ConfigError::InvalidHeader { name: label, source })?;

	headers.insert(HeaderName::from_static(name), value);

	Ok(())
}

fn decode_response(response: HttpResponse) -> Result<ApiResponse, DecodeError> {
	let status = response.status().as_u16();
	let body = serde_json::from_slice(response.body())
		.map_err(|source| DecodeError::InvalidJson { status: Some(status), source })?;

	Ok(ApiResponse { status: Some(status), body, recovered: false })
}

fn recover_failure(failure: TransportFailure) -> Result<ApiResponse> {
	let TransportFailure { source, response } = failure;

	if let Some(response) = response {
		let status = response.status().as_u16();

		if let Ok(body) = serde_json::from_slice::<Value>(response.body()) {
			obs::trace_recovered_failure(Some(status), source.as_ref());

			return Ok(ApiResponse { status: Some(status), body, recovered: true });
		}
	}

	Err(TransportError::boxed(source).into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> Config {
		Config::builder(
			Url::parse("https://sandbox.example.com/").expect("Endpoint fixture should parse."),
			"dev-id",
			"dev-pass",
			"partner-7",
		)
		.build()
		.expect("Config fixture should build.")
	}

	fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
		request.headers().get(name).and_then(|value| value.to_str().ok())
	}

	#[test]
	fn service_requests_carry_every_header() {
		let token = Secret::new("abc123");

		for request in [
			ApiRequest::get("/users/42/cards/99/balance"),
			ApiRequest::post("/cards", json!({})),
			ApiRequest::put("/users/42", json!({ "a": 1 })),
			ApiRequest::delete("/users/42/cards/99"),
		] {
			let built = build_service_request(&config(), &request, &token)
				.expect("Service request should build.");

			assert_eq!(built.method(), &request.method().as_http());
			assert_eq!(
				built.uri().to_string(),
				format!("https://sandbox.example.com/v3/services{}", request.path()),
			);
			assert_eq!(header(&built, "Content-Type"), Some("application/json"));
			assert_eq!(header(&built, "Accept"), Some("application/json"));
			assert_eq!(header(&built, "DeveloperId"), Some("dev-id"));
			assert_eq!(header(&built, "DeveloperPassword"), Some("dev-pass"));
			assert_eq!(header(&built, "AuthenticationToken"), Some("abc123"));
			assert!(built.headers().get(METHOD_OVERRIDE).is_none());
			assert_eq!(built.body().is_empty(), request.method() == Method::Get);
		}
	}

	#[test]
	fn authenticator_request_is_a_bodiless_login() {
		let built = build_authenticator_request(&config()).expect("Login request should build.");

		assert_eq!(built.method(), &http::Method::POST);
		assert_eq!(built.uri().to_string(), "https://sandbox.example.com/v3/services/authenticator");
		assert_eq!(header(&built, "X-Method-Override"), Some("login"));
		assert_eq!(header(&built, "DeveloperId"), Some("dev-id"));
		assert_eq!(header(&built, "DeveloperPassword"), Some("dev-pass"));
		assert_eq!(header(&built, "Content-Type"), Some("application/json"));
		assert_eq!(header(&built, "Accept"), Some("application/json"));
		assert!(built.headers().get(AUTHENTICATION_TOKEN).is_none());
		assert!(built.body().is_empty());
	}

	#[test]
	fn secrets_are_marked_sensitive() {
		let built = build_service_request(&config(), &ApiRequest::get("/users/1"), &Secret::new("t"))
			.expect("Service request should build.");

		assert!(built.headers()[DEVELOPER_PASSWORD].is_sensitive());
		assert!(built.headers()[AUTHENTICATION_TOKEN].is_sensitive());
		assert!(!built.headers()[DEVELOPER_ID].is_sensitive());
	}

	#[test]
	fn invalid_header_values_are_config_errors() {
		let err = build_service_request(
			&config(),
			&ApiRequest::get("/users/1"),
			&Secret::new("line\nbreak"),
		)
		.expect_err("Control characters cannot travel in headers.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::InvalidHeader { name: "AuthenticationToken", .. })
		));
	}

	#[test]
	fn decoding_ignores_status() {
		let mut response = HttpResponse::new(br#"{"errorCode":"1009"}"#.to_vec());

		*response.status_mut() = http::StatusCode::BAD_REQUEST;

		let decoded = decode_response(response).expect("JSON error bodies should decode.");

		assert_eq!(decoded.status, Some(400));
		assert_eq!(decoded.body, json!({ "errorCode": "1009" }));
		assert!(!decoded.recovered);

		let err = decode_response(HttpResponse::new(b"<html>".to_vec()))
			.expect_err("HTML bodies should fail to decode.");

		assert!(matches!(err, DecodeError::InvalidJson { status: Some(200), .. }));
	}

	#[test]
	fn failures_without_json_are_transport_errors() {
		let bare = TransportFailure::new(std::io::Error::other("dns"));

		assert!(matches!(recover_failure(bare), Err(Error::Transport(_))));

		let html = TransportFailure::new(std::io::Error::other("reset"))
			.with_response(HttpResponse::new(b"<html>".to_vec()));

		assert!(matches!(recover_failure(html), Err(Error::Transport(_))));

		let json = TransportFailure::new(std::io::Error::other("reset"))
			.with_response(HttpResponse::new(br#"{"errorCode":"X"}"#.to_vec()));
		let recovered = recover_failure(json).expect("JSON bodies should be recovered.");

		assert!(recovered.recovered);
		assert_eq!(recovered.body, json!({ "errorCode": "X" }));
	}
}
