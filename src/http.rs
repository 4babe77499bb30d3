//! Transport primitives for card API exchanges.
//!
//! The module exposes [`ApiTransport`] so downstream crates can plug in their own HTTP stack
//! while the dispatcher keeps ownership of URL building, headers, and error normalization.
//! Transports hand back the raw status, headers, and body; when a request fails after the
//! server already answered, implementations should attach that answer to the
//! [`TransportFailure`] so the dispatcher can still recover the structured error body.

// self
use crate::{_prelude::*, error::BoxError};
#[cfg(feature = "reqwest")] use crate::{config::Config, error::ConfigError};

/// Request type handed to transports.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Response type produced by transports.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportFailure>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing card API requests.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can be shared by every clone of a dispatcher, and
/// the futures they return must be `Send` so dispatch calls can hop executors. Transports must
/// bound every request by a timeout; the dispatcher never waits on its own.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends one request and returns the full response, whatever its status code.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Failure reported by an [`ApiTransport`].
#[derive(Debug)]
pub struct TransportFailure {
	/// Transport-specific error.
	pub source: BoxError,
	/// Response recovered from the failure state, if the server answered at all.
	pub response: Option<HttpResponse>,
}
impl TransportFailure {
	/// Wraps a transport error that produced no response.
	pub fn new(src: impl 'static + Send + Sync + StdError) -> Self {
		Self { source: Box::new(src), response: None }
	}

	/// Attaches the response recovered from the failure state.
	pub fn with_response(mut self, response: HttpResponse) -> Self {
		self.response = Some(response);

		self
	}
}
impl Display for TransportFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.source)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are never followed; the card API answers directly.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client bounded by the configured timeout and routed through the configured
	/// proxy, connecting directly otherwise.
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		let builder = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.timeout(config.timeout);
		let builder = match &config.proxy {
			Some(proxy_url) => {
				let mut proxy = reqwest::Proxy::all(proxy_url.as_str())?;

				if !proxy_url.username().is_empty() {
					proxy = proxy
						.basic_auth(proxy_url.username(), proxy_url.password().unwrap_or_default());
				}

				builder.proxy(proxy)
			},
			None => builder.no_proxy(),
		};

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request).map_err(TransportFailure::new)?;
			let response = client.execute(request).await.map_err(TransportFailure::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportFailure::new)?;
			let mut response_new = HttpResponse::new(body.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
