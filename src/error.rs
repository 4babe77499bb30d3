//! Client-level error types shared by the credential store, dispatcher, and endpoint wrappers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Developer credentials could not be exchanged for a bearer token.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Verb outside of GET, POST, PUT, and DELETE.
	#[error("HTTP method `{method}` is not supported.")]
	UnsupportedMethod {
		/// Verb exactly as supplied by the caller.
		method: String,
	},
	/// Transport failure (DNS, TCP, TLS, timeout) without a parseable body.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request payload cannot be shaped into a JSON object body.
	#[error("Request payload is invalid: {reason}.")]
	InvalidPayload {
		/// Human-readable reason.
		reason: String,
	},
}
impl Error {
	/// Returns the parsed remote error body carried by this error, if any.
	pub fn body(&self) -> Option<&Value> {
		match self {
			Self::Auth(auth) => match auth.root() {
				AuthError::Rejected { body, .. } => body.as_ref(),
				_ => None,
			},
			Self::Decode(DecodeError::MissingField { body, .. }) => Some(body),
			_ => None,
		}
	}
}

/// Failures raised while exchanging developer credentials for a bearer token.
///
/// None of these variants ever touch the credential store; the previous token (if any) stays
/// in place and the caller decides whether to retry the whole operation. Dispatch calls
/// that depended on a login that failed receive [`AuthError::Shared`] around that failure.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// The authentication request never produced a response.
	#[error("Transport failed while calling the authenticator.")]
	Transport(#[source] TransportError),
	/// The authenticator answered with a non-success status.
	#[error("Authenticator rejected the developer credentials with HTTP {status}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Parsed error body, when the response carried JSON.
		body: Option<Value>,
	},
	/// The authenticator answered with a body that is not JSON.
	#[error("Authenticator returned a body that is not valid JSON.")]
	Decode(#[source] DecodeError),
	/// The authenticator answered with JSON that lacks a token.
	#[error("Authenticator response does not contain a token.")]
	MissingToken {
		/// Structured decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A failed login, handed to the caller that ran it and to every caller queued behind it.
	#[error(transparent)]
	Shared(Arc<AuthError>),
}
impl AuthError {
	/// Returns the failure that originated this error, looking through [`AuthError::Shared`].
	pub fn root(&self) -> &AuthError {
		match self {
			Self::Shared(shared) => shared.root(),
			other => other,
		}
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the card API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	pub(crate) fn boxed(source: BoxError) -> Self {
		Self::Network { source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON.
	#[error("Card API returned malformed JSON.")]
	InvalidJson {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Underlying parser failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body is JSON but does not match the requested shape.
	#[error("Card API returned JSON of an unexpected shape.")]
	Shape {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Structured decoding failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A field the endpoint wrapper relies on is absent.
	#[error("Card API response is missing the `{field}` field.")]
	MissingField {
		/// Field name.
		field: &'static str,
		/// Full response body for caller inspection.
		body: Value,
	},
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable holds a value that cannot be parsed.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidVariable {
		/// Variable name.
		name: &'static str,
		/// Parser message.
		reason: String,
	},
	/// Endpoint or proxy URL cannot be parsed.
	#[error("The {role} URL is invalid.")]
	InvalidUrl {
		/// Which URL failed (`endpoint` or `proxy`).
		role: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint uses a scheme other than http or https.
	#[error("Endpoint scheme `{scheme}` is not supported.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// A configured value cannot be carried in an HTTP header.
	#[error("Header `{name}` cannot carry the configured value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
		/// Underlying validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
