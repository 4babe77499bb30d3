//! Request descriptors, the closed verb set, and normalized responses.

// self
use crate::_prelude::*;

/// HTTP verbs accepted by the card API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// Read-only call; never carries a body.
	Get,
	/// Create or command call with a JSON body.
	Post,
	/// Replace call with a JSON body.
	Put,
	/// Delete call with a JSON body.
	Delete,
}
impl Method {
	/// Returns the canonical upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}

	/// Returns `true` if requests with this verb serialize a JSON body.
	pub const fn carries_body(self) -> bool {
		!matches!(self, Method::Get)
	}

	/// Converts into the [`http::Method`] used on the wire.
	pub fn as_http(self) -> http::Method {
		match self {
			Method::Get => http::Method::GET,
			Method::Post => http::Method::POST,
			Method::Put => http::Method::PUT,
			Method::Delete => http::Method::DELETE,
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Method {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		[Method::Get, Method::Post, Method::Put, Method::Delete]
			.into_iter()
			.find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| Error::UnsupportedMethod { method: s.to_owned() })
	}
}
impl TryFrom<&http::Method> for Method {
	type Error = Error;

	fn try_from(value: &http::Method) -> Result<Self, Self::Error> {
		value.as_str().parse()
	}
}

/// One logical card API call: verb, service path, and optional JSON payload.
///
/// The path is relative to `/v3/services` and must begin with `/`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	method: Method,
	path: String,
	payload: Option<Value>,
}
impl ApiRequest {
	/// Creates a request descriptor.
	pub fn new(method: Method, path: impl Into<String>, payload: Option<Value>) -> Self {
		Self { method, path: path.into(), payload }
	}

	/// Creates a GET request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path, None)
	}

	/// Creates a POST request carrying `payload`.
	pub fn post(path: impl Into<String>, payload: Value) -> Self {
		Self::new(Method::Post, path, Some(payload))
	}

	/// Creates a PUT request carrying `payload`.
	pub fn put(path: impl Into<String>, payload: Value) -> Self {
		Self::new(Method::Put, path, Some(payload))
	}

	/// Creates a DELETE request; the body defaults to an empty object.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path, None)
	}

	/// Returns the verb.
	pub fn method(&self) -> Method {
		self.method
	}

	/// Returns the service path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Serializes the wire body: empty for GET, the payload (or `{}`) as JSON otherwise.
	pub fn encode_body(&self) -> Result<Vec<u8>> {
		if !self.method.carries_body() {
			return Ok(Vec::new());
		}

		let encoded = match &self.payload {
			Some(payload) => serde_json::to_vec(payload),
			None => serde_json::to_vec(&Value::Object(Default::default())),
		};

		encoded.map_err(|e| Error::InvalidPayload { reason: e.to_string() })
	}
}

/// Normalized outcome of a dispatch.
///
/// The body is returned unchanged whatever the HTTP status; the card API reports
/// business failures through fields such as `errorCode`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
	/// HTTP status, when the server answered.
	pub status: Option<u16>,
	/// Parsed JSON body.
	pub body: Value,
	/// `true` when the body was recovered from a transport failure.
	pub recovered: bool,
}
impl ApiResponse {
	/// Consumes the response, returning the body.
	pub fn into_body(self) -> Value {
		self.body
	}

	/// Returns the remote `errorCode` field rendered as a string, if present.
	pub fn error_code(&self) -> Option<String> {
		match self.body.get("errorCode")? {
			Value::String(code) => Some(code.clone()),
			Value::Number(code) => Some(code.to_string()),
			_ => None,
		}
	}

	/// Returns `true` if the server answered with a 2xx status and no `errorCode`.
	pub fn is_success(&self) -> bool {
		self.status.is_some_and(|status| (200..300).contains(&status)) && self.error_code().is_none()
	}
}
