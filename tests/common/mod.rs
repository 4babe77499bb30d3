//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
// self
use wavecrest::{
	config::Config,
	dispatch::{Dispatcher, ReqwestDispatcher},
	http::{ApiTransport, HttpRequest, HttpResponse, TransportFailure, TransportFuture},
	url::Url,
};

pub const DEVELOPER_ID: &str = "dev-42";
pub const DEVELOPER_PASSWORD: &str = "dev-secret";
pub const PARTNER_ID: &str = "partner-7";
pub const AUTHENTICATOR: &str = "/v3/services/authenticator";

pub fn config_for(base: &str) -> Config {
	Config::builder(
		Url::parse(base).expect("Test endpoint should parse."),
		DEVELOPER_ID,
		DEVELOPER_PASSWORD,
		PARTNER_ID,
	)
	.timeout(std::time::Duration::from_secs(5))
	.build()
	.expect("Test config should build.")
}

pub fn reqwest_dispatcher(server: &MockServer) -> ReqwestDispatcher {
	Dispatcher::new(config_for(&server.base_url())).expect("Reqwest dispatcher should build.")
}

/// Mocks a successful login that hands out `token`.
pub async fn mock_login<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = format!("{{\"token\":\"{token}\"}}");

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(AUTHENTICATOR)
				.header("x-method-override", "login")
				.header("developerid", DEVELOPER_ID)
				.header("developerpassword", DEVELOPER_PASSWORD)
				.header("content-type", "application/json")
				.header("accept", "application/json")
				.header_missing("authenticationtoken");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// One scripted transport outcome.
pub enum Step {
	/// Answer with a status and body.
	Respond(u16, &'static str),
	/// Fail, optionally with a response recovered from the failure state.
	Fail(Option<(u16, &'static str)>),
	/// Never answer.
	Hang,
}

/// Transport that replays scripted outcomes and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
	script: Mutex<VecDeque<Step>>,
	seen: Arc<Mutex<Vec<HttpRequest>>>,
}
impl ScriptedTransport {
	pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
		Self { script: Mutex::new(steps.into_iter().collect()), seen: Default::default() }
	}

	pub fn recorder(&self) -> Arc<Mutex<Vec<HttpRequest>>> {
		self.seen.clone()
	}
}
impl ApiTransport for ScriptedTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		self.seen.lock().push(request);

		let step = self.script.lock().pop_front().expect("Transport script ran out of steps.");

		Box::pin(async move {
			match step {
				Step::Respond(status, body) => Ok(response(status, body)),
				Step::Fail(recovered) => {
					let failure =
						TransportFailure::new(std::io::Error::other("connection reset by peer"));

					Err(match recovered {
						Some((status, body)) => failure.with_response(response(status, body)),
						None => failure,
					})
				},
				Step::Hang => std::future::pending().await,
			}
		})
	}
}

pub fn scripted_dispatcher(
	steps: impl IntoIterator<Item = Step>,
) -> (Dispatcher<ScriptedTransport>, Arc<Mutex<Vec<HttpRequest>>>) {
	let transport = ScriptedTransport::new(steps);
	let recorder = transport.recorder();
	let dispatcher = Dispatcher::with_transport(config_for("https://sandbox.example.com"), transport);

	(dispatcher, recorder)
}

pub const LOGIN: Step = Step::Respond(200, r#"{"token":"abc123"}"#);

pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
	request.headers().get(name).and_then(|value| value.to_str().ok())
}

pub fn json_body(request: &HttpRequest) -> serde_json::Value {
	serde_json::from_slice(request.body()).expect("Recorded request body should be JSON.")
}

fn response(status: u16, body: &str) -> HttpResponse {
	let mut response = HttpResponse::new(body.as_bytes().to_vec());

	*response.status_mut() =
		http::StatusCode::from_u16(status).expect("Scripted status should be valid.");

	response
}
