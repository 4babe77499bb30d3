//! Demonstrates logging in once and reading a card balance through the default reqwest
//! transport against a mocked card API.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use wavecrest::{config::Config, dispatch::Dispatcher, url::Url};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v3/services/authenticator")
				.header("x-method-override", "login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-token\"}");
		})
		.await;
	let balance = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v3/services/users/demo-user/cards/4242/balance")
				.header("authenticationtoken", "demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"avlBal\":\"1250.75\",\"currency\":\"EUR\"}");
		})
		.await;
	let config = Config::builder(
		Url::parse(&server.base_url())?,
		"demo-developer",
		"demo-password",
		"demo-partner",
	)
	.build()?;
	let dispatcher = Dispatcher::new(config)?;
	let available = dispatcher.balance("demo-user", "4242").await?;
	let details = dispatcher
		.dispatch_verb("get", "/users/demo-user/cards/4242/balance", Some(json!({})))
		.await?;

	println!("Available balance: {available}.");
	println!("Raw balance body: {details}.");

	login.assert_calls_async(1).await;
	balance.assert_calls_async(2).await;

	Ok(())
}
