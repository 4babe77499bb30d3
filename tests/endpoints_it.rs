mod common;

// crates.io
use serde_json::json;
// self
use common::*;
use wavecrest::{
	api::TransactionPage,
	error::{DecodeError, Error},
	reference::CardStatus,
};

const SERVICES: &str = "/v3/services";

fn path_of(request: &wavecrest::http::HttpRequest) -> &str {
	request.uri().path()
}

#[tokio::test]
async fn request_card_merges_defaults_under_caller_params() {
	let (dispatcher, recorder) =
		scripted_dispatcher([LOGIN, Step::Respond(200, r#"{"proxyCardNumber":"99"}"#)]);
	let body = dispatcher
		.request_card(json!({ "firstName": "Ada", "channelType": "7" }))
		.await
		.expect("Card request should succeed.");

	assert_eq!(body, json!({ "proxyCardNumber": "99" }));

	let seen = recorder.lock();
	let sent = json_body(&seen[1]);

	assert_eq!(seen[1].method(), &http::Method::POST);
	assert_eq!(path_of(&seen[1]), format!("{SERVICES}/cards"));
	assert_eq!(sent["firstName"], "Ada");
	assert_eq!(sent["channelType"], "7");
	assert_eq!(sent["cardProgramId"], "0");
	assert_eq!(sent["Businesspartnerid"], PARTNER_ID);

	let stamped = sent["localeTime"].as_str().expect("localeTime should be a string.");

	assert_eq!(stamped.len(), "2026-10-19T09:05:07.250+00:00".len());
	assert!(stamped.ends_with("+00:00"));
}

#[tokio::test]
async fn load_money_defaults_agent_to_partner() {
	let (dispatcher, recorder) = scripted_dispatcher([LOGIN, Step::Respond(200, "{}")]);

	dispatcher
		.load_money("42", "99", json!({ "amount": "25", "currency": "EUR" }))
		.await
		.expect("Load should succeed.");

	let seen = recorder.lock();

	assert_eq!(path_of(&seen[1]), format!("{SERVICES}/users/42/cards/99/load"));
	assert_eq!(
		json_body(&seen[1]),
		json!({ "amount": "25", "currency": "EUR", "channelType": "1", "agentId": PARTNER_ID }),
	);
}

#[tokio::test]
async fn merge_rejects_non_object_params() {
	let (dispatcher, recorder) = scripted_dispatcher([]);
	let err = dispatcher
		.load_money("42", "99", json!(["amount", "25"]))
		.await
		.expect_err("Array params cannot be merged.");

	assert!(matches!(err, Error::InvalidPayload { .. }));
	assert!(recorder.lock().is_empty());
}

#[tokio::test]
async fn balance_reads_available_balance() {
	let (dispatcher, _) = scripted_dispatcher([
		LOGIN,
		Step::Respond(200, r#"{"avlBal":"120.50"}"#),
		Step::Respond(200, r#"{"avlBal":87}"#),
		Step::Respond(200, r#"{"avlBal":null}"#),
		Step::Respond(200, r#"{"errorCode":"1001"}"#),
	]);

	assert_eq!(dispatcher.balance("42", "99").await.expect("String balance."), 120);
	assert_eq!(dispatcher.balance("42", "99").await.expect("Numeric balance."), 87);
	assert_eq!(dispatcher.balance("42", "99").await.expect("Null balance."), 0);

	let err = dispatcher.balance("42", "99").await.expect_err("Missing balance must fail.");

	assert!(matches!(err, Error::Decode(DecodeError::MissingField { field: "avlBal", .. })));
	assert_eq!(err.body(), Some(&json!({ "errorCode": "1001" })));
}

#[tokio::test]
async fn transactions_send_the_paging_window() {
	let (dispatcher, recorder) = scripted_dispatcher([
		LOGIN,
		Step::Respond(200, r#"{"txnList":[]}"#),
		Step::Respond(200, r#"{"txnList":[]}"#),
	]);

	dispatcher
		.transactions("42", "99", TransactionPage::default())
		.await
		.expect("Default page should succeed.");
	dispatcher
		.transactions("42", "99", TransactionPage { count: 10, offset: 20 })
		.await
		.expect("Explicit page should succeed.");

	let seen = recorder.lock();

	assert_eq!(path_of(&seen[1]), format!("{SERVICES}/users/42/cards/99/transactions"));
	assert_eq!(json_body(&seen[1]), json!({ "txnCount": 100, "offset": 0 }));
	assert_eq!(json_body(&seen[2]), json!({ "txnCount": 10, "offset": 20 }));
}

#[tokio::test]
async fn card_endpoints_hit_their_paths() {
	let (dispatcher, recorder) = scripted_dispatcher([
		LOGIN,
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
	]);
	let status = json!({ "cardStatus": CardStatus::Active.as_str() });

	dispatcher.card_details("42", "99").await.expect("Details.");
	dispatcher.activate("42", "99", json!({ "activationCode": "1" })).await.expect("Activate.");
	dispatcher.cardholder("42", "99").await.expect("Cardholder.");
	dispatcher.update_status("42", "99", status.clone()).await.expect("Status.");
	dispatcher.replace("42", "99", json!({})).await.expect("Replace.");
	dispatcher.transfer("99", json!({ "amount": "5" })).await.expect("Transfer.");
	dispatcher.update_card("42", "99", json!({ "nickname": "x" })).await.expect("Update.");
	dispatcher.card_unload("42", "99", json!({ "amount": "5" })).await.expect("Unload.");

	let seen = recorder.lock();
	let calls = seen[1..]
		.iter()
		.map(|request| (request.method().as_str().to_owned(), path_of(request).to_owned()))
		.collect::<Vec<_>>();
	let expected = [
		("GET", "/users/42/cards/99/carddetails"),
		("POST", "/users/42/cards/99/activate"),
		("GET", "/users/42/cards/99/cardholderinfo"),
		("POST", "/users/42/cards/99/status"),
		("POST", "/users/42/cards/99/replace"),
		("POST", "/cards/99/transfers"),
		("POST", "/users/42/cards/99/"),
		("POST", "/users/42/cards/99/purchase"),
	]
	.map(|(method, path)| (method.to_owned(), format!("{SERVICES}{path}")));

	assert_eq!(calls, expected);
	assert_eq!(json_body(&seen[4]), status);
}

#[tokio::test]
async fn user_endpoints_hit_their_paths() {
	let (dispatcher, recorder) = scripted_dispatcher([
		LOGIN,
		Step::Respond(200, r#"{"userId":"42"}"#),
		Step::Respond(200, "{}"),
		Step::Respond(200, "{}"),
	]);

	dispatcher.user_details("42").await.expect("User details.");
	dispatcher.upload_docs("42", json!({ "docType": "passport" })).await.expect("KYC upload.");
	dispatcher
		.change_user_password("42", json!({ "password": "n3w" }))
		.await
		.expect("Password change.");

	let seen = recorder.lock();

	assert_eq!(path_of(&seen[1]), format!("{SERVICES}/users/42"));
	assert_eq!(path_of(&seen[2]), format!("{SERVICES}/users/42/kyc"));
	assert_eq!(path_of(&seen[3]), format!("{SERVICES}/users/42/createPassword"));
	assert_eq!(json_body(&seen[3]), json!({ "password": "n3w" }));
}

#[tokio::test]
async fn prefunding_endpoints_are_scoped_to_the_partner() {
	let (dispatcher, recorder) = scripted_dispatcher([
		LOGIN,
		Step::Respond(200, r#"{"balance":"1000"}"#),
		Step::Respond(200, r#"{"balance":"250"}"#),
		Step::Respond(200, r#"{"txnAccountList":[{"id":"A1"}]}"#),
		Step::Respond(200, r#"{"errorCode":"1002"}"#),
		Step::Respond(200, r#"{"transfers":[]}"#),
	]);

	dispatcher.prefunding_account(None).await.expect("Default-currency prefunding balance.");
	dispatcher.prefunding_account(Some("USD")).await.expect("USD prefunding balance.");

	let accounts = dispatcher.prefunding_accounts().await.expect("Account listing.");

	assert_eq!(accounts, json!([{ "id": "A1" }]));

	let err = dispatcher.prefunding_accounts().await.expect_err("Missing list must fail.");

	assert!(matches!(err, Error::Decode(DecodeError::MissingField { field: "txnAccountList", .. })));

	dispatcher.prefunding_transactions("A1").await.expect("Account transfers.");

	let seen = recorder.lock();
	let base = format!("{SERVICES}/businesspartners/{PARTNER_ID}");

	assert_eq!(path_of(&seen[1]), format!("{base}/balance"));
	assert_eq!(json_body(&seen[1]), json!({ "currency": "EUR" }));
	assert_eq!(path_of(&seen[2]), format!("{base}/balance"));
	assert_eq!(json_body(&seen[2]), json!({ "currency": "USD" }));
	assert_eq!(path_of(&seen[3]), format!("{base}/txnaccounts"));
	assert_eq!(path_of(&seen[5]), format!("{base}/transactionaccounts/A1/transfers"));
}
