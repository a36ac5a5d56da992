//! Walks through a full session against a mocked backend: login, an expired access token that
//! is refreshed transparently, a contact search, and logout.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use phonebook_client::{
	auth::Credentials,
	client::ReqwestApiClient,
	config::{ClientConfig, parse_base_url},
	nav::SessionEvent,
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200).json_body(json!({
				"username": "alice",
				"token": "access-1",
				"refreshToken": "refresh-1",
				"expiresIn": 3600,
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/contacts/search")
				.header("authorization", "Bearer access-1");
			then.status(401).json_body(json!({ "error": "Token expiré" }));
		})
		.await;

	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(200).json_body(json!({
				"username": "alice",
				"token": "access-2",
				"refreshToken": "refresh-2",
				"expiresIn": 3600,
			}));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/contacts/search")
				.header("authorization", "Bearer access-2");
			then.status(200).json_body(json!([{
				"id": 1,
				"firstName": "Awa",
				"lastName": "Ouédraogo",
				"phoneNumber": "+22670000001",
			}]));
		})
		.await;

	let config = ClientConfig::builder(parse_base_url(&server.url("/api"))?).build()?;
	let client = ReqwestApiClient::new(config, Arc::new(MemoryStore::default()))
		.with_listener(|event: &SessionEvent| println!("session event: {event:?}"));
	let session = client.login(&Credentials::new("alice", "secret")).await?;

	println!("Logged in as {} ({session:?}).", session.username);

	let contacts = client.contacts().search("Awa").await?;

	refresh.assert_calls_async(1).await;

	println!("Found {} contact(s) after one transparent refresh.", contacts.len());

	for contact in &contacts {
		println!("- {} {} <{}>", contact.first_name, contact.last_name, contact.phone_number);
	}

	client.logout().await?;

	println!("Authenticated after logout: {}.", client.is_authenticated());

	Ok(())
}
