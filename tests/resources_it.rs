#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::harness;
use phonebook_client::{
	auth::Session,
	error::Error,
	resources::{ContactRequest, GroupRef, GroupRequest},
};

fn session() -> Option<Session> {
	Some(Session::new("alice", "T1", "R1", 3600))
}

fn contact_json(id: i64, first: &str, last: &str, phone: &str) -> serde_json::Value {
	json!({
		"id": id,
		"firstName": first,
		"lastName": last,
		"phoneNumber": phone,
		"email": null,
		"group": { "id": 2, "name": "Famille" },
	})
}

fn awa() -> serde_json::Value {
	contact_json(1, "Awa", "Ouédraogo", "+22670000001")
}

#[tokio::test]
async fn contacts_crud_carries_bearer() {
	let server = MockServer::start_async().await;
	let h = harness(&server, session(), "/contacts");

	h.client.restore().await.expect("Restore should succeed.");

	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/contacts").header("authorization", "Bearer T1");
			then.status(200).json_body(json!([awa()]));
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/contacts").json_body(json!({
				"firstName": "Issa",
				"lastName": "Sawadogo",
				"phoneNumber": "+22670000002",
				"groupId": 2,
			}));
			then.status(201).json_body(contact_json(2, "Issa", "Sawadogo", "+22670000002"));
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/contacts/2");
			then.status(200).json_body(contact_json(2, "Issa", "Sawadogo", "+22670000003"));
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/contacts/2");
			then.status(204);
		})
		.await;
	let contacts = h.client.contacts();
	let listed = contacts.list().await.expect("List should succeed.");

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].group, Some(GroupRef { id: 2, name: "Famille".into() }));

	let created = contacts
		.create(&ContactRequest::new("Issa", "Sawadogo", "+22670000002").group_id(2))
		.await
		.expect("Create should succeed.");

	assert_eq!(created.id, 2);

	let updated = contacts
		.update(2, &ContactRequest::new("Issa", "Sawadogo", "+22670000003"))
		.await
		.expect("Update should succeed.");

	assert_eq!(updated.phone_number, "+22670000003");

	contacts.delete(2).await.expect("Delete should succeed.");

	list.assert_calls_async(1).await;
	create.assert_calls_async(1).await;
	update.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn search_encodes_query_once_and_maps_404_to_empty() {
	let server = MockServer::start_async().await;
	let h = harness(&server, session(), "/contacts");
	let search = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/contacts/search").query_param("query", "Awa Ouédraogo");
			then.status(200).json_body(json!([awa()]));
		})
		.await;
	let phone = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/contacts/search/phone")
				.query_param("phoneNumber", "+22670000009");
			then.status(404).json_body(json!({ "message": "Aucun contact trouvé" }));
		})
		.await;
	let contacts = h.client.contacts();
	let found = contacts.search("Awa Ouédraogo").await.expect("Search should succeed.");

	assert_eq!(found.len(), 1);
	assert_eq!(found[0].last_name, "Ouédraogo");

	let none = contacts.search_by_phone("+22670000009").await.expect("404 should be empty.");

	assert!(none.is_empty());

	search.assert_calls_async(1).await;
	phone.assert_calls_async(1).await;
}

#[tokio::test]
async fn name_and_group_filters_hit_their_endpoints() {
	let server = MockServer::start_async().await;
	let h = harness(&server, session(), "/contacts");
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/contacts/search/firstname")
				.query_param("firstName", "Awa");
			then.status(200).json_body(json!([awa()]));
		})
		.await;
	let last = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/contacts/search/lastname")
				.query_param("lastName", "Kaboré");
			then.status(404);
		})
		.await;
	let group = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/contacts/group/2");
			then.status(200).json_body(json!([]));
		})
		.await;
	let contacts = h.client.contacts();

	let by_first = contacts.search_by_first_name("Awa").await.expect("Search should succeed.");
	let by_last = contacts.search_by_last_name("Kaboré").await.expect("404 should be empty.");

	assert_eq!(by_first.len(), 1);
	assert!(by_last.is_empty());
	assert!(contacts.by_group(2).await.expect("Group filter should succeed.").is_empty());

	first.assert_calls_async(1).await;
	last.assert_calls_async(1).await;
	group.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_surfaces_not_found_as_status_error() {
	let server = MockServer::start_async().await;
	let h = harness(&server, session(), "/contacts");

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/contacts/404");
			then.status(404).json_body(json!({ "message": "Contact introuvable" }));
		})
		.await;

	let err = h.client.contacts().get(404).await.expect_err("Missing contact should fail.");

	match err {
		Error::Status(status) => {
			assert!(status.is_not_found());
			assert_eq!(status.message.as_deref(), Some("Contact introuvable"));
		},
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn groups_crud_round_trip() {
	let server = MockServer::start_async().await;
	let h = harness(&server, session(), "/groups");
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/groups");
			then.status(200).json_body(json!([{ "id": 2, "name": "Famille" }]));
		})
		.await;
	let get = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/groups/2");
			then.status(200).json_body(json!({ "id": 2, "name": "Famille" }));
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/groups")
				.json_body(json!({ "name": "Travail", "description": "Collègues" }));
			then.status(201).json_body(json!({
				"id": 3,
				"name": "Travail",
				"description": "Collègues",
			}));
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/groups/3").json_body(json!({ "name": "Bureau" }));
			then.status(200).json_body(json!({ "id": 3, "name": "Bureau" }));
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/groups/3");
			then.status(204);
		})
		.await;
	let groups = h.client.groups();

	assert_eq!(groups.list().await.expect("List should succeed.").len(), 1);
	assert_eq!(groups.get(2).await.expect("Get should succeed.").name, "Famille");

	let created = groups
		.create(&GroupRequest::new("Travail").description("Collègues"))
		.await
		.expect("Create should succeed.");

	assert_eq!(created.description.as_deref(), Some("Collègues"));
	assert_eq!(
		groups.update(3, &GroupRequest::new("Bureau")).await.expect("Update should succeed.").name,
		"Bureau"
	);

	groups.delete(3).await.expect("Delete should succeed.");

	list.assert_calls_async(1).await;
	get.assert_calls_async(1).await;
	create.assert_calls_async(1).await;
	update.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}
