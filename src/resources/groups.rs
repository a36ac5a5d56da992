//! `/groups` endpoints.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::{ApiRequest, HttpTransport},
};

/// Contact group as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	/// Backend identifier.
	pub id: i64,
	/// Unique group name.
	pub name: String,
	/// Free-form description.
	#[serde(default)]
	pub description: Option<String>,
}

/// Body of `POST /groups` and `PUT /groups/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
	/// Group name.
	pub name: String,
	/// Optional description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl GroupRequest {
	/// Creates a request with a name only.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), description: None }
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}
}

/// Group operations borrowed from an [`ApiClient`].
#[derive(Debug)]
pub struct GroupsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> GroupsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	const PATH: &'static str = "/groups";

	/// Binds the endpoints to `client`.
	pub fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// `GET /groups`
	pub async fn list(&self) -> Result<Vec<Group>> {
		self.client.send_json(ApiRequest::get(Self::PATH)).await
	}

	/// `GET /groups/{id}`
	pub async fn get(&self, id: i64) -> Result<Group> {
		self.client.send_json(ApiRequest::get(format!("{}/{id}", Self::PATH))).await
	}

	/// `POST /groups`
	pub async fn create(&self, group: &GroupRequest) -> Result<Group> {
		self.client.send_json(ApiRequest::post(Self::PATH).json(group)?).await
	}

	/// `PUT /groups/{id}`
	pub async fn update(&self, id: i64, group: &GroupRequest) -> Result<Group> {
		self.client.send_json(ApiRequest::put(format!("{}/{id}", Self::PATH)).json(group)?).await
	}

	/// `DELETE /groups/{id}`
	pub async fn delete(&self, id: i64) -> Result<()> {
		self.client.send_empty(ApiRequest::delete(format!("{}/{id}", Self::PATH))).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn group_request_omits_missing_description() {
		let body = serde_json::to_value(GroupRequest::new("Famille"))
			.expect("Group request should serialize.");

		assert_eq!(body, serde_json::json!({ "name": "Famille" }));

		let body = serde_json::to_value(GroupRequest::new("Travail").description("Collègues"))
			.expect("Group request should serialize.");

		assert_eq!(body, serde_json::json!({ "name": "Travail", "description": "Collègues" }));
	}

	#[test]
	fn group_ignores_owner_field() {
		let group: Group = serde_json::from_str(
			r#"{"id":3,"name":"Amis","description":null,"user":{"id":1,"username":"alice"}}"#,
		)
		.expect("Group payload should deserialize.");

		assert_eq!(group, Group { id: 3, name: "Amis".into(), description: None });
	}
}
