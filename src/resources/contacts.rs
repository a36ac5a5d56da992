//! `/contacts` endpoints, including the search family.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	error::StatusError,
	http::{ApiRequest, HttpTransport},
};

/// Contact as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
	/// Backend identifier.
	pub id: i64,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Unique phone number.
	pub phone_number: String,
	/// Optional email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Optional postal address.
	#[serde(default)]
	pub address: Option<String>,
	/// Group the contact belongs to.
	#[serde(default)]
	pub group: Option<GroupRef>,
}

/// Group summary embedded in a [`Contact`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRef {
	/// Backend identifier.
	pub id: i64,
	/// Group name.
	pub name: String,
}

/// Body of `POST /contacts` and `PUT /contacts/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Phone number, preferably in international format.
	pub phone_number: String,
	/// Optional email address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Optional postal address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Optional group assignment.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub group_id: Option<i64>,
}
impl ContactRequest {
	/// Creates a request with the mandatory fields.
	pub fn new(
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		phone_number: impl Into<String>,
	) -> Self {
		Self {
			first_name: first_name.into(),
			last_name: last_name.into(),
			phone_number: phone_number.into(),
			..Default::default()
		}
	}

	/// Sets the email address.
	pub fn email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Sets the postal address.
	pub fn address(mut self, address: impl Into<String>) -> Self {
		self.address = Some(address.into());

		self
	}

	/// Assigns the contact to a group.
	pub fn group_id(mut self, group_id: i64) -> Self {
		self.group_id = Some(group_id);

		self
	}
}

/// Contact operations borrowed from an [`ApiClient`].
#[derive(Debug)]
pub struct ContactsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> ContactsApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	const PATH: &'static str = "/contacts";

	/// Binds the endpoints to `client`.
	pub fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// `GET /contacts`
	pub async fn list(&self) -> Result<Vec<Contact>> {
		self.client.send_json(ApiRequest::get(Self::PATH)).await
	}

	/// `GET /contacts/{id}`
	pub async fn get(&self, id: i64) -> Result<Contact> {
		self.client.send_json(ApiRequest::get(format!("{}/{id}", Self::PATH))).await
	}

	/// `POST /contacts`
	pub async fn create(&self, contact: &ContactRequest) -> Result<Contact> {
		self.client.send_json(ApiRequest::post(Self::PATH).json(contact)?).await
	}

	/// `PUT /contacts/{id}`
	pub async fn update(&self, id: i64, contact: &ContactRequest) -> Result<Contact> {
		self.client.send_json(ApiRequest::put(format!("{}/{id}", Self::PATH)).json(contact)?).await
	}

	/// `DELETE /contacts/{id}`
	pub async fn delete(&self, id: i64) -> Result<()> {
		self.client.send_empty(ApiRequest::delete(format!("{}/{id}", Self::PATH))).await
	}

	/// `GET /contacts/search?query=`; matches any name or phone field.
	pub async fn search(&self, query: &str) -> Result<Vec<Contact>> {
		self.search_with("/contacts/search", "query", query).await
	}

	/// `GET /contacts/search/phone?phoneNumber=`
	pub async fn search_by_phone(&self, phone_number: &str) -> Result<Vec<Contact>> {
		self.search_with("/contacts/search/phone", "phoneNumber", phone_number).await
	}

	/// `GET /contacts/search/firstname?firstName=`
	pub async fn search_by_first_name(&self, first_name: &str) -> Result<Vec<Contact>> {
		self.search_with("/contacts/search/firstname", "firstName", first_name).await
	}

	/// `GET /contacts/search/lastname?lastName=`
	pub async fn search_by_last_name(&self, last_name: &str) -> Result<Vec<Contact>> {
		self.search_with("/contacts/search/lastname", "lastName", last_name).await
	}

	/// `GET /contacts/group/{group_id}`
	pub async fn by_group(&self, group_id: i64) -> Result<Vec<Contact>> {
		let request = ApiRequest::get(format!("{}/group/{group_id}", Self::PATH));

		empty_on_not_found(self.client.send_json(request).await)
	}

	async fn search_with(&self, path: &str, key: &str, value: &str) -> Result<Vec<Contact>> {
		let request = ApiRequest::get(path).query(key, value);

		empty_on_not_found(self.client.send_json(request).await)
	}
}

// Listing endpoints answer 404 when nothing matches.
fn empty_on_not_found(result: Result<Vec<Contact>>) -> Result<Vec<Contact>> {
	match result {
		Err(Error::Status(StatusError { status: 404, .. })) => Ok(Vec::new()),
		other => other,
	}
}
