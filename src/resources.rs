//! Typed wrappers for the backend's contact and group endpoints.
//!
//! Every operation goes through [`ApiClient::send`], so resource calls carry the bearer token
//! and share the refresh-and-retry behavior.

pub mod contacts;
pub mod groups;

pub use contacts::*;
pub use groups::*;

// self
use crate::{client::ApiClient, http::HttpTransport};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Contact endpoints bound to this client.
	pub fn contacts(&self) -> ContactsApi<'_, T> {
		ContactsApi::new(self)
	}

	/// Group endpoints bound to this client.
	pub fn groups(&self) -> GroupsApi<'_, T> {
		GroupsApi::new(self)
	}
}
