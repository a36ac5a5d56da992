//! Persisted session record and the auth endpoint wire payloads.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Authenticated user's credential set, persisted under a single well-known key.
///
/// The serialized form uses the backend's field names (`username`, `token`, `refreshToken`,
/// `expiresIn`) so a stored record reads the same as a login response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	/// Account name.
	pub username: String,
	/// Short-lived access token.
	pub token: TokenSecret,
	/// Longer-lived refresh token; may be empty when the backend did not issue one.
	#[serde(default = "empty_secret")]
	pub refresh_token: TokenSecret,
	/// Access token lifetime as reported by the backend.
	#[serde(default)]
	pub expires_in: i64,
}
impl Session {
	/// Creates a session from its parts.
	pub fn new(
		username: impl Into<String>,
		token: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
		expires_in: i64,
	) -> Self {
		Self {
			username: username.into(),
			token: token.into(),
			refresh_token: refresh_token.into(),
			expires_in,
		}
	}

	/// Returns the refresh token when one is usable.
	pub fn refresh_secret(&self) -> Option<&TokenSecret> {
		Some(&self.refresh_token).filter(|secret| !secret.is_empty())
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("username", &self.username)
			.field("token", &"<redacted>")
			.field("refresh_token", &self.refresh_secret().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

fn empty_secret() -> TokenSecret {
	TokenSecret::new(String::new())
}

/// Username/password pair submitted to the login and register endpoints.
#[derive(Clone, Serialize)]
pub struct Credentials {
	/// Account name.
	pub username: String,
	/// Plain password; serialized for the request body only.
	pub password: TokenSecret,
}
impl Credentials {
	/// Creates a credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<TokenSecret>) -> Self {
		Self { username: username.into(), password: password.into() }
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Body of `POST /auth/refresh`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
	/// Refresh token exchanged for a new access token.
	pub refresh_token: &'a str,
}

/// Response of `POST /auth/login` and `POST /auth/refresh`.
///
/// Every field is optional on the wire; [`AuthResponse::into_session`] decides what is
/// required.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
	/// Account name echoed by the backend.
	#[serde(default)]
	pub username: Option<String>,
	/// Newly issued access token.
	#[serde(default)]
	pub token: Option<String>,
	/// Newly issued refresh token.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Access token lifetime.
	#[serde(default)]
	pub expires_in: Option<i64>,
}
impl AuthResponse {
	/// Builds a [`Session`] from the response, filling absent fields from `fallback`.
	///
	/// Returns `None` when the response carries no usable access token.
	pub fn into_session(self, fallback: SessionFallback<'_>) -> Option<Session> {
		let token = self.token.filter(|token| !token.is_empty())?;
		let username = self
			.username
			.filter(|name| !name.is_empty())
			.unwrap_or_else(|| fallback.username.to_owned());
		let refresh_token = self
			.refresh_token
			.or_else(|| fallback.refresh_token.map(|secret| secret.expose().to_owned()))
			.unwrap_or_default();
		let expires_in = self.expires_in.or(fallback.expires_in).unwrap_or_default();

		Some(Session::new(username, token, refresh_token, expires_in))
	}
}
impl Debug for AuthResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthResponse")
			.field("username", &self.username)
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

/// Values used when an [`AuthResponse`] omits fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionFallback<'a> {
	/// Username to keep when the response omits one.
	pub username: &'a str,
	/// Refresh token to keep when the response does not rotate it.
	pub refresh_token: Option<&'a TokenSecret>,
	/// Lifetime to keep when the response omits one.
	pub expires_in: Option<i64>,
}
impl<'a> SessionFallback<'a> {
	/// Fallback carrying only a username (login).
	pub fn username(username: &'a str) -> Self {
		Self { username, ..Default::default() }
	}

	/// Fallback carrying everything from the session being replaced (refresh).
	pub fn from_session(session: &'a Session) -> Self {
		Self {
			username: &session.username,
			refresh_token: session.refresh_secret(),
			expires_in: Some(session.expires_in),
		}
	}
}
