//! Session lifecycle: login, registration, startup restore, and logout.

// self
use crate::{
	_prelude::*,
	auth::{AuthResponse, Credentials, Session, SessionFallback},
	client::ApiClient,
	http::{ApiRequest, HttpTransport},
	nav::SessionEvent,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::StoreError,
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges credentials for a session.
	///
	/// On success the session is persisted, its access token becomes the current bearer, and
	/// any pending post-expiry redirect is cancelled. A response without an access token is
	/// rejected as [`Error::InvalidResponse`]; use [`Error::auth_failure`] to classify other
	/// failures for display.
	pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(&self.config.login_path).json(credentials)?;
				let payload = self.send_json::<AuthResponse>(request).await?;
				let session = payload
					.into_session(SessionFallback::username(&credentials.username))
					.ok_or_else(|| Error::InvalidResponse {
						reason: "login response carries no access token".into(),
					})?;

				self.store.save(session.clone()).await?;
				self.tokens.set_token(session.token.clone());
				self.redirects.cancel();
				self.emit(&SessionEvent::LoggedIn { username: session.username.clone() });

				Ok(session)
			})
			.await;

		record(KIND, &result);

		result
	}

	/// Creates an account and returns the backend's payload untouched.
	///
	/// Registration does not log the user in; see [`ApiClient::register_and_login`].
	pub async fn register(&self, credentials: &Credentials) -> Result<serde_json::Value> {
		const KIND: FlowKind = FlowKind::Register;

		let span = FlowSpan::new(KIND, "register");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(&self.config.register_path).json(credentials)?;

				self.send_json::<serde_json::Value>(request).await
			})
			.await;

		record(KIND, &result);

		result
	}

	/// Registers an account, then logs in with the same credentials.
	pub async fn register_and_login(&self, credentials: &Credentials) -> Result<Session> {
		self.register(credentials).await?;

		self.login(credentials).await
	}

	/// Loads the persisted session into the token store at startup.
	///
	/// A record that no longer deserializes is deleted and treated as absent; other storage
	/// failures propagate.
	pub async fn restore(&self) -> Result<Option<Session>> {
		let session = match self.store.load().await {
			Ok(session) => session,
			Err(err @ StoreError::Serialization { .. }) => {
				obs::log_store_failure("load", &err);
				self.store.delete().await?;

				None
			},
			Err(err) => return Err(err.into()),
		};

		match &session {
			Some(session) => {
				self.tokens.set_token(session.token.clone());
				self.redirects.cancel();
			},
			None => self.tokens.clear_token(),
		}

		Ok(session)
	}

	/// Deletes the persisted session and forgets the access token.
	pub async fn logout(&self) -> Result<()> {
		self.redirects.cancel();
		self.tokens.clear_token();
		self.store.delete().await?;
		self.emit(&SessionEvent::LoggedOut);

		Ok(())
	}

	/// Returns the persisted session, if any.
	pub async fn current_session(&self) -> Result<Option<Session>> {
		Ok(self.store.load().await?)
	}

	/// Returns `true` while an access token is held.
	///
	/// This reflects the in-memory token: login, restore, and refresh set it, while logout and
	/// session expiry clear it. A persisted record alone does not count until [`Self::restore`]
	/// loads it; use [`Self::current_session`] to inspect the persisted record.
	pub fn is_authenticated(&self) -> bool {
		self.tokens.has_token()
	}
}

fn record<V>(kind: FlowKind, result: &Result<V>) {
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	obs::record_flow_outcome(kind, outcome);
}
