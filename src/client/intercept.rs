//! Response interceptor: the per-call refresh-and-retry state machine.
//!
//! A call starts in the initial state and is dispatched once. A `401` on a non-auth endpoint
//! that has not been retried yet flips the call's retry flag and moves it into the refresh
//! state. A successful refresh patches the bearer header and reissues the call exactly once;
//! a failed refresh terminates the session and hands the original `401` back to the caller.
//! Every other outcome passes through unchanged.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, refresh::RefreshOutcome},
	dispatch::PendingCall,
	http::{ApiRequest, ApiResponse, HttpTransport},
	nav::{ExpiryReason, SessionEvent},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Sends `request`, transparently recovering from one expired access token.
	///
	/// Every HTTP status is returned as an [`ApiResponse`]; only calls that never received a
	/// response fail with [`Error::Transport`], and those never trigger a refresh.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Call;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.send_call(PendingCall::new(request))).await;
		let outcome = match &result {
			Ok(response) if response.is_success() => FlowOutcome::Success,
			_ => FlowOutcome::Failure,
		};

		obs::record_flow_outcome(KIND, outcome);

		result
	}

	/// Sends `request` and decodes a successful JSON body into `R`.
	///
	/// Non-success statuses surface as [`Error::Status`] with the body's best-effort message.
	pub async fn send_json<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: serde::de::DeserializeOwned,
	{
		let response = self.send(request).await?.error_for_status()?;

		Ok(response.json()?)
	}

	/// Sends `request` and discards a successful body.
	pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
		self.send(request).await?.error_for_status()?;

		Ok(())
	}

	/// Drives one call through the refresh state machine.
	pub async fn send_call(&self, mut call: PendingCall) -> Result<ApiResponse> {
		let observed = self.refresh_flight.generation();
		let response = self.dispatcher.dispatch(&mut call).await?;

		if !self.should_refresh(&call, &response) {
			return Ok(response);
		}

		call.mark_attempted();

		match self.refresh_session(observed).await {
			RefreshOutcome::Led(Ok(session)) | RefreshOutcome::Joined(Ok(session)) => {
				call.set_bearer(&session.token);

				Ok(self.dispatcher.dispatch(&mut call).await?)
			},
			RefreshOutcome::Led(Err(reason)) => {
				self.terminate_session(reason, true).await;

				Ok(response)
			},
			// The refresh that failed already terminated the session.
			RefreshOutcome::Joined(Err(_)) => Ok(response),
		}
	}

	/// Returns `true` when `response` to `call` is eligible for refresh-and-retry.
	pub fn should_refresh(&self, call: &PendingCall, response: &ApiResponse) -> bool {
		response.is_unauthorized()
			&& !call.attempted()
			&& !self.dispatcher.is_auth_path(&call.request().path)
	}

	/// Deletes the persisted session, clears the token, and notifies listeners.
	///
	/// With `redirect` set and a navigator attached, a delayed redirect to the login page is
	/// scheduled unless the current location already is an authentication page.
	pub(crate) async fn terminate_session(&self, reason: ExpiryReason, redirect: bool) {
		if let Err(err) = self.store.delete().await {
			obs::log_store_failure("delete", &err);
		}

		self.tokens.clear_token();

		let target = if redirect { self.schedule_login_redirect() } else { None };

		obs::log_session_terminated(reason, target);
		self.emit(&SessionEvent::Expired { reason });
	}

	fn schedule_login_redirect(&self) -> Option<&str> {
		let navigator = self.navigator.as_ref()?;

		if self.config.is_auth_page(&navigator.current_path()) {
			return None;
		}

		self.redirects.schedule(
			navigator.clone(),
			self.config.login_page.clone(),
			self.config.redirect_delay,
		);

		Some(self.config.login_page.as_str())
	}
}
