//! Access token refresh with a singleflight guard.
//!
//! Callers record the refresh generation before sending the call that may need a refresh.
//! Every refresh then runs under the client's async guard. A caller that acquires the guard
//! after the generation moved past the one it recorded joins the outcome of the refresh it
//! waited on (the new session, or the reason the session ended) instead of issuing another
//! `POST /auth/refresh`. Otherwise it exchanges the stored refresh token itself, and the new
//! session replaces both the persisted record and the in-memory token before the guard is
//! released.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{AuthResponse, RefreshRequest, Session, SessionFallback},
	client::ApiClient,
	dispatch::PendingCall,
	http::{ApiRequest, HttpTransport},
	nav::{ExpiryReason, SessionEvent},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Singleflight state shared by clones of one client.
#[derive(Debug, Default)]
pub(crate) struct RefreshFlight {
	guard: AsyncMutex<()>,
	generation: AtomicU64,
	last: Mutex<Option<Result<Session, ExpiryReason>>>,
}
impl RefreshFlight {
	/// Number of refreshes completed so far, successful or not.
	pub(crate) fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	// Must be called with the guard held.
	fn complete(&self, outcome: &Result<Session, ExpiryReason>) {
		*self.last.lock() = Some(outcome.clone());
		self.generation.fetch_add(1, Ordering::AcqRel);
	}

	// Must be called with the guard held.
	fn completed_since(&self, observed: u64) -> Option<Result<Session, ExpiryReason>> {
		if self.generation() == observed {
			return None;
		}

		self.last.lock().clone()
	}
}

/// How a caller took part in a refresh.
#[derive(Debug)]
pub(crate) enum RefreshOutcome {
	/// This caller ran the refresh.
	Led(Result<Session, ExpiryReason>),
	/// A refresh finished while this caller waited; its outcome is shared.
	Joined(Result<Session, ExpiryReason>),
}
impl RefreshOutcome {
	fn result(&self) -> &Result<Session, ExpiryReason> {
		match self {
			Self::Led(result) | Self::Joined(result) => result,
		}
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Refreshes the session explicitly.
	///
	/// A failure terminates the session (persisted record deleted, token cleared, listeners
	/// notified) without scheduling a redirect, and is returned as [`Error::SessionExpired`].
	/// When a concurrent refresh finishes first, its outcome is returned instead.
	pub async fn refresh(&self) -> Result<Session> {
		let observed = self.refresh_flight.generation();

		match self.refresh_session(observed).await {
			RefreshOutcome::Led(Ok(session)) | RefreshOutcome::Joined(Ok(session)) => Ok(session),
			RefreshOutcome::Led(Err(reason)) => {
				self.terminate_session(reason, false).await;

				Err(Error::SessionExpired { reason })
			},
			RefreshOutcome::Joined(Err(reason)) => Err(Error::SessionExpired { reason }),
		}
	}

	/// Refreshes the session unless a refresh completed after generation `observed`.
	pub(crate) async fn refresh_session(&self, observed: u64) -> RefreshOutcome {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_session");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let outcome = span
			.instrument(async move {
				let _singleflight = self.refresh_flight.guard.lock().await;

				self.refresh_metrics.record_attempt();

				if let Some(shared) = self.refresh_flight.completed_since(observed) {
					if let Ok(session) = &shared {
						self.refresh_metrics.record_reuse();
						self.tokens.set_token(session.token.clone());
					}

					return RefreshOutcome::Joined(shared);
				}

				let result = self.refresh_locked().await;

				self.refresh_flight.complete(&result);

				if let Ok(session) = &result {
					self.tokens.set_token(session.token.clone());
					self.emit(&SessionEvent::Refreshed { username: session.username.clone() });
				}

				RefreshOutcome::Led(result)
			})
			.await;

		match outcome.result() {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Err(reason) => {
				self.refresh_metrics.record_failure();
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				if matches!(outcome, RefreshOutcome::Led(_)) {
					obs::log_refresh_failure(*reason);
				}
			},
		}

		outcome
	}

	async fn refresh_locked(&self) -> Result<Session, ExpiryReason> {
		let current = self
			.store
			.load()
			.await
			.map_err(|err| {
				obs::log_store_failure("load", &err);

				ExpiryReason::Storage
			})?
			.ok_or(ExpiryReason::NoSession)?;
		let refresh_token = current.refresh_secret().ok_or(ExpiryReason::MissingRefreshToken)?;
		let request = ApiRequest::post(&self.config.refresh_path)
			.json(&RefreshRequest { refresh_token: refresh_token.expose() })
			.map_err(|_| ExpiryReason::RefreshMalformed)?;
		let mut call = PendingCall::new(request);

		self.refresh_metrics.record_network_call();

		let response = self
			.dispatcher
			.dispatch(&mut call)
			.await
			.map_err(|_| ExpiryReason::RefreshTransport)?;

		if !response.is_success() {
			return Err(ExpiryReason::RefreshRejected { status: response.status });
		}

		let session = response
			.json::<AuthResponse>()
			.ok()
			.and_then(|payload| payload.into_session(SessionFallback::from_session(&current)))
			.ok_or(ExpiryReason::RefreshMalformed)?;

		self.store.save(session.clone()).await.map_err(|err| {
			obs::log_store_failure("save", &err);

			ExpiryReason::Storage
		})?;

		Ok(session)
	}
}
