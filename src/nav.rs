//! Navigation seam and session lifecycle events.
//!
//! The client never touches a router directly. It publishes [`SessionEvent`] values to
//! registered [`SessionListener`]s and, when a [`Navigator`] is attached, schedules a delayed
//! redirect to the login page through [`RedirectScheduler`]. A scheduled redirect is
//! cancelled by a later login, logout, or restore, so a user who re-authenticates inside the
//! delay window is not bounced back to the login page.

// crates.io
use tokio::{runtime::Handle, task::JoinHandle};
// self
use crate::_prelude::*;

/// Read/write access to the UI's current location.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Returns the current navigation path (for example `/contacts`).
	fn current_path(&self) -> String;

	/// Navigates to `path`.
	fn redirect(&self, path: &str);
}

/// Subscriber notified about session lifecycle changes.
pub trait SessionListener
where
	Self: Send + Sync,
{
	/// Receives one event; implementations must not block.
	fn on_session_event(&self, event: &SessionEvent);
}
impl<F> SessionListener for F
where
	F: Fn(&SessionEvent) + Send + Sync,
{
	fn on_session_event(&self, event: &SessionEvent) {
		self(event)
	}
}

/// Session lifecycle notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
	/// A login produced a new session.
	LoggedIn {
		/// Account name.
		username: String,
	},
	/// A refresh replaced the session.
	Refreshed {
		/// Account name.
		username: String,
	},
	/// The session could not be recovered and was deleted.
	Expired {
		/// What made the session unrecoverable.
		reason: ExpiryReason,
	},
	/// The user logged out.
	LoggedOut,
}

/// Why a session was terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpiryReason {
	/// No persisted session exists.
	NoSession,
	/// The persisted session carries no refresh token.
	MissingRefreshToken,
	/// The refresh endpoint answered with a non-success status.
	RefreshRejected {
		/// HTTP status returned by the refresh endpoint.
		status: u16,
	},
	/// The refresh endpoint answered without a usable token.
	RefreshMalformed,
	/// The refresh endpoint could not be reached.
	RefreshTransport,
	/// The session store failed while loading or saving.
	Storage,
}
impl ExpiryReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExpiryReason::NoSession => "no_session",
			ExpiryReason::MissingRefreshToken => "missing_refresh_token",
			ExpiryReason::RefreshRejected { .. } => "refresh_rejected",
			ExpiryReason::RefreshMalformed => "refresh_malformed",
			ExpiryReason::RefreshTransport => "refresh_transport",
			ExpiryReason::Storage => "storage",
		}
	}
}
impl Display for ExpiryReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			ExpiryReason::RefreshRejected { status } => write!(f, "refresh_rejected ({status})"),
			other => f.write_str(other.as_str()),
		}
	}
}

/// Holds at most one pending delayed redirect.
#[derive(Default)]
pub struct RedirectScheduler {
	pending: Mutex<Option<JoinHandle<()>>>,
}
impl RedirectScheduler {
	/// Schedules a redirect to `target` after `delay`, replacing any pending one.
	///
	/// Without a Tokio runtime the redirect happens immediately.
	pub fn schedule(&self, navigator: Arc<dyn Navigator>, target: String, delay: Duration) {
		self.cancel();

		let Ok(runtime) = Handle::try_current() else {
			navigator.redirect(&target);

			return;
		};
		let delay = delay.unsigned_abs();
		let task = runtime.spawn(async move {
			tokio::time::sleep(delay).await;
			navigator.redirect(&target);
		});

		*self.pending.lock() = Some(task);
	}

	/// Aborts the pending redirect; returns `true` if one was still waiting.
	pub fn cancel(&self) -> bool {
		match self.pending.lock().take() {
			Some(task) if !task.is_finished() => {
				task.abort();

				true
			},
			_ => false,
		}
	}

	/// Returns `true` while a redirect is waiting to fire.
	pub fn is_pending(&self) -> bool {
		self.pending.lock().as_ref().is_some_and(|task| !task.is_finished())
	}
}
impl Debug for RedirectScheduler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RedirectScheduler").field("pending", &self.is_pending()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Default)]
	struct RecordingNavigator {
		visits: Mutex<Vec<String>>,
	}
	impl Navigator for RecordingNavigator {
		fn current_path(&self) -> String {
			"/contacts".into()
		}

		fn redirect(&self, path: &str) {
			self.visits.lock().push(path.to_owned());
		}
	}

	#[test]
	fn schedule_without_runtime_redirects_immediately() {
		let navigator = Arc::new(RecordingNavigator::default());
		let scheduler = RedirectScheduler::default();

		scheduler.schedule(navigator.clone(), "/login".into(), Duration::milliseconds(100));

		assert_eq!(*navigator.visits.lock(), vec!["/login".to_owned()]);
		assert!(!scheduler.is_pending());
	}

	#[tokio::test]
	async fn delayed_redirect_fires_once() {
		let navigator = Arc::new(RecordingNavigator::default());
		let scheduler = RedirectScheduler::default();

		scheduler.schedule(navigator.clone(), "/login".into(), Duration::milliseconds(10));

		assert!(scheduler.is_pending());

		tokio::time::sleep(std::time::Duration::from_millis(80)).await;

		assert_eq!(*navigator.visits.lock(), vec!["/login".to_owned()]);
	}

	#[tokio::test]
	async fn cancelled_redirect_never_fires() {
		let navigator = Arc::new(RecordingNavigator::default());
		let scheduler = RedirectScheduler::default();

		scheduler.schedule(navigator.clone(), "/login".into(), Duration::milliseconds(20));

		assert!(scheduler.cancel());

		tokio::time::sleep(std::time::Duration::from_millis(80)).await;

		assert!(navigator.visits.lock().is_empty());
		assert!(!scheduler.cancel());
	}

	#[test]
	fn closures_are_listeners() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let listener = move |event: &SessionEvent| sink.lock().push(event.clone());

		listener.on_session_event(&SessionEvent::LoggedOut);

		assert_eq!(*seen.lock(), vec![SessionEvent::LoggedOut]);
		assert_eq!(
			ExpiryReason::RefreshRejected { status: 401 }.to_string(),
			"refresh_rejected (401)"
		);
	}
}
