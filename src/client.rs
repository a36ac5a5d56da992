//! Session-aware API client: the response interceptor, refresh orchestration, and session
//! lifecycle built on top of the [`Dispatcher`].

pub mod intercept;
pub mod refresh;
pub mod session;

pub use refresh::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenStore,
	client::refresh::RefreshFlight,
	config::ClientConfig,
	dispatch::Dispatcher,
	http::HttpTransport,
	nav::{Navigator, RedirectScheduler, SessionEvent, SessionListener},
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Talks to the backend on behalf of one user session.
///
/// The client owns the dispatcher (transport + token store), the persisted session store,
/// and the optional navigation hook. Every call made through [`ApiClient::send`] carries the
/// current bearer token and recovers from a single expired-token 401 by refreshing the
/// session and reissuing the call once. Concurrent refreshes collapse onto one in-flight
/// refresh guarded by an async mutex, and waiters share its outcome.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Decorates and sends every outgoing call.
	pub dispatcher: Dispatcher<T>,
	/// Shared client configuration.
	pub config: Arc<ClientConfig>,
	/// In-memory access token shared with the dispatcher.
	pub tokens: TokenStore,
	/// Persisted session backend.
	pub store: Arc<dyn SessionStore>,
	/// Optional navigation hook used for the post-expiry redirect.
	pub navigator: Option<Arc<dyn Navigator>>,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	listeners: Arc<RwLock<Vec<Arc<dyn SessionListener>>>>,
	refresh_flight: Arc<RefreshFlight>,
	redirects: Arc<RedirectScheduler>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport and token store.
	pub fn with_transport(
		config: ClientConfig,
		store: Arc<dyn SessionStore>,
		tokens: TokenStore,
		transport: impl Into<Arc<T>>,
	) -> Self {
		let config = Arc::new(config);

		Self {
			dispatcher: Dispatcher::new(transport.into(), config.clone(), tokens.clone()),
			config,
			tokens,
			store,
			navigator: None,
			refresh_metrics: Default::default(),
			listeners: Default::default(),
			refresh_flight: Default::default(),
			redirects: Default::default(),
		}
	}

	/// Attaches the navigation hook used to redirect to the login page on session expiry.
	pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
		self.navigator = Some(navigator);

		self
	}

	/// Registers a listener and returns the client.
	pub fn with_listener(self, listener: impl SessionListener + 'static) -> Self {
		self.subscribe(listener);

		self
	}

	/// Registers a listener on a live client; clones share the listener list.
	pub fn subscribe(&self, listener: impl SessionListener + 'static) {
		self.listeners.write().push(Arc::new(listener));
	}

	/// Returns `true` while a post-expiry redirect is waiting to fire.
	pub fn redirect_pending(&self) -> bool {
		self.redirects.is_pending()
	}

	/// Cancels a pending post-expiry redirect; returns `true` if one was waiting.
	pub fn cancel_redirect(&self) -> bool {
		self.redirects.cancel()
	}

	pub(crate) fn emit(&self, event: &SessionEvent) {
		let listeners = self.listeners.read().clone();

		for listener in listeners {
			listener.on_session_event(event);
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport and a fresh token store.
	pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_transport(config, store, TokenStore::new(), ReqwestTransport::default())
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			dispatcher: self.dispatcher.clone(),
			config: self.config.clone(),
			tokens: self.tokens.clone(),
			store: self.store.clone(),
			navigator: self.navigator.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			listeners: self.listeners.clone(),
			refresh_flight: self.refresh_flight.clone(),
			redirects: self.redirects.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("tokens", &self.tokens)
			.field("navigator_set", &self.navigator.is_some())
			.field("listeners", &self.listeners.read().len())
			.finish()
	}
}
