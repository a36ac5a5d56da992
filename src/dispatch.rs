//! Request dispatcher: decorates every outgoing call before it leaves the process.
//!
//! Decoration adds the configured default headers and, for anything outside the
//! authentication prefix, an `Authorization: Bearer` header read from the [`TokenStore`].
//! Login, register, and refresh calls are left untouched so a stale token never rides along.
//! Each call is timed for diagnostics only.

// std
use std::time::{Duration as StdDuration, Instant};
// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, TokenStore},
	config::ClientConfig,
	error::TransportError,
	http::{ApiRequest, ApiResponse, HttpTransport},
	obs,
};

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "authorization";

/// An outgoing call plus its one-shot retry flag.
///
/// The flag is flipped by the refresh interceptor before it attempts a refresh, so a call
/// is reissued at most once no matter how the retry turns out.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCall {
	request: ApiRequest,
	attempted: bool,
}
impl PendingCall {
	/// Wraps a fresh request.
	pub fn new(request: ApiRequest) -> Self {
		Self { request, attempted: false }
	}

	/// The request as it will be (re)sent.
	pub fn request(&self) -> &ApiRequest {
		&self.request
	}

	/// Whether the refresh-and-retry path has already been taken.
	pub fn attempted(&self) -> bool {
		self.attempted
	}

	/// Marks the call as retried.
	pub fn mark_attempted(&mut self) {
		self.attempted = true;
	}

	/// Bearer token currently attached to the call, if any.
	pub fn bearer(&self) -> Option<&str> {
		self.request.header_value(AUTHORIZATION).and_then(|value| value.strip_prefix("Bearer "))
	}

	/// Replaces the bearer token attached to the call.
	pub fn set_bearer(&mut self, token: &TokenSecret) {
		self.request.set_header(AUTHORIZATION, token.bearer());
	}

	/// Unwraps the request.
	pub fn into_request(self) -> ApiRequest {
		self.request
	}
}

/// Start marker captured right before a call is handed to the transport.
#[derive(Clone, Copy, Debug)]
pub struct DispatchTiming {
	started_at: Instant,
}
impl DispatchTiming {
	/// Captures the current instant.
	pub fn start() -> Self {
		Self { started_at: Instant::now() }
	}

	/// Time elapsed since [`DispatchTiming::start`].
	pub fn elapsed(&self) -> StdDuration {
		self.started_at.elapsed()
	}
}

/// Decorates and sends calls through an [`HttpTransport`].
pub struct Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	config: Arc<ClientConfig>,
	tokens: TokenStore,
}
impl<T> Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a dispatcher reading bearer tokens from `tokens`.
	pub fn new(transport: Arc<T>, config: Arc<ClientConfig>, tokens: TokenStore) -> Self {
		Self { transport, config, tokens }
	}

	/// Configuration used for URL resolution and auth-path detection.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns `true` if `path` targets an authentication endpoint.
	pub fn is_auth_path(&self, path: &str) -> bool {
		self.config.is_auth_path(path)
	}

	/// Applies default headers and, outside the auth prefix, the current bearer token.
	pub fn decorate(&self, call: &mut PendingCall) {
		for (name, value) in &self.config.default_headers {
			call.request.headers.entry(name.clone()).or_insert_with(|| value.clone());
		}

		if self.is_auth_path(&call.request.path) {
			return;
		}
		if let Some(token) = self.tokens.token() {
			call.set_bearer(&token);
		}
	}

	/// Decorates `call`, sends it, and reports its timing.
	pub async fn dispatch(&self, call: &mut PendingCall) -> Result<ApiResponse, TransportError> {
		let timing = DispatchTiming::start();

		self.decorate(call);

		let request = &call.request;
		let url = self.config.resolve(request);
		let result = self.transport.execute(url, request).await;
		let elapsed = timing.elapsed();
		let status = result.as_ref().ok().map(|response| response.status);

		obs::log_call(
			request.method,
			&request.path,
			status,
			elapsed,
			self.config.slow_call_threshold.unsigned_abs(),
		);
		obs::record_call_duration(request.method, status, elapsed);

		result
	}
}
impl<T> Clone for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<T> Debug for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("base_url", &self.config.base_url.as_str())
			.field("tokens", &self.tokens)
			.finish()
	}
}
