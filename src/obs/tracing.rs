// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	http::Method,
	nav::ExpiryReason,
	obs::FlowKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by client flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("phonebook_client.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a completed backend call; calls slower than `slow_threshold` are warned about.
pub fn log_call(
	method: Method,
	path: &str,
	status: Option<u16>,
	elapsed: StdDuration,
	slow_threshold: StdDuration,
) {
	#[cfg(feature = "tracing")]
	{
		let elapsed_ms = elapsed.as_secs_f64() * 1_000.;

		tracing::debug!(method = method.as_str(), path, status, elapsed_ms, "backend call");

		if elapsed > slow_threshold {
			tracing::warn!(method = method.as_str(), path, status, elapsed_ms, "slow backend call");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path, status, elapsed, slow_threshold);
	}
}

/// Logs a failed refresh attempt.
pub fn log_refresh_failure(reason: ExpiryReason) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(reason = %reason, "token refresh failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

/// Logs a terminated session and whether a redirect was scheduled.
pub fn log_session_terminated(reason: ExpiryReason, redirect: Option<&str>) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(reason = %reason, redirect, "session terminated");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (reason, redirect);
	}
}

/// Logs a session store failure that did not abort the surrounding flow.
pub fn log_store_failure(operation: &'static str, err: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(operation, error = %err, "session store failure");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, err);
	}
}
